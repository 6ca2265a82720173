// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound operations the core invokes on the chat platform.

use async_trait::async_trait;

use crate::error::TicketryError;
use crate::message::OutboundMessage;
use crate::types::{ChannelId, MessageId, RoleId, UserId, UserProfile};

/// Adapter for the chat platform hosting the support desk.
///
/// Implementations wrap a platform API client. Every method may suspend on a
/// network call; none of them are cancellable once started.
#[async_trait]
pub trait Platform: Send + Sync + 'static {
    /// Returns the human-readable name of this platform adapter.
    fn name(&self) -> &str;

    /// Creates a private text channel visible only to `owner` and `support_role`.
    async fn create_private_channel(
        &self,
        name: &str,
        owner: &UserId,
        support_role: Option<&RoleId>,
    ) -> Result<ChannelId, TicketryError>;

    /// Returns `Ok(false)` when the channel no longer resolves.
    async fn channel_exists(&self, channel: &ChannelId) -> Result<bool, TicketryError>;

    /// Posts a message into a channel.
    async fn send_message(
        &self,
        channel: &ChannelId,
        msg: OutboundMessage,
    ) -> Result<MessageId, TicketryError>;

    /// Sends a direct message. Fails when the user has closed their DMs.
    async fn send_direct(
        &self,
        user: &UserId,
        msg: OutboundMessage,
    ) -> Result<MessageId, TicketryError>;

    /// Deletes a channel.
    async fn delete_channel(&self, channel: &ChannelId) -> Result<(), TicketryError>;

    /// Fetches a user's profile.
    async fn fetch_user(&self, user: &UserId) -> Result<UserProfile, TicketryError>;
}
