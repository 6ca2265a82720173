// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response handle for a single inbound interaction.

use async_trait::async_trait;

use crate::error::TicketryError;
use crate::message::{Form, OutboundMessage};

/// Answers one interaction.
///
/// A platform accepts exactly one initial response per interaction (reply,
/// deferral, update, or form); later output goes through [`Responder::edit_reply`].
#[async_trait]
pub trait Responder: Send + Sync {
    /// Whether an initial response has already been sent.
    fn is_acknowledged(&self) -> bool;

    /// Initial response with a message. Honours `msg.ephemeral`.
    async fn reply(&self, msg: OutboundMessage) -> Result<(), TicketryError>;

    /// Replaces the initial response.
    async fn edit_reply(&self, msg: OutboundMessage) -> Result<(), TicketryError>;

    /// Acknowledges a control press without sending anything.
    async fn defer_update(&self) -> Result<(), TicketryError>;

    /// Initial response that rewrites the message carrying the pressed control.
    async fn update_message(&self, msg: OutboundMessage) -> Result<(), TicketryError>;

    /// Initial response that opens a form.
    async fn show_form(&self, form: Form) -> Result<(), TicketryError>;
}
