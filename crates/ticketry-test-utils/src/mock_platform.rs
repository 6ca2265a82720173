// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat platform for deterministic testing.
//!
//! `MockPlatform` implements `Platform` over in-memory channels and users.
//! Every outbound message is captured for assertions, and channel creation
//! or direct messages can be made to fail on demand.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use ticketry_core::message::OutboundMessage;
use ticketry_core::{ChannelId, MessageId, Platform, RoleId, TicketryError, UserId, UserProfile};

/// First identifier handed out to channels and messages.
const FIRST_ID: u64 = 1000;

/// Visibility of a channel created through `create_private_channel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelAccess {
    pub name: String,
    pub owner: UserId,
    pub support_role: Option<RoleId>,
}

#[derive(Debug, Clone)]
struct MockChannel {
    name: String,
    access: Option<ChannelAccess>,
}

#[derive(Debug)]
struct State {
    next_id: u64,
    channels: BTreeMap<ChannelId, MockChannel>,
    created: Vec<String>,
    deleted: Vec<ChannelId>,
    channel_messages: Vec<(ChannelId, OutboundMessage)>,
    direct_messages: Vec<(UserId, OutboundMessage)>,
    users: HashMap<UserId, UserProfile>,
    blocked_dms: HashSet<UserId>,
    fail_channel_creation: bool,
}

impl State {
    fn next_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        id.to_string()
    }
}

/// An in-memory chat platform for testing.
pub struct MockPlatform {
    state: Mutex<State>,
}

impl MockPlatform {
    /// Create a platform with no channels and no users.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: FIRST_ID,
                channels: BTreeMap::new(),
                created: Vec::new(),
                deleted: Vec::new(),
                channel_messages: Vec::new(),
                direct_messages: Vec::new(),
                users: HashMap::new(),
                blocked_dms: HashSet::new(),
                fail_channel_creation: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a pre-existing channel (panel or feedback channel) and return its id.
    pub fn add_channel(&self, name: &str) -> ChannelId {
        let mut state = self.state();
        let id = ChannelId::new(state.next_id());
        state.channels.insert(
            id.clone(),
            MockChannel {
                name: name.to_string(),
                access: None,
            },
        );
        id
    }

    /// Add a pre-existing channel under a fixed numeric id.
    pub fn add_channel_with_id(&self, id: u64, name: &str) -> ChannelId {
        let id = ChannelId::new(id.to_string());
        self.state().channels.insert(
            id.clone(),
            MockChannel {
                name: name.to_string(),
                access: None,
            },
        );
        id
    }

    /// Remove a channel out-of-band, as if a moderator deleted it by hand.
    pub fn remove_channel(&self, channel: &ChannelId) -> bool {
        self.state().channels.remove(channel).is_some()
    }

    pub fn channel_exists_now(&self, channel: &ChannelId) -> bool {
        self.state().channels.contains_key(channel)
    }

    /// Look up a live channel by name.
    pub fn find_channel(&self, name: &str) -> Option<ChannelId> {
        self.state()
            .channels
            .iter()
            .find(|(_, c)| c.name == name)
            .map(|(id, _)| id.clone())
    }

    pub fn channel_access(&self, channel: &ChannelId) -> Option<ChannelAccess> {
        self.state().channels.get(channel)?.access.clone()
    }

    /// Names of every channel created through the platform, in order.
    pub fn created_channels(&self) -> Vec<String> {
        self.state().created.clone()
    }

    /// Channels deleted through the platform, in order.
    pub fn deleted_channels(&self) -> Vec<ChannelId> {
        self.state().deleted.clone()
    }

    /// Messages posted into `channel`, in order.
    pub fn channel_messages(&self, channel: &ChannelId) -> Vec<OutboundMessage> {
        self.state()
            .channel_messages
            .iter()
            .filter(|(c, _)| c == channel)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Every channel message across all channels.
    pub fn sent_messages(&self) -> Vec<(ChannelId, OutboundMessage)> {
        self.state().channel_messages.clone()
    }

    /// Direct messages delivered to `user`, in order.
    pub fn direct_messages(&self, user: &UserId) -> Vec<OutboundMessage> {
        self.state()
            .direct_messages
            .iter()
            .filter(|(u, _)| u == user)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn direct_message_count(&self) -> usize {
        self.state().direct_messages.len()
    }

    /// Register a user so `fetch_user` resolves them.
    pub fn add_user(&self, profile: UserProfile) {
        self.state().users.insert(profile.id.clone(), profile);
    }

    /// Make direct messages to `user` fail, as if they closed their DMs.
    pub fn block_direct_messages(&self, user: &UserId) {
        self.state().blocked_dms.insert(user.clone());
    }

    /// Make `create_private_channel` fail while `fail` is set.
    pub fn fail_channel_creation(&self, fail: bool) {
        self.state().fail_channel_creation = fail;
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(kind: &str, id: &str) -> TicketryError {
    TicketryError::NotFound {
        kind: kind.to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl Platform for MockPlatform {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_private_channel(
        &self,
        name: &str,
        owner: &UserId,
        support_role: Option<&RoleId>,
    ) -> Result<ChannelId, TicketryError> {
        let mut state = self.state();
        if state.fail_channel_creation {
            return Err(TicketryError::Platform {
                message: "channel creation rejected".to_string(),
                source: None,
            });
        }
        let id = ChannelId::new(state.next_id());
        state.channels.insert(
            id.clone(),
            MockChannel {
                name: name.to_string(),
                access: Some(ChannelAccess {
                    name: name.to_string(),
                    owner: owner.clone(),
                    support_role: support_role.cloned(),
                }),
            },
        );
        state.created.push(name.to_string());
        Ok(id)
    }

    async fn channel_exists(&self, channel: &ChannelId) -> Result<bool, TicketryError> {
        Ok(self.channel_exists_now(channel))
    }

    async fn send_message(
        &self,
        channel: &ChannelId,
        msg: OutboundMessage,
    ) -> Result<MessageId, TicketryError> {
        let mut state = self.state();
        if !state.channels.contains_key(channel) {
            return Err(not_found("channel", channel.as_str()));
        }
        state.channel_messages.push((channel.clone(), msg));
        Ok(MessageId::new(state.next_id()))
    }

    async fn send_direct(
        &self,
        user: &UserId,
        msg: OutboundMessage,
    ) -> Result<MessageId, TicketryError> {
        let mut state = self.state();
        if state.blocked_dms.contains(user) {
            return Err(TicketryError::Platform {
                message: "cannot send messages to this user".to_string(),
                source: None,
            });
        }
        state.direct_messages.push((user.clone(), msg));
        Ok(MessageId::new(state.next_id()))
    }

    async fn delete_channel(&self, channel: &ChannelId) -> Result<(), TicketryError> {
        let mut state = self.state();
        if state.channels.remove(channel).is_none() {
            return Err(not_found("channel", channel.as_str()));
        }
        state.deleted.push(channel.clone());
        Ok(())
    }

    async fn fetch_user(&self, user: &UserId) -> Result<UserProfile, TicketryError> {
        self.state()
            .users
            .get(user)
            .cloned()
            .ok_or_else(|| not_found("user", user.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_channels_are_private_and_resolvable() {
        let platform = MockPlatform::new();
        let owner = UserId::new("1");
        let role = RoleId::new("5");

        let id = platform
            .create_private_channel("ticket-1", &owner, Some(&role))
            .await
            .unwrap();
        assert!(platform.channel_exists(&id).await.unwrap());
        assert_eq!(platform.find_channel("ticket-1"), Some(id.clone()));
        assert_eq!(
            platform.channel_access(&id),
            Some(ChannelAccess {
                name: "ticket-1".into(),
                owner,
                support_role: Some(role),
            })
        );
    }

    #[tokio::test]
    async fn sends_to_missing_channels_fail() {
        let platform = MockPlatform::new();
        let err = platform
            .send_message(&ChannelId::new("404"), OutboundMessage::text("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, TicketryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn deleted_channels_stop_resolving() {
        let platform = MockPlatform::new();
        let id = platform.add_channel("general");

        platform.delete_channel(&id).await.unwrap();
        assert!(!platform.channel_exists(&id).await.unwrap());
        assert_eq!(platform.deleted_channels(), vec![id.clone()]);
        assert!(platform.delete_channel(&id).await.is_err());
    }

    #[tokio::test]
    async fn blocked_users_reject_direct_messages() {
        let platform = MockPlatform::new();
        let user = UserId::new("1");
        platform.block_direct_messages(&user);

        assert!(platform
            .send_direct(&user, OutboundMessage::text("hi"))
            .await
            .is_err());
        assert_eq!(platform.direct_message_count(), 0);
    }

    #[tokio::test]
    async fn fetch_user_requires_registration() {
        let platform = MockPlatform::new();
        assert!(platform.fetch_user(&UserId::new("1")).await.is_err());

        platform.add_user(UserProfile::new("1", "alice"));
        assert_eq!(platform.fetch_user(&UserId::new("1")).await.unwrap().tag, "alice");
    }

    #[tokio::test]
    async fn channel_creation_failure_is_injectable() {
        let platform = MockPlatform::new();
        platform.fail_channel_creation(true);
        assert!(platform
            .create_private_channel("ticket-1", &UserId::new("1"), None)
            .await
            .is_err());
        assert!(platform.created_channels().is_empty());
    }
}
