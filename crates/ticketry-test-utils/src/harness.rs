// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the complete desk with a [`MockPlatform`], a temp
//! ticket document, and a [`Dispatcher`]. Helper methods drive interactions
//! the way the platform adapter would and return the recorded responses.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use ticketry_agent::Dispatcher;
use ticketry_config::TicketryConfig;
use ticketry_core::event::{
    CLOSE_BUTTON, CLOSE_CANCEL, CLOSE_CONFIRM, COMMENT_FIELD, COMMENT_FORM, RATING_SELECT,
    SERVICE_SELECT, TRADE_SELECT_PREFIX,
};
use ticketry_core::{
    ChannelId, InteractionEvent, Rating, TicketDocument, TicketryError, TradeAction, UserProfile,
};
use ticketry_storage::TicketStore;

use crate::mock_platform::MockPlatform;
use crate::mock_responder::MockResponder;

/// Fixed id of the feedback channel the harness creates.
pub const FEEDBACK_CHANNEL_ID: u64 = 900;
/// Fixed id of the support role the harness configures.
pub const SUPPORT_ROLE_ID: u64 = 500;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: TicketryConfig,
    feedback_channel: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let mut config = TicketryConfig::default();
        config.bot.support_role_id = Some(SUPPORT_ROLE_ID);
        config.bot.brand_name = "Test Desk".to_string();
        Self {
            config,
            feedback_channel: true,
        }
    }

    /// Replace the whole configuration. Storage path and feedback channel are
    /// still set by the harness.
    pub fn with_config(mut self, config: TicketryConfig) -> Self {
        self.config = config;
        self
    }

    /// Seconds between closure and channel deletion.
    pub fn with_close_delay(mut self, secs: u64) -> Self {
        self.config.tickets.close_delay_secs = secs;
        self
    }

    /// Feedback session lifetime; `0` disables expiry.
    pub fn with_session_ttl(mut self, secs: u64) -> Self {
        self.config.feedback.session_ttl_secs = secs;
        self
    }

    /// Leave the feedback channel unconfigured so reviews cannot be published.
    pub fn without_feedback_channel(mut self) -> Self {
        self.feedback_channel = false;
        self
    }

    /// Build the harness, creating the temp document and every component.
    pub fn build(self) -> Result<TestHarness, TicketryError> {
        let temp_dir = tempfile::TempDir::new()?;
        let store_path = temp_dir.path().join("tickets.json");

        let mut config = self.config;
        config.storage.document_path = store_path.display().to_string();

        let platform = Arc::new(MockPlatform::new());
        if self.feedback_channel {
            platform.add_channel_with_id(FEEDBACK_CHANNEL_ID, "feedback");
            config.feedback.channel_id = Some(FEEDBACK_CHANNEL_ID);
        } else {
            config.feedback.channel_id = None;
        }

        let store = Arc::new(TicketStore::open(&store_path)?);
        let dispatcher = Arc::new(Dispatcher::new(config.clone(), store.clone(), platform.clone()));

        Ok(TestHarness {
            platform,
            store,
            dispatcher,
            config,
            store_path,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete desk over mock adapters and a temp ticket document.
pub struct TestHarness {
    /// The mock chat platform.
    pub platform: Arc<MockPlatform>,
    /// Ticket store (temp file, cleaned up on drop).
    pub store: Arc<TicketStore>,
    /// The dispatcher under test.
    pub dispatcher: Arc<Dispatcher>,
    /// Effective configuration.
    pub config: TicketryConfig,
    store_path: PathBuf,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn feedback_channel(&self) -> ChannelId {
        ChannelId::new(FEEDBACK_CHANNEL_ID.to_string())
    }

    pub fn store_path(&self) -> &PathBuf {
        &self.store_path
    }

    /// Current persisted document, read straight from disk.
    pub fn document(&self) -> TicketDocument {
        ticketry_storage::document::load(&self.store_path).unwrap_or_default()
    }

    /// Register a user with the platform and return their profile.
    pub fn user(&self, id: &str, tag: &str) -> UserProfile {
        let profile = UserProfile::new(id, tag);
        self.platform.add_user(profile.clone());
        profile
    }

    /// Deliver an event and return the responder that answered it.
    pub async fn dispatch(&self, event: InteractionEvent) -> MockResponder {
        let responder = MockResponder::new();
        self.dispatcher.handle(event, &responder).await;
        responder
    }

    /// Pick a service on the entry panel.
    pub async fn select_service(&self, actor: &UserProfile, key: &str) -> MockResponder {
        self.dispatch(selection(actor, None, SERVICE_SELECT, key)).await
    }

    /// Pick buy or sell for a trade service.
    pub async fn select_trade(
        &self,
        actor: &UserProfile,
        action: TradeAction,
        key: &str,
    ) -> MockResponder {
        let control = format!("{TRADE_SELECT_PREFIX}{key}");
        let value = format!("{action}_{key}");
        self.dispatch(selection(actor, None, &control, &value)).await
    }

    pub async fn press_close(&self, actor: &UserProfile, channel: &ChannelId) -> MockResponder {
        self.dispatch(press(actor, channel, CLOSE_BUTTON)).await
    }

    pub async fn confirm_close(&self, actor: &UserProfile, channel: &ChannelId) -> MockResponder {
        self.dispatch(press(actor, channel, CLOSE_CONFIRM)).await
    }

    pub async fn cancel_close(&self, actor: &UserProfile, channel: &ChannelId) -> MockResponder {
        self.dispatch(press(actor, channel, CLOSE_CANCEL)).await
    }

    /// Pick a star rating from the prompt received by direct message.
    pub async fn rate(&self, actor: &UserProfile, rating: Rating) -> MockResponder {
        self.dispatch(selection(actor, None, RATING_SELECT, &rating.control_value()))
            .await
    }

    /// Submit the comment form.
    pub async fn submit_comment(&self, actor: &UserProfile, comment: &str) -> MockResponder {
        self.dispatch(InteractionEvent::FormSubmit {
            actor: actor.clone(),
            channel_id: None,
            form: COMMENT_FORM.to_string(),
            fields: HashMap::from([(COMMENT_FIELD.to_string(), comment.to_string())]),
        })
        .await
    }
}

fn selection(
    actor: &UserProfile,
    channel: Option<&ChannelId>,
    control: &str,
    value: &str,
) -> InteractionEvent {
    InteractionEvent::Selection {
        actor: actor.clone(),
        channel_id: channel.cloned(),
        control: control.to_string(),
        values: vec![value.to_string()],
    }
}

fn press(actor: &UserProfile, channel: &ChannelId, control: &str) -> InteractionEvent {
    InteractionEvent::ButtonPress {
        actor: actor.clone(),
        channel_id: Some(channel.clone()),
        control: control.to_string(),
    }
}
