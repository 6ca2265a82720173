// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes interaction events and admin commands to the desk components.
//!
//! [`Dispatcher::handle`] is the error boundary for every interaction: any
//! failure is logged with full detail and the user only sees a generic notice.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use ticketry_config::TicketryConfig;
use ticketry_config::model::ServiceConfig;
use ticketry_core::event::{
    CLOSE_BUTTON, CLOSE_CANCEL, CLOSE_CONFIRM, COMMENT_FIELD, COMMENT_FORM, RATING_SELECT,
    SERVICE_SELECT, TRADE_SELECT_PREFIX,
};
use ticketry_core::{
    AdminCommand, ChannelId, InteractionEvent, OutboundMessage, Platform, Rating, Responder,
    TicketRequest, TicketryError, TradeAction, UserProfile,
};
use ticketry_storage::TicketStore;

use crate::feedback::{FeedbackSessions, SubmitOutcome};
use crate::lifecycle::{CloseOutcome, CreateOutcome, TicketLifecycle};
use crate::messages;
use crate::relay::NotificationRelay;
use crate::scheduler::DeletionScheduler;

/// Entry point for everything the platform delivers.
pub struct Dispatcher {
    config: Arc<TicketryConfig>,
    store: Arc<TicketStore>,
    platform: Arc<dyn Platform>,
    lifecycle: Arc<TicketLifecycle>,
    feedback: Arc<FeedbackSessions>,
}

impl Dispatcher {
    /// Wire the lifecycle manager, feedback sessions, relay, and deletion
    /// scheduler over `store` and `platform`.
    pub fn new(config: TicketryConfig, store: Arc<TicketStore>, platform: Arc<dyn Platform>) -> Self {
        let relay = Arc::new(NotificationRelay::from_config(platform.clone(), &config));
        let feedback = Arc::new(FeedbackSessions::from_config(relay, &config.feedback));
        let scheduler = Arc::new(DeletionScheduler::new(
            platform.clone(),
            Duration::from_secs(config.tickets.close_delay_secs),
        ));
        let lifecycle = Arc::new(TicketLifecycle::new(
            &config,
            store.clone(),
            platform.clone(),
            feedback.clone(),
            scheduler,
        ));

        info!(
            platform = platform.name(),
            services = config.services.len(),
            "dispatcher initialized"
        );

        Self {
            config: Arc::new(config),
            store,
            platform,
            lifecycle,
            feedback,
        }
    }

    pub fn config(&self) -> &TicketryConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<TicketStore> {
        &self.store
    }

    pub fn lifecycle(&self) -> &Arc<TicketLifecycle> {
        &self.lifecycle
    }

    pub fn feedback(&self) -> &Arc<FeedbackSessions> {
        &self.feedback
    }

    pub fn scheduler(&self) -> &Arc<DeletionScheduler> {
        self.lifecycle.scheduler()
    }

    /// Handle one interaction, answering through `responder`.
    ///
    /// Never fails: errors end up in the log and as a generic user notice.
    pub async fn handle(&self, event: InteractionEvent, responder: &dyn Responder) {
        let control = event.control().to_string();
        let user_id = event.actor().id.clone();

        if let Err(e) = self.route(event, responder).await {
            error!(user_id = %user_id, control = %control, error = %e, "interaction failed");

            let notice = messages::generic_error();
            let sent = if responder.is_acknowledged() {
                responder.edit_reply(notice).await
            } else {
                responder.reply(notice.ephemeral()).await
            };
            if let Err(e) = sent {
                error!(user_id = %user_id, error = %e, "failed to deliver error notice");
            }
        }
    }

    async fn route(
        &self,
        event: InteractionEvent,
        responder: &dyn Responder,
    ) -> Result<(), TicketryError> {
        match event {
            InteractionEvent::Selection {
                actor,
                control,
                values,
                ..
            } => self.on_selection(&actor, &control, &values, responder).await,
            InteractionEvent::ButtonPress {
                actor,
                channel_id,
                control,
            } => {
                self.on_button(&actor, channel_id.as_ref(), &control, responder)
                    .await
            }
            InteractionEvent::FormSubmit {
                actor,
                form,
                fields,
                ..
            } => self.on_form(&actor, &form, &fields, responder).await,
        }
    }

    async fn on_selection(
        &self,
        actor: &UserProfile,
        control: &str,
        values: &[String],
        responder: &dyn Responder,
    ) -> Result<(), TicketryError> {
        let value = values
            .first()
            .ok_or_else(|| TicketryError::InvalidInteraction(format!("{control}: no value selected")))?;

        if control == SERVICE_SELECT {
            let service = self.service(value)?;
            if service.trade {
                return responder.reply(messages::trade_choice(service)).await;
            }
            let request = TicketRequest {
                kind: service.key.clone(),
                description: service.label.clone(),
            };
            return self.open_ticket(actor, request, responder).await;
        }

        if control.starts_with(TRADE_SELECT_PREFIX) {
            let request = self.trade_request(value)?;
            return self.open_ticket(actor, request, responder).await;
        }

        if control == RATING_SELECT {
            let rating = Rating::from_control_value(value).ok_or_else(|| {
                TicketryError::InvalidInteraction(format!("unknown rating value `{value}`"))
            })?;
            self.feedback.record_rating(&actor.id, rating);
            return responder
                .show_form(messages::comment_form(self.config.feedback.comment_max_length))
                .await;
        }

        debug!(control, "ignoring unknown selection");
        Ok(())
    }

    async fn on_button(
        &self,
        actor: &UserProfile,
        channel: Option<&ChannelId>,
        control: &str,
        responder: &dyn Responder,
    ) -> Result<(), TicketryError> {
        match control {
            CLOSE_BUTTON => responder.reply(messages::close_confirmation()).await,
            CLOSE_CONFIRM => {
                responder.defer_update().await?;
                let channel = channel.ok_or_else(|| {
                    TicketryError::InvalidInteraction("close confirmed outside a channel".into())
                })?;
                match self.lifecycle.close_ticket(channel, actor).await? {
                    CloseOutcome::Closed { .. } | CloseOutcome::AlreadyClosed => {}
                    CloseOutcome::Orphaned => {
                        debug!(channel_id = %channel, "orphaned channel removed");
                    }
                }
                Ok(())
            }
            CLOSE_CANCEL => responder.update_message(messages::close_cancelled()).await,
            other => {
                debug!(control = other, "ignoring unknown button");
                Ok(())
            }
        }
    }

    async fn on_form(
        &self,
        actor: &UserProfile,
        form: &str,
        fields: &HashMap<String, String>,
        responder: &dyn Responder,
    ) -> Result<(), TicketryError> {
        if form != COMMENT_FORM {
            debug!(form, "ignoring unknown form");
            return Ok(());
        }

        let comment = fields.get(COMMENT_FIELD).map(String::as_str).unwrap_or_default();
        match self.feedback.submit_comment(actor, comment).await {
            SubmitOutcome::Submitted { .. } => responder.reply(messages::feedback_thanks()).await,
            SubmitOutcome::Expired => responder.reply(messages::session_expired()).await,
        }
    }

    /// Show the loading reply, run creation, then replace the reply with the outcome.
    async fn open_ticket(
        &self,
        actor: &UserProfile,
        request: TicketRequest,
        responder: &dyn Responder,
    ) -> Result<(), TicketryError> {
        responder.reply(messages::creating_ticket()).await?;

        let outcome = match self.lifecycle.create_ticket(actor, &request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(user_id = %actor.id, kind = %request.kind, error = %e, "ticket creation failed");
                return responder.edit_reply(messages::creation_failed()).await;
            }
        };

        match outcome {
            CreateOutcome::Created(ticket) => {
                responder.edit_reply(messages::ticket_created(&ticket)).await
            }
            CreateOutcome::Conflict { channel } => {
                responder.edit_reply(messages::ticket_conflict(&channel)).await
            }
        }
    }

    fn service(&self, key: &str) -> Result<&ServiceConfig, TicketryError> {
        self.config
            .service(key)
            .ok_or_else(|| TicketryError::InvalidInteraction(format!("unknown service `{key}`")))
    }

    /// Parse a `buy_<key>` / `sell_<key>` value into a ticket request.
    fn trade_request(&self, value: &str) -> Result<TicketRequest, TicketryError> {
        let invalid = || TicketryError::InvalidInteraction(format!("malformed trade value `{value}`"));
        let (action, key) = value.split_once('_').ok_or_else(invalid)?;
        let action = TradeAction::from_str(action).map_err(|_| invalid())?;
        let service = self.service(key)?;

        Ok(TicketRequest {
            kind: format!("{action}-{}", service.key),
            description: format!("{} {}", action.verb(), service.label),
        })
    }

    /// Run a privileged command. Returns the reply to show the admin, if any.
    pub async fn handle_admin(
        &self,
        command: AdminCommand,
    ) -> Result<Option<OutboundMessage>, TicketryError> {
        match command {
            AdminCommand::PublishPanel { channel_id } => {
                self.platform
                    .send_message(&channel_id, messages::panel(&self.config))
                    .await?;
                info!(channel_id = %channel_id, "ticket panel published");
                Ok(None)
            }
            AdminCommand::ResetTickets => {
                let users = self.store.reset_all_tickets().await?;
                if users == 0 {
                    warn!("ticket reset requested with no stored tickets");
                }
                Ok(Some(messages::reset_done()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketry_core::message::ActionRow;
    use ticketry_test_utils::{MockPlatform, MockResponder, ResponderCall};

    struct Fixture {
        platform: Arc<MockPlatform>,
        dispatcher: Dispatcher,
        _dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(TicketStore::open(dir.path().join("tickets.json")).unwrap());
        let platform = Arc::new(MockPlatform::new());
        let dispatcher = Dispatcher::new(TicketryConfig::default(), store, platform.clone());
        Fixture {
            platform,
            dispatcher,
            _dir: dir,
        }
    }

    fn alice() -> UserProfile {
        UserProfile::new("1", "alice")
    }

    fn select(control: &str, value: &str) -> InteractionEvent {
        InteractionEvent::Selection {
            actor: alice(),
            channel_id: None,
            control: control.to_string(),
            values: vec![value.to_string()],
        }
    }

    fn press(control: &str, channel: Option<ChannelId>) -> InteractionEvent {
        InteractionEvent::ButtonPress {
            actor: alice(),
            channel_id: channel,
            control: control.to_string(),
        }
    }

    #[tokio::test]
    async fn trade_service_answers_with_buy_sell_choice() {
        let f = fixture();
        let responder = MockResponder::new();

        f.dispatcher
            .handle(select(SERVICE_SELECT, "limiteds"), &responder)
            .await;

        let calls = responder.calls();
        assert_eq!(calls.len(), 1);
        let ResponderCall::Reply(msg) = &calls[0] else {
            panic!("expected a reply, got {calls:?}");
        };
        assert!(msg.ephemeral);
        assert!(matches!(&msg.components[0], ActionRow::Select(m) if m.control == "buy_sell_limiteds"));
        assert!(f.platform.created_channels().is_empty());
    }

    #[tokio::test]
    async fn plain_service_creates_ticket_directly() {
        let f = fixture();
        let responder = MockResponder::new();

        f.dispatcher
            .handle(select(SERVICE_SELECT, "services"), &responder)
            .await;

        let ticket = f.dispatcher.store().open_ticket(&alice().id).await.unwrap().unwrap();
        assert_eq!(ticket.kind, "services");
        assert_eq!(ticket.description, "Buying Services");

        let calls = responder.calls();
        assert!(matches!(&calls[0], ResponderCall::Reply(m) if m.embeds[0].title == "Creating your ticket..."));
        assert!(matches!(&calls[1], ResponderCall::EditReply(m) if m.embeds[0].title == "Ticket Created"));
    }

    #[tokio::test]
    async fn trade_choice_creates_typed_ticket() {
        let f = fixture();
        let responder = MockResponder::new();

        f.dispatcher
            .handle(select("buy_sell_dahood", "sell_dahood"), &responder)
            .await;

        let ticket = f.dispatcher.store().open_ticket(&alice().id).await.unwrap().unwrap();
        assert_eq!(ticket.kind, "sell-dahood");
        assert_eq!(ticket.description, "Selling Dahood Skins");
    }

    #[tokio::test]
    async fn conflict_is_reported_by_editing_the_reply() {
        let f = fixture();
        f.dispatcher
            .handle(select(SERVICE_SELECT, "services"), &MockResponder::new())
            .await;

        let responder = MockResponder::new();
        f.dispatcher
            .handle(select(SERVICE_SELECT, "services"), &responder)
            .await;
        assert!(matches!(
            responder.last(),
            Some(ResponderCall::EditReply(m)) if m.embeds[0].title == "Already Have Open Ticket"
        ));
    }

    #[tokio::test]
    async fn creation_failure_edits_the_loading_reply() {
        let f = fixture();
        f.platform.fail_channel_creation(true);
        let responder = MockResponder::new();

        f.dispatcher
            .handle(select(SERVICE_SELECT, "services"), &responder)
            .await;
        assert!(matches!(
            responder.last(),
            Some(ResponderCall::EditReply(m)) if m.content.as_deref() == Some(messages::CREATION_FAILED)
        ));
    }

    #[tokio::test]
    async fn unknown_service_gets_generic_ephemeral_error() {
        let f = fixture();
        let responder = MockResponder::new();

        f.dispatcher
            .handle(select(SERVICE_SELECT, "nope"), &responder)
            .await;
        let calls = responder.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            ResponderCall::Reply(m) if m.ephemeral && m.content.as_deref() == Some(messages::GENERIC_ERROR)
        ));
    }

    #[tokio::test]
    async fn failure_after_acknowledgement_edits_instead() {
        let f = fixture();
        let responder = MockResponder::new();

        // Confirm outside a channel fails after the update was deferred.
        f.dispatcher.handle(press(CLOSE_CONFIRM, None), &responder).await;
        let calls = responder.calls();
        assert_eq!(calls[0], ResponderCall::DeferUpdate);
        assert!(matches!(
            &calls[1],
            ResponderCall::EditReply(m) if m.content.as_deref() == Some(messages::GENERIC_ERROR)
        ));
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn undeliverable_error_notice_is_logged() {
        let f = fixture();
        let responder = MockResponder::new();
        responder.fail_all(true);

        f.dispatcher
            .handle(select(SERVICE_SELECT, "nope"), &responder)
            .await;
        assert!(logs_contain("interaction failed"));
        assert!(logs_contain("failed to deliver error notice"));
    }

    #[tokio::test]
    async fn close_button_asks_for_confirmation() {
        let f = fixture();
        let responder = MockResponder::new();

        f.dispatcher
            .handle(press(CLOSE_BUTTON, Some(ChannelId::new("c"))), &responder)
            .await;
        assert!(matches!(
            responder.last(),
            Some(ResponderCall::Reply(m)) if m.ephemeral && m.embeds[0].title == "Close Ticket"
        ));
    }

    #[tokio::test]
    async fn cancel_close_updates_prompt_without_state_change() {
        let f = fixture();
        let responder = MockResponder::new();
        let before = f.dispatcher.store().read().await.unwrap();

        f.dispatcher
            .handle(press(CLOSE_CANCEL, Some(ChannelId::new("c"))), &responder)
            .await;
        assert_eq!(
            responder.last(),
            Some(ResponderCall::UpdateMessage(messages::close_cancelled()))
        );
        assert_eq!(f.dispatcher.store().read().await.unwrap(), before);
    }

    #[tokio::test]
    async fn rating_opens_comment_form() {
        let f = fixture();
        let responder = MockResponder::new();

        f.dispatcher
            .handle(select(RATING_SELECT, "vouch_4"), &responder)
            .await;
        assert!(matches!(
            responder.last(),
            Some(ResponderCall::ShowForm(form)) if form.control == COMMENT_FORM && form.inputs[0].max_length == 500
        ));
        assert_eq!(
            f.dispatcher.feedback().get(&alice().id).unwrap().rating,
            Rating::new(4)
        );
    }

    #[tokio::test]
    async fn comment_without_session_reports_expiry() {
        let f = fixture();
        let responder = MockResponder::new();
        let event = InteractionEvent::FormSubmit {
            actor: alice(),
            channel_id: None,
            form: COMMENT_FORM.to_string(),
            fields: HashMap::from([(COMMENT_FIELD.to_string(), "hello".to_string())]),
        };

        f.dispatcher.handle(event, &responder).await;
        assert_eq!(
            responder.last(),
            Some(ResponderCall::Reply(messages::session_expired()))
        );
    }

    #[tokio::test]
    async fn admin_reset_clears_tickets_and_keeps_counter() {
        let f = fixture();
        f.dispatcher
            .handle(select(SERVICE_SELECT, "services"), &MockResponder::new())
            .await;

        let reply = f.dispatcher.handle_admin(AdminCommand::ResetTickets).await.unwrap();
        assert_eq!(reply, Some(messages::reset_done()));
        let doc = f.dispatcher.store().read().await.unwrap();
        assert!(doc.tickets.is_empty());
        assert_eq!(doc.counter, 1);
    }

    #[tokio::test]
    async fn admin_panel_is_posted_to_channel() {
        let f = fixture();
        let channel = f.platform.add_channel("tickets");

        let reply = f
            .dispatcher
            .handle_admin(AdminCommand::PublishPanel {
                channel_id: channel.clone(),
            })
            .await
            .unwrap();
        assert!(reply.is_none());
        let posted = f.platform.channel_messages(&channel);
        assert_eq!(posted.len(), 1);
        assert!(matches!(&posted[0].components[0], ActionRow::Select(m) if m.control == SERVICE_SELECT));
    }
}
