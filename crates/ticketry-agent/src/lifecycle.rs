// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket creation and closure.
//!
//! A ticket moves from absent to open on creation and from open to closed on
//! confirmed closure. Closed records stay in the owner's history. Each user has
//! at most one open ticket; creation for one user is serialized so concurrent
//! requests cannot both pass the open-ticket check.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use ticketry_config::TicketryConfig;
use ticketry_core::{
    ChannelId, Platform, RoleId, TicketRecord, TicketRequest, TicketryError, UserId, UserProfile,
};
use ticketry_storage::TicketStore;

use crate::feedback::FeedbackSessions;
use crate::messages;
use crate::scheduler::DeletionScheduler;

/// Result of a ticket request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(TicketRecord),
    /// The user already has an open ticket whose channel still exists.
    Conflict { channel: ChannelId },
}

/// Result of a confirmed closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed {
        ticket: TicketRecord,
        prompt_delivered: bool,
    },
    /// No open ticket was bound to the channel; it was deleted outright.
    Orphaned,
    /// Another closure got there first; nothing was done.
    AlreadyClosed,
}

/// Creates and closes tickets against the store and the platform.
pub struct TicketLifecycle {
    store: Arc<TicketStore>,
    platform: Arc<dyn Platform>,
    feedback: Arc<FeedbackSessions>,
    scheduler: Arc<DeletionScheduler>,
    support_role: Option<RoleId>,
    channel_prefix: String,
    brand: String,
    creation_locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl TicketLifecycle {
    pub fn new(
        config: &TicketryConfig,
        store: Arc<TicketStore>,
        platform: Arc<dyn Platform>,
        feedback: Arc<FeedbackSessions>,
        scheduler: Arc<DeletionScheduler>,
    ) -> Self {
        Self {
            store,
            platform,
            feedback,
            scheduler,
            support_role: config
                .bot
                .support_role_id
                .map(|id| RoleId::new(id.to_string())),
            channel_prefix: config.tickets.channel_prefix.trim().to_string(),
            brand: config.bot.brand_name.clone(),
            creation_locks: DashMap::new(),
        }
    }

    pub fn scheduler(&self) -> &Arc<DeletionScheduler> {
        &self.scheduler
    }

    fn creation_lock(&self, user: &UserId) -> Arc<Mutex<()>> {
        self.creation_locks
            .entry(user.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    /// Open a ticket for `actor`, or report the one they already have.
    ///
    /// An open record whose channel no longer exists is treated as orphaned:
    /// the user's history is purged and creation proceeds.
    pub async fn create_ticket(
        &self,
        actor: &UserProfile,
        request: &TicketRequest,
    ) -> Result<CreateOutcome, TicketryError> {
        let lock = self.creation_lock(&actor.id);
        let outcome = {
            let _guard = lock.lock().await;
            self.create_locked(actor, request).await
        };
        drop(lock);
        // Only the map holds the lock now unless another request is queued on it.
        self.creation_locks
            .remove_if(&actor.id, |_, l| Arc::strong_count(l) == 1);
        outcome
    }

    async fn create_locked(
        &self,
        actor: &UserProfile,
        request: &TicketRequest,
    ) -> Result<CreateOutcome, TicketryError> {
        if let Some(existing) = self.store.open_ticket(&actor.id).await? {
            if self.platform.channel_exists(&existing.channel_id).await? {
                debug!(
                    user_id = %actor.id,
                    channel_id = %existing.channel_id,
                    "user already has an open ticket"
                );
                return Ok(CreateOutcome::Conflict {
                    channel: existing.channel_id,
                });
            }
            warn!(
                user_id = %actor.id,
                channel_id = %existing.channel_id,
                number = existing.number,
                "open ticket points at a missing channel, purging user history"
            );
            self.store.reset_user_tickets(&actor.id).await?;
        }

        let number = self.store.allocate_number().await?;
        let name = format!("{}-{number}", self.channel_prefix);
        let channel = self
            .platform
            .create_private_channel(&name, &actor.id, self.support_role.as_ref())
            .await?;

        let record = TicketRecord {
            channel_id: channel.clone(),
            user_id: actor.id.clone(),
            user_tag: actor.tag.clone(),
            kind: request.kind.clone(),
            description: request.description.clone(),
            open: true,
            number,
            created_at: Utc::now(),
            closed_at: None,
            opened_by: actor.tag.clone(),
            closed_by: None,
        };
        self.store.append_ticket(record.clone()).await?;

        let intro = messages::ticket_intro(&record, self.support_role.as_ref(), &self.brand);
        if let Err(e) = self.platform.send_message(&channel, intro).await {
            warn!(channel_id = %channel, error = %e, "failed to post ticket intro");
        }

        info!(
            user_id = %actor.id,
            channel_id = %channel,
            number,
            kind = %record.kind,
            "ticket opened"
        );
        Ok(CreateOutcome::Created(record))
    }

    /// Close the open ticket bound to `channel` on behalf of `closer`.
    ///
    /// Locating the ticket scans every stored record.
    pub async fn close_ticket(
        &self,
        channel: &ChannelId,
        closer: &UserProfile,
    ) -> Result<CloseOutcome, TicketryError> {
        if self.store.find_open_by_channel(channel).await?.is_none() {
            if self.scheduler.is_pending(channel) {
                debug!(channel_id = %channel, "ticket already closed, deletion pending");
                return Ok(CloseOutcome::AlreadyClosed);
            }
            warn!(
                channel_id = %channel,
                "close requested for a channel with no open ticket, deleting it"
            );
            if let Err(e) = self.platform.delete_channel(channel).await {
                warn!(channel_id = %channel, error = %e, "failed to delete channel");
            }
            return Ok(CloseOutcome::Orphaned);
        }

        // Re-locate under the store lock so a concurrent close flips it once.
        let closed = self
            .store
            .update(|doc| {
                Ok(doc.find_open_by_channel_mut(channel).map(|ticket| {
                    ticket.close(closer.tag.clone(), Utc::now());
                    ticket.clone()
                }))
            })
            .await?;
        let Some(ticket) = closed else {
            debug!(channel_id = %channel, "ticket already closed");
            return Ok(CloseOutcome::AlreadyClosed);
        };

        let prompt_delivered = match self.platform.fetch_user(&ticket.user_id).await {
            Ok(owner) => {
                self.feedback
                    .begin(&owner.id, &ticket.description, Some(&closer.tag))
                    .await
            }
            Err(e) => {
                warn!(user_id = %ticket.user_id, error = %e, "could not resolve ticket owner");
                false
            }
        };

        let notice = messages::closure_notice(closer, prompt_delivered);
        if let Err(e) = self.platform.send_message(channel, notice).await {
            warn!(channel_id = %channel, error = %e, "failed to post closure notice");
        }
        self.scheduler.schedule(channel.clone());

        info!(
            user_id = %ticket.user_id,
            channel_id = %channel,
            number = ticket.number,
            closed_by = %closer.tag,
            prompt_delivered,
            "ticket closed"
        );
        Ok(CloseOutcome::Closed {
            ticket,
            prompt_delivered,
        })
    }
}
