// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delayed, cancellable deletion of closed ticket channels.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, warn};

use ticketry_core::{ChannelId, Platform};

/// Deletes channels after a fixed delay, one pending task per channel.
pub struct DeletionScheduler {
    platform: Arc<dyn Platform>,
    delay: Duration,
    pending: Arc<DashMap<ChannelId, CancellationToken>>,
}

impl DeletionScheduler {
    pub fn new(platform: Arc<dyn Platform>, delay: Duration) -> Self {
        Self {
            platform,
            delay,
            pending: Arc::new(DashMap::new()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule deletion of `channel`.
    ///
    /// Returns `false` if a deletion is already pending for it. Delete failures
    /// are logged and otherwise ignored.
    pub fn schedule(&self, channel: ChannelId) -> bool {
        let token = match self.pending.entry(channel.clone()) {
            Entry::Occupied(_) => {
                debug!(channel_id = %channel, "deletion already scheduled");
                return false;
            }
            Entry::Vacant(slot) => slot.insert(CancellationToken::new()).value().clone(),
        };

        let platform = self.platform.clone();
        let pending = self.pending.clone();
        let delay = self.delay;
        debug!(channel_id = %channel, delay_secs = delay.as_secs(), "channel deletion scheduled");

        let task = async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(channel_id = %channel, "channel deletion cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    pending.remove(&channel);
                    match platform.delete_channel(&channel).await {
                        Ok(()) => info!(channel_id = %channel, "ticket channel deleted"),
                        Err(e) => warn!(channel_id = %channel, error = %e, "failed to delete ticket channel"),
                    }
                }
            }
        };
        tokio::spawn(task.in_current_span());
        true
    }

    /// Cancel a pending deletion. Returns whether one was pending.
    pub fn cancel(&self, channel: &ChannelId) -> bool {
        match self.pending.remove(channel) {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, channel: &ChannelId) -> bool {
        self.pending.contains_key(channel)
    }

    /// Number of deletions still waiting on their delay.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketry_test_utils::MockPlatform;

    fn setup() -> (Arc<MockPlatform>, DeletionScheduler) {
        let platform = Arc::new(MockPlatform::new());
        let scheduler = DeletionScheduler::new(platform.clone(), Duration::from_secs(3));
        (platform, scheduler)
    }

    #[tokio::test(start_paused = true)]
    async fn deletes_after_delay() {
        let (platform, scheduler) = setup();
        let channel = platform.add_channel("ticket-1");

        assert!(scheduler.schedule(channel.clone()));
        assert!(scheduler.is_pending(&channel));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(platform.deleted_channels().is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(platform.deleted_channels(), vec![channel.clone()]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn second_schedule_is_ignored() {
        let (platform, scheduler) = setup();
        let channel = platform.add_channel("ticket-1");

        assert!(scheduler.schedule(channel.clone()));
        assert!(!scheduler.schedule(channel.clone()));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(platform.deleted_channels().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_deletion() {
        let (platform, scheduler) = setup();
        let channel = platform.add_channel("ticket-1");

        scheduler.schedule(channel.clone());
        assert!(scheduler.cancel(&channel));
        assert!(!scheduler.cancel(&channel));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(platform.deleted_channels().is_empty());
        assert!(platform.channel_exists_now(&channel));
    }

    #[tracing_test::traced_test]
    #[tokio::test(start_paused = true)]
    async fn delete_failure_is_logged() {
        let (platform, scheduler) = setup();
        let channel = ChannelId::new("missing");

        scheduler.schedule(channel);
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(platform.deleted_channels().is_empty());
        assert!(logs_contain("failed to delete ticket channel"));
    }
}
