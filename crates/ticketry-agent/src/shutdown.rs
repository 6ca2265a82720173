// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shutdown wiring for `serve`.
//!
//! SIGTERM or Ctrl+C cancels a [`CancellationToken`] that stops the gateway
//! and the session sweeper. Pending channel
//! deletions are given a short window to finish before the process exits.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::scheduler::DeletionScheduler;

const DRAIN_POLL: Duration = Duration::from_millis(100);

/// Spawns a task that cancels the returned token on SIGTERM or Ctrl+C.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        let interrupt = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = interrupt => {
                            info!(signal = "SIGINT", "stopping ticket desk");
                        }
                        _ = sigterm.recv() => {
                            info!(signal = "SIGTERM", "stopping ticket desk");
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler, listening for Ctrl+C only");
                    let _ = interrupt.await;
                    info!(signal = "SIGINT", "stopping ticket desk");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = interrupt.await;
            info!(signal = "ctrl-c", "stopping ticket desk");
        }

        trigger.cancel();
        debug!("cancellation token fired");
    });

    token
}

/// Waits up to `timeout` for scheduled channel deletions to run.
///
/// Returns the number of deletions still pending when the wait ended.
pub async fn drain_deletions(scheduler: &DeletionScheduler, timeout: Duration) -> usize {
    let pending = scheduler.pending();
    if pending == 0 {
        info!("no pending channel deletions to drain");
        return 0;
    }

    info!(count = pending, "waiting for pending channel deletions");
    let deadline = Instant::now() + timeout;
    while scheduler.pending() > 0 && Instant::now() < deadline {
        tokio::time::sleep(DRAIN_POLL).await;
    }

    let remaining = scheduler.pending();
    if remaining == 0 {
        info!("all channel deletions completed");
    } else {
        warn!(remaining, "timeout reached, some channel deletions abandoned");
    }
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use ticketry_test_utils::MockPlatform;

    #[tokio::test]
    async fn token_starts_uncancelled() {
        let cancel = install_signal_handler();
        assert!(!cancel.is_cancelled());
        cancel.cancel();
    }

    #[tokio::test]
    async fn drain_with_nothing_pending_returns_immediately() {
        let scheduler = DeletionScheduler::new(Arc::new(MockPlatform::new()), Duration::from_secs(3));
        assert_eq!(drain_deletions(&scheduler, Duration::from_millis(10)).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drain_waits_for_scheduled_deletions() {
        let platform = Arc::new(MockPlatform::new());
        let channel = platform.add_channel("ticket-1");
        let scheduler = DeletionScheduler::new(platform.clone(), Duration::from_secs(3));
        scheduler.schedule(channel.clone());

        assert_eq!(drain_deletions(&scheduler, Duration::from_secs(10)).await, 0);
        assert_eq!(platform.deleted_channels(), vec![channel]);
    }

    #[tokio::test(start_paused = true)]
    async fn drain_gives_up_at_timeout() {
        let platform = Arc::new(MockPlatform::new());
        let channel = platform.add_channel("ticket-1");
        let scheduler = DeletionScheduler::new(platform, Duration::from_secs(60));
        scheduler.schedule(channel);

        assert_eq!(drain_deletions(&scheduler, Duration::from_secs(1)).await, 1);
    }
}
