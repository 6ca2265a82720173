// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory feedback sessions bridging the rating pick and the comment form.
//!
//! A session is created when a rating prompt is delivered, gains a rating when
//! the user picks one, and is consumed when the comment form is submitted.
//! Sessions idle for longer than the configured lifetime behave as missing.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use ticketry_config::model::FeedbackConfig;
use ticketry_core::{Rating, UserId, UserProfile};

use crate::messages::UNSPECIFIED_SERVICE;
use crate::relay::NotificationRelay;

/// One user's in-progress review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSession {
    /// Description of the ticket being reviewed. Absent when the session was
    /// recreated from a bare rating.
    pub description: Option<String>,
    /// Staff member who closed the ticket.
    pub staff: Option<String>,
    pub rating: Option<Rating>,
    touched: Instant,
}

impl FeedbackSession {
    fn blank(now: Instant) -> Self {
        Self {
            description: None,
            staff: None,
            rating: None,
            touched: now,
        }
    }
}

/// Result of submitting the comment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The review was handed to the relay; `published` is its delivery result.
    Submitted { published: bool },
    /// No live session with a rating; nothing was recorded.
    Expired,
}

/// Per-user feedback sessions with idle expiry.
pub struct FeedbackSessions {
    sessions: DashMap<UserId, FeedbackSession>,
    relay: Arc<NotificationRelay>,
    ttl: Option<Duration>,
}

impl FeedbackSessions {
    /// `ttl` of `None` keeps sessions until they are consumed.
    pub fn new(relay: Arc<NotificationRelay>, ttl: Option<Duration>) -> Self {
        Self {
            sessions: DashMap::new(),
            relay,
            ttl,
        }
    }

    pub fn from_config(relay: Arc<NotificationRelay>, config: &FeedbackConfig) -> Self {
        let ttl = (config.session_ttl_secs > 0).then(|| Duration::from_secs(config.session_ttl_secs));
        Self::new(relay, ttl)
    }

    pub fn relay(&self) -> &Arc<NotificationRelay> {
        &self.relay
    }

    fn is_live(&self, session: &FeedbackSession, now: Instant) -> bool {
        self.ttl
            .is_none_or(|ttl| now.saturating_duration_since(session.touched) < ttl)
    }

    /// Prompt `user` for a rating and open a session if the prompt arrives.
    ///
    /// Returns whether the prompt was delivered. Nothing is stored otherwise.
    pub async fn begin(&self, user: &UserId, description: &str, staff: Option<&str>) -> bool {
        if !self.relay.send_prompt(user, description, staff).await {
            return false;
        }
        self.sessions.insert(
            user.clone(),
            FeedbackSession {
                description: Some(description.to_string()),
                staff: staff.map(str::to_string),
                rating: None,
                touched: Instant::now(),
            },
        );
        debug!(user_id = %user, "feedback session opened");
        true
    }

    /// Attach a rating to the user's session.
    ///
    /// A missing or expired session is replaced by one holding only the rating.
    pub fn record_rating(&self, user: &UserId, rating: Rating) {
        let now = Instant::now();
        let mut session = self
            .sessions
            .entry(user.clone())
            .or_insert_with(|| FeedbackSession::blank(now));
        if !self.is_live(&session, now) {
            debug!(user_id = %user, "feedback session expired, starting over");
            *session = FeedbackSession::blank(now);
        }
        session.rating = Some(rating);
        session.touched = now;
        debug!(user_id = %user, rating = rating.get(), "rating recorded");
    }

    /// Consume the session and publish the review.
    ///
    /// The session is removed before publishing, so a second submission
    /// reports [`SubmitOutcome::Expired`].
    pub async fn submit_comment(&self, reviewer: &UserProfile, comment: &str) -> SubmitOutcome {
        let now = Instant::now();
        let taken = self
            .sessions
            .remove_if(&reviewer.id, |_, s| s.rating.is_some() && self.is_live(s, now));
        let Some((_, session)) = taken else {
            debug!(user_id = %reviewer.id, "comment submitted without a live rating");
            return SubmitOutcome::Expired;
        };
        let Some(rating) = session.rating else {
            return SubmitOutcome::Expired;
        };

        let description = session.description.as_deref().unwrap_or(UNSPECIFIED_SERVICE);
        let published = self
            .relay
            .publish(reviewer, rating, description, comment)
            .await;
        SubmitOutcome::Submitted { published }
    }

    /// Snapshot of the user's session if it is still live.
    pub fn get(&self, user: &UserId) -> Option<FeedbackSession> {
        let session = self.sessions.get(user)?;
        self.is_live(&session, Instant::now())
            .then(|| session.value().clone())
    }

    /// Drop every expired session. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, s| self.is_live(s, now));
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Periodically purge expired sessions until `cancel` fires.
pub fn spawn_session_sweeper(
    sessions: Arc<FeedbackSessions>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = sessions.purge_expired();
                    if purged > 0 {
                        info!(purged, remaining = sessions.len(), "expired feedback sessions purged");
                    }
                }
                _ = cancel.cancelled() => {
                    debug!("feedback session sweeper stopped");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketry_core::ChannelId;
    use ticketry_test_utils::MockPlatform;

    const DAY: Duration = Duration::from_secs(86_400);

    fn setup(ttl: Option<Duration>) -> (Arc<MockPlatform>, FeedbackSessions, ChannelId) {
        let platform = Arc::new(MockPlatform::new());
        let channel = platform.add_channel("feedback");
        let relay = Arc::new(NotificationRelay::new(
            platform.clone(),
            Some(channel.clone()),
            "Desk",
        ));
        (platform, FeedbackSessions::new(relay, ttl), channel)
    }

    fn rating(n: u8) -> Rating {
        Rating::new(n).unwrap()
    }

    #[tokio::test]
    async fn begin_opens_session_only_when_prompt_delivered() {
        let (platform, sessions, _) = setup(Some(DAY));
        let alice = UserId::new("1");
        let bob = UserId::new("2");
        platform.block_direct_messages(&bob);

        assert!(sessions.begin(&alice, "Buying Limiteds", Some("staff")).await);
        assert!(!sessions.begin(&bob, "Buying Limiteds", Some("staff")).await);

        let session = sessions.get(&alice).unwrap();
        assert_eq!(session.description.as_deref(), Some("Buying Limiteds"));
        assert_eq!(session.staff.as_deref(), Some("staff"));
        assert!(session.rating.is_none());
        assert!(sessions.get(&bob).is_none());
    }

    #[tokio::test]
    async fn rating_then_comment_publishes_and_consumes() {
        let (platform, sessions, channel) = setup(Some(DAY));
        let user = UserProfile::new("1", "alice");
        sessions.begin(&user.id, "Buying Limiteds", None).await;
        sessions.record_rating(&user.id, rating(4));

        let outcome = sessions.submit_comment(&user, "Great service").await;
        assert_eq!(outcome, SubmitOutcome::Submitted { published: true });
        assert!(sessions.is_empty());

        let posted = platform.channel_messages(&channel);
        assert_eq!(posted.len(), 1);
        assert!(posted[0].embeds[0].description.contains("4/5"));
        assert!(posted[0].embeds[0].description.contains("Buying Limiteds"));

        assert_eq!(
            sessions.submit_comment(&user, "again").await,
            SubmitOutcome::Expired
        );
        assert_eq!(platform.channel_messages(&channel).len(), 1);
    }

    #[tokio::test]
    async fn session_without_rating_never_publishes() {
        let (platform, sessions, channel) = setup(None);
        let user = UserProfile::new("1", "alice");
        sessions.begin(&user.id, "Svc", None).await;

        assert_eq!(sessions.submit_comment(&user, "hi").await, SubmitOutcome::Expired);
        assert!(platform.channel_messages(&channel).is_empty());
        // The unrated session stays so the user can still pick a rating.
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn rating_without_session_recreates_it() {
        let (platform, sessions, channel) = setup(Some(DAY));
        let user = UserProfile::new("1", "alice");
        sessions.record_rating(&user.id, rating(5));

        let session = sessions.get(&user.id).unwrap();
        assert_eq!(session.rating, Some(rating(5)));
        assert!(session.description.is_none());

        sessions.submit_comment(&user, "").await;
        let posted = platform.channel_messages(&channel);
        assert!(posted[0].embeds[0].description.contains(UNSPECIFIED_SERVICE));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_expire() {
        let (_platform, sessions, _) = setup(Some(Duration::from_secs(60)));
        let user = UserProfile::new("1", "alice");
        sessions.begin(&user.id, "Svc", None).await;
        sessions.record_rating(&user.id, rating(3));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(sessions.get(&user.id).is_none());
        assert_eq!(sessions.submit_comment(&user, "late").await, SubmitOutcome::Expired);
        assert_eq!(sessions.purge_expired(), 1);
        assert!(sessions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_session_is_replaced_on_rating() {
        let (_platform, sessions, _) = setup(Some(Duration::from_secs(60)));
        let user = UserId::new("1");
        sessions.begin(&user, "Old ticket", None).await;

        tokio::time::advance(Duration::from_secs(120)).await;
        sessions.record_rating(&user, rating(2));

        let session = sessions.get(&user).unwrap();
        assert!(session.description.is_none());
        assert_eq!(session.rating, Some(rating(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_ttl_config_never_expires() {
        let (platform, _, channel) = setup(None);
        let relay = Arc::new(NotificationRelay::new(platform, Some(channel), "Desk"));
        let config = FeedbackConfig {
            session_ttl_secs: 0,
            ..FeedbackConfig::default()
        };
        let sessions = FeedbackSessions::from_config(relay, &config);
        let user = UserId::new("1");
        sessions.record_rating(&user, rating(1));

        tokio::time::advance(DAY * 30).await;
        assert!(sessions.get(&user).is_some());
        assert_eq!(sessions.purge_expired(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_purges_on_interval() {
        let (_platform, sessions, _) = setup(Some(Duration::from_secs(10)));
        let sessions = Arc::new(sessions);
        sessions.record_rating(&UserId::new("1"), rating(5));

        let cancel = CancellationToken::new();
        let handle = spawn_session_sweeper(sessions.clone(), Duration::from_secs(30), cancel.clone());

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(sessions.is_empty());

        cancel.cancel();
        handle.await.unwrap();
    }
}
