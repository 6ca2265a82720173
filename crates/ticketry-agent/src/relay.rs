// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort delivery of feedback prompts and published reviews.
//!
//! Neither operation raises: failures are logged and reported as `false` so
//! ticket closure and feedback submission are never blocked by delivery.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use ticketry_config::TicketryConfig;
use ticketry_core::{ChannelId, Platform, Rating, UserId, UserProfile};

use crate::messages;

const FILLED_STAR: char = '⭐';
const EMPTY_STAR: char = '☆';

/// `rating` filled stars followed by `5 - rating` empty ones.
pub fn star_bar(rating: Rating) -> String {
    let filled = usize::from(rating.get());
    let empty = usize::from(Rating::MAX) - filled;
    std::iter::repeat_n(FILLED_STAR, filled)
        .chain(std::iter::repeat_n(EMPTY_STAR, empty))
        .collect()
}

/// Colour band for a review card, green for the best rating through red.
pub fn rating_colour(rating: Rating) -> u32 {
    match rating.get() {
        5 => 0x27ae60,
        4 => 0x2ecc71,
        3 => 0xf39c12,
        2 => 0xe67e22,
        _ => 0xe74c3c,
    }
}

/// Sends rating prompts to users and publishes reviews to the feedback channel.
pub struct NotificationRelay {
    platform: Arc<dyn Platform>,
    feedback_channel: Option<ChannelId>,
    brand: String,
}

impl NotificationRelay {
    pub fn new(
        platform: Arc<dyn Platform>,
        feedback_channel: Option<ChannelId>,
        brand: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            feedback_channel,
            brand: brand.into(),
        }
    }

    pub fn from_config(platform: Arc<dyn Platform>, config: &TicketryConfig) -> Self {
        Self::new(
            platform,
            config
                .feedback
                .channel_id
                .map(|id| ChannelId::new(id.to_string())),
            config.bot.brand_name.clone(),
        )
    }

    /// Direct-message the rating prompt. Returns whether it was delivered.
    pub async fn send_prompt(&self, user: &UserId, description: &str, staff: Option<&str>) -> bool {
        let prompt = messages::feedback_prompt(&self.brand, description, staff);
        match self.platform.send_direct(user, prompt).await {
            Ok(_) => {
                debug!(user_id = %user, "feedback prompt delivered");
                true
            }
            Err(e) => {
                warn!(user_id = %user, error = %e, "could not send feedback prompt");
                false
            }
        }
    }

    /// Post a review card to the feedback channel. Returns whether it was posted.
    pub async fn publish(
        &self,
        reviewer: &UserProfile,
        rating: Rating,
        description: &str,
        comment: &str,
    ) -> bool {
        let Some(channel) = &self.feedback_channel else {
            warn!(
                user_id = %reviewer.id,
                "no feedback channel configured, review dropped"
            );
            return false;
        };

        let card = messages::review(reviewer, rating, description, comment, &self.brand, Utc::now());
        match self.platform.send_message(channel, card).await {
            Ok(_) => {
                info!(
                    user_id = %reviewer.id,
                    rating = rating.get(),
                    channel_id = %channel,
                    "review published"
                );
                true
            }
            Err(e) => {
                warn!(
                    user_id = %reviewer.id,
                    channel_id = %channel,
                    error = %e,
                    "could not publish review"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketry_test_utils::MockPlatform;

    fn rating(n: u8) -> Rating {
        Rating::new(n).unwrap()
    }

    #[test]
    fn star_bar_has_rating_filled_symbols() {
        for n in 1..=5u8 {
            let bar = star_bar(rating(n));
            assert_eq!(bar.chars().filter(|c| *c == FILLED_STAR).count(), n as usize);
            assert_eq!(
                bar.chars().filter(|c| *c == EMPTY_STAR).count(),
                5 - n as usize
            );
        }
    }

    #[test]
    fn colour_bands_cover_every_rating() {
        let bands: Vec<u32> = (1..=5).map(|n| rating_colour(rating(n))).collect();
        assert_eq!(bands, [0xe74c3c, 0xe67e22, 0xf39c12, 0x2ecc71, 0x27ae60]);
    }

    #[tokio::test]
    async fn prompt_failure_is_reported_not_raised() {
        let platform = Arc::new(MockPlatform::new());
        platform.block_direct_messages(&UserId::new("42"));
        let relay = NotificationRelay::new(platform.clone(), None, "Desk");

        assert!(!relay.send_prompt(&UserId::new("42"), "Svc", None).await);
        assert!(relay.send_prompt(&UserId::new("43"), "Svc", None).await);
        assert_eq!(platform.direct_messages(&UserId::new("43")).len(), 1);
    }

    #[tokio::test]
    async fn publish_without_channel_returns_false() {
        let platform = Arc::new(MockPlatform::new());
        let relay = NotificationRelay::new(platform.clone(), None, "Desk");
        let reviewer = UserProfile::new("42", "alice");

        assert!(!relay.publish(&reviewer, rating(5), "Svc", "").await);
        assert!(platform.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn publish_posts_to_feedback_channel() {
        let platform = Arc::new(MockPlatform::new());
        let feedback = platform.add_channel("feedback");
        let relay = NotificationRelay::new(platform.clone(), Some(feedback.clone()), "Desk");
        let reviewer = UserProfile::new("42", "alice");

        assert!(relay.publish(&reviewer, rating(2), "Svc", "slow").await);
        let posted = platform.channel_messages(&feedback);
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].embeds[0].colour, 0xe67e22);
    }

    #[tokio::test]
    async fn publish_failure_returns_false() {
        let platform = Arc::new(MockPlatform::new());
        let relay = NotificationRelay::new(platform.clone(), Some(ChannelId::new("gone")), "Desk");
        let reviewer = UserProfile::new("42", "alice");

        assert!(!relay.publish(&reviewer, rating(5), "Svc", "").await);
    }
}
