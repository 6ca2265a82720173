// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound interaction events and admin commands.
//!
//! Control identifiers are shared between the message builders (which emit
//! them) and the dispatcher (which routes on them). They are persisted on
//! messages already posted to Discord, so renaming one orphans every close
//! button and rating prompt sent before the change.

use std::collections::HashMap;

use crate::types::{ChannelId, UserProfile};

/// Service selection on the entry panel.
pub const SERVICE_SELECT: &str = "ticket_type";
/// Prefix of the buy/sell selection; the service key follows.
pub const TRADE_SELECT_PREFIX: &str = "buy_sell_";
/// Button inside a ticket channel requesting closure.
pub const CLOSE_BUTTON: &str = "close_ticket";
pub const CLOSE_CONFIRM: &str = "confirm_close";
pub const CLOSE_CANCEL: &str = "cancel_close";
/// Star rating selection sent by direct message.
pub const RATING_SELECT: &str = "vouch_rating";
/// Optional comment form shown after a rating.
pub const COMMENT_FORM: &str = "vouch_comment_modal";
/// Free-text field of [`COMMENT_FORM`].
pub const COMMENT_FIELD: &str = "vouch_comment";

/// A discrete user interaction delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEvent {
    /// A value was chosen in a selection control.
    Selection {
        actor: UserProfile,
        channel_id: Option<ChannelId>,
        control: String,
        values: Vec<String>,
    },
    /// A button was pressed.
    ButtonPress {
        actor: UserProfile,
        channel_id: Option<ChannelId>,
        control: String,
    },
    /// A form was submitted.
    FormSubmit {
        actor: UserProfile,
        channel_id: Option<ChannelId>,
        form: String,
        fields: HashMap<String, String>,
    },
}

impl InteractionEvent {
    pub fn actor(&self) -> &UserProfile {
        match self {
            Self::Selection { actor, .. }
            | Self::ButtonPress { actor, .. }
            | Self::FormSubmit { actor, .. } => actor,
        }
    }

    pub fn channel_id(&self) -> Option<&ChannelId> {
        match self {
            Self::Selection { channel_id, .. }
            | Self::ButtonPress { channel_id, .. }
            | Self::FormSubmit { channel_id, .. } => channel_id.as_ref(),
        }
    }

    /// The control or form identifier the event originated from.
    pub fn control(&self) -> &str {
        match self {
            Self::Selection { control, .. } | Self::ButtonPress { control, .. } => control,
            Self::FormSubmit { form, .. } => form,
        }
    }
}

/// Privileged commands. Authorization happens in the platform adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    /// (Re)publish the entry panel into `channel_id`.
    PublishPanel { channel_id: ChannelId },
    /// Wipe every user's ticket history; the counter is kept.
    ResetTickets,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rating;

    #[test]
    fn identifiers_match_deployed_components() {
        assert_eq!(SERVICE_SELECT, "ticket_type");
        assert_eq!(format!("{TRADE_SELECT_PREFIX}dahood"), "buy_sell_dahood");
        assert_eq!(
            [CLOSE_BUTTON, CLOSE_CONFIRM, CLOSE_CANCEL],
            ["close_ticket", "confirm_close", "cancel_close"]
        );
        assert_eq!(RATING_SELECT, "vouch_rating");
        assert_eq!(COMMENT_FORM, "vouch_comment_modal");
        assert_eq!(COMMENT_FIELD, "vouch_comment");
    }

    #[test]
    fn rating_values_from_existing_prompts_still_parse() {
        for n in 1..=5u8 {
            assert_eq!(Rating::from_control_value(&format!("vouch_{n}")), Rating::new(n));
        }
    }
}
