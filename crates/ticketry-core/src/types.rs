// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identifiers, ticket records, and the persisted ticket document.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

id_type!(
    /// Platform identifier of a user.
    UserId
);
id_type!(
    /// Platform identifier of a channel (guild text channel or DM).
    ChannelId
);
id_type!(
    /// Platform identifier of a role.
    RoleId
);
id_type!(
    /// Platform identifier of a sent message.
    MessageId
);

impl UserId {
    /// Chat markup that pings this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl ChannelId {
    /// Chat markup that links this channel.
    pub fn mention(&self) -> String {
        format!("<#{}>", self.0)
    }
}

impl RoleId {
    /// Chat markup that pings every member of this role.
    pub fn mention(&self) -> String {
        format!("<@&{}>", self.0)
    }
}

/// A user as seen by the core: the actor of an interaction or a fetched profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    /// Human-readable label (`name` or legacy `name#1234`).
    pub tag: String,
    pub avatar_url: Option<String>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            tag: tag.into(),
            avatar_url: None,
        }
    }
}

/// A star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Returns `None` when `value` is outside `1..=5`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All ratings, best first, in the order the rating control lists them.
    pub fn all_descending() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).rev().map(Rating)
    }

    /// Control value carried by the rating selection (`vouch_4`).
    pub fn control_value(self) -> String {
        format!("vouch_{}", self.0)
    }

    /// Parses a control value produced by [`Rating::control_value`].
    pub fn from_control_value(value: &str) -> Option<Self> {
        value
            .strip_prefix("vouch_")
            .and_then(|n| n.parse::<u8>().ok())
            .and_then(Self::new)
    }

    /// Option label and short blurb shown in the rating control.
    pub fn label(self) -> (&'static str, &'static str) {
        match self.0 {
            5 => ("5 Stars - Excellent", "Perfect service experience"),
            4 => ("4 Stars - Great", "Very good service"),
            3 => ("3 Stars - Good", "Solid service"),
            2 => ("2 Stars - Fair", "Could be better"),
            _ => ("1 Star - Poor", "Needs improvement"),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a trade service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    /// Present participle used in ticket descriptions ("Buying Limiteds").
    pub fn verb(self) -> &'static str {
        match self {
            TradeAction::Buy => "Buying",
            TradeAction::Sell => "Selling",
        }
    }
}

/// What the user asked for when opening a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRequest {
    /// Service classification, e.g. `buy-limiteds` or `services`.
    pub kind: String,
    /// Human-readable summary, e.g. `Buying Limiteds`.
    pub description: String,
}

/// One service request bound to one dedicated channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    pub channel_id: ChannelId,
    pub user_id: UserId,
    #[serde(default)]
    pub user_tag: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub open: bool,
    pub number: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    pub opened_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_by: Option<String>,
}

impl TicketRecord {
    /// Transitions the record to closed. The record itself is kept as history.
    pub fn close(&mut self, closed_by: impl Into<String>, at: DateTime<Utc>) {
        self.open = false;
        self.closed_at = Some(at);
        self.closed_by = Some(closed_by.into());
    }
}

/// The single persisted document: per-user ticket history plus the global counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDocument {
    #[serde(default)]
    pub tickets: BTreeMap<UserId, Vec<TicketRecord>>,
    #[serde(default)]
    pub counter: u64,
}

impl TicketDocument {
    /// The user's open ticket, if any.
    pub fn open_ticket(&self, user: &UserId) -> Option<&TicketRecord> {
        self.tickets.get(user)?.iter().find(|t| t.open)
    }

    /// Locates the open ticket bound to `channel`.
    ///
    /// Scans every user's history: O(total tickets).
    pub fn find_open_by_channel(&self, channel: &ChannelId) -> Option<(&UserId, &TicketRecord)> {
        self.tickets.iter().find_map(|(user, list)| {
            list.iter()
                .find(|t| t.open && &t.channel_id == channel)
                .map(|t| (user, t))
        })
    }

    /// Mutable variant of [`TicketDocument::find_open_by_channel`].
    pub fn find_open_by_channel_mut(&mut self, channel: &ChannelId) -> Option<&mut TicketRecord> {
        self.tickets
            .values_mut()
            .flat_map(|list| list.iter_mut())
            .find(|t| t.open && &t.channel_id == channel)
    }

    /// Number of open tickets across all users.
    pub fn open_count(&self) -> usize {
        self.tickets.values().flatten().filter(|t| t.open).count()
    }

    /// Number of tickets (open and closed) across all users.
    pub fn total_count(&self) -> usize {
        self.tickets.values().map(Vec::len).sum()
    }
}
