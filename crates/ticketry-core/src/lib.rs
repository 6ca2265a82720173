// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ticketry support desk.
//!
//! This crate provides the error type, identifiers, the persisted ticket
//! document, the platform-neutral message and event model, and the traits
//! every chat platform adapter implements.

pub mod error;
pub mod event;
pub mod message;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TicketryError;
pub use event::{AdminCommand, InteractionEvent};
pub use message::OutboundMessage;
pub use traits::{Platform, Responder};
pub use types::{
    ChannelId, MessageId, Rating, RoleId, TicketDocument, TicketRecord, TicketRequest,
    TradeAction, UserId, UserProfile,
};
