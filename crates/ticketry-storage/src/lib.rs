// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent ticket store for the Ticketry support desk.
//!
//! The whole state is one JSON document holding every user's ticket history
//! and the global ticket counter. Every accessor re-reads the document from
//! disk and every mutation persists it in full; nothing is cached in memory.

pub mod document;
pub mod models;
pub mod store;

pub use models::*;
pub use store::TicketStore;
