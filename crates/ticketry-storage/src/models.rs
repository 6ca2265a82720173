// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for the ticket store.
//!
//! The canonical record types live in `ticketry-core::types` so they can cross
//! the platform boundary; they are re-exported here next to store-only types.

pub use ticketry_core::types::{TicketDocument, TicketRecord};

/// Aggregate counts over the ticket document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSummary {
    /// Users with at least one ticket in their history.
    pub users: usize,
    pub open: usize,
    pub closed: usize,
    /// Last ticket number handed out.
    pub counter: u64,
}

impl From<&TicketDocument> for StoreSummary {
    fn from(doc: &TicketDocument) -> Self {
        let total = doc.total_count();
        let open = doc.open_count();
        Self {
            users: doc.tickets.values().filter(|l| !l.is_empty()).count(),
            open,
            closed: total - open,
            counter: doc.counter,
        }
    }
}
