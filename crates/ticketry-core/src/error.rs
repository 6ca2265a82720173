// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ticketry support desk.

use thiserror::Error;

/// The primary error type used across the ticket store, lifecycle manager,
/// feedback sessions, and platform adapters.
#[derive(Debug, Error)]
pub enum TicketryError {
    /// Configuration errors (missing token, invalid identifiers).
    #[error("configuration error: {0}")]
    Config(String),

    /// Ticket store errors (file I/O, malformed document, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat platform errors (request failure, rate limiting, missing permissions).
    #[error("platform error: {message}")]
    Platform {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A platform entity (user, channel) could not be resolved.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// An inbound interaction carried data the dispatcher cannot interpret.
    #[error("invalid interaction: {0}")]
    InvalidInteraction(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TicketryError {
    /// Wraps any error as a storage error.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Builds a platform error with an underlying cause.
    pub fn platform(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Platform {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl From<std::io::Error> for TicketryError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err)
    }
}

impl From<serde_json::Error> for TicketryError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage(err)
    }
}
