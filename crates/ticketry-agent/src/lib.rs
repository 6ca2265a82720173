// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket lifecycle and feedback collection for the Ticketry support desk.
//!
//! The [`Dispatcher`] is the central coordinator that:
//! - Routes platform interaction events to the lifecycle manager and the
//!   feedback sessions
//! - Runs admin commands (panel publishing, ticket reset)
//! - Turns unexpected failures into a generic user notice
//!
//! Components, leaves first: [`relay::NotificationRelay`],
//! [`feedback::FeedbackSessions`], [`scheduler::DeletionScheduler`],
//! [`lifecycle::TicketLifecycle`].

pub mod dispatcher;
pub mod feedback;
pub mod lifecycle;
pub mod messages;
pub mod relay;
pub mod scheduler;
pub mod shutdown;

pub use dispatcher::Dispatcher;
pub use feedback::{FeedbackSession, FeedbackSessions, SubmitOutcome, spawn_session_sweeper};
pub use lifecycle::{CloseOutcome, CreateOutcome, TicketLifecycle};
pub use relay::NotificationRelay;
pub use scheduler::DeletionScheduler;
