// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Ticketry integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without a live chat platform.
//!
//! # Components
//!
//! - [`MockPlatform`] - In-memory platform with captured sends and injectable failures
//! - [`MockResponder`] - Interaction responder recording every answer
//! - [`TestHarness`] - Full desk stack over a temp ticket document

pub mod harness;
pub mod mock_platform;
pub mod mock_responder;

pub use harness::TestHarness;
pub use mock_platform::{ChannelAccess, MockPlatform};
pub use mock_responder::{MockResponder, ResponderCall};
