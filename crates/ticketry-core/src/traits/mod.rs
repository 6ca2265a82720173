// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between the core and the chat platform.
//!
//! Both traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod platform;
pub mod responder;

pub use platform::Platform;
pub use responder::Responder;
