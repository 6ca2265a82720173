// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock interaction responder.
//!
//! Records every successful response and enforces the one-initial-response
//! rule the real platform applies, so double acknowledgements fail in tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use ticketry_core::message::{Form, OutboundMessage};
use ticketry_core::{Responder, TicketryError};

/// One recorded response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponderCall {
    Reply(OutboundMessage),
    EditReply(OutboundMessage),
    DeferUpdate,
    UpdateMessage(OutboundMessage),
    ShowForm(Form),
}

/// Captures the answers to a single interaction.
#[derive(Default)]
pub struct MockResponder {
    calls: Mutex<Vec<ResponderCall>>,
    acknowledged: AtomicBool,
    fail: AtomicBool,
}

impl MockResponder {
    pub fn new() -> Self {
        Self::default()
    }

    fn calls_guard(&self) -> MutexGuard<'_, Vec<ResponderCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every successful response, in order.
    pub fn calls(&self) -> Vec<ResponderCall> {
        self.calls_guard().clone()
    }

    pub fn last(&self) -> Option<ResponderCall> {
        self.calls_guard().last().cloned()
    }

    /// Make every response fail, as if the interaction token had expired.
    pub fn fail_all(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check_failure(&self) -> Result<(), TicketryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TicketryError::Platform {
                message: "unknown interaction".to_string(),
                source: None,
            });
        }
        Ok(())
    }

    fn initial(&self, call: ResponderCall) -> Result<(), TicketryError> {
        self.check_failure()?;
        if self.acknowledged.swap(true, Ordering::SeqCst) {
            return Err(TicketryError::Platform {
                message: "interaction has already been acknowledged".to_string(),
                source: None,
            });
        }
        self.calls_guard().push(call);
        Ok(())
    }
}

#[async_trait]
impl Responder for MockResponder {
    fn is_acknowledged(&self) -> bool {
        self.acknowledged.load(Ordering::SeqCst)
    }

    async fn reply(&self, msg: OutboundMessage) -> Result<(), TicketryError> {
        self.initial(ResponderCall::Reply(msg))
    }

    async fn edit_reply(&self, msg: OutboundMessage) -> Result<(), TicketryError> {
        self.check_failure()?;
        if !self.is_acknowledged() {
            return Err(TicketryError::Platform {
                message: "no response to edit".to_string(),
                source: None,
            });
        }
        self.calls_guard().push(ResponderCall::EditReply(msg));
        Ok(())
    }

    async fn defer_update(&self) -> Result<(), TicketryError> {
        self.initial(ResponderCall::DeferUpdate)
    }

    async fn update_message(&self, msg: OutboundMessage) -> Result<(), TicketryError> {
        self.initial(ResponderCall::UpdateMessage(msg))
    }

    async fn show_form(&self, form: Form) -> Result<(), TicketryError> {
        self.initial(ResponderCall::ShowForm(form))
    }
}
