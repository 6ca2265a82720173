// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`Responder`] over a Discord component or modal interaction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serenity::all::{ComponentInteraction, CreateInteractionResponse, Http, ModalInteraction};

use ticketry_core::message::{Form, OutboundMessage};
use ticketry_core::{Responder, TicketryError};

use crate::convert;

enum Target {
    Component(Box<ComponentInteraction>),
    Modal(Box<ModalInteraction>),
}

/// Answers one interaction. Discord accepts exactly one initial response per
/// interaction; later output goes through [`Responder::edit_reply`].
pub struct DiscordResponder {
    http: Arc<Http>,
    target: Target,
    acknowledged: AtomicBool,
}

impl DiscordResponder {
    pub fn component(http: Arc<Http>, interaction: ComponentInteraction) -> Self {
        Self::with_target(http, Target::Component(Box::new(interaction)))
    }

    pub fn modal(http: Arc<Http>, interaction: ModalInteraction) -> Self {
        Self::with_target(http, Target::Modal(Box::new(interaction)))
    }

    fn with_target(http: Arc<Http>, target: Target) -> Self {
        Self {
            http,
            target,
            acknowledged: AtomicBool::new(false),
        }
    }

    async fn respond(&self, response: CreateInteractionResponse) -> Result<(), TicketryError> {
        let result = match &self.target {
            Target::Component(interaction) => interaction.create_response(&self.http, response).await,
            Target::Modal(interaction) => interaction.create_response(&self.http, response).await,
        };
        result.map_err(|e| TicketryError::platform("failed to respond to interaction", e))?;
        self.acknowledged.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Responder for DiscordResponder {
    fn is_acknowledged(&self) -> bool {
        self.acknowledged.load(Ordering::SeqCst)
    }

    async fn reply(&self, msg: OutboundMessage) -> Result<(), TicketryError> {
        self.respond(CreateInteractionResponse::Message(convert::response_message(&msg)))
            .await
    }

    async fn edit_reply(&self, msg: OutboundMessage) -> Result<(), TicketryError> {
        let edit = convert::edit_response(&msg);
        let result = match &self.target {
            Target::Component(interaction) => interaction.edit_response(&self.http, edit).await,
            Target::Modal(interaction) => interaction.edit_response(&self.http, edit).await,
        };
        result
            .map(|_| ())
            .map_err(|e| TicketryError::platform("failed to edit interaction response", e))
    }

    async fn defer_update(&self) -> Result<(), TicketryError> {
        self.respond(CreateInteractionResponse::Acknowledge).await
    }

    async fn update_message(&self, msg: OutboundMessage) -> Result<(), TicketryError> {
        self.respond(CreateInteractionResponse::UpdateMessage(
            convert::response_message(&msg),
        ))
        .await
    }

    async fn show_form(&self, form: Form) -> Result<(), TicketryError> {
        self.respond(CreateInteractionResponse::Modal(convert::modal(&form)))
            .await
    }
}
