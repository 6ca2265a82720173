// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for every message the desk sends.
//!
//! Kept free of I/O so the wording and control identifiers can be asserted
//! directly in tests.

use chrono::{DateTime, Utc};

use ticketry_config::TicketryConfig;
use ticketry_config::model::ServiceConfig;
use ticketry_core::event::{
    CLOSE_BUTTON, CLOSE_CANCEL, CLOSE_CONFIRM, COMMENT_FIELD, COMMENT_FORM, RATING_SELECT,
    SERVICE_SELECT, TRADE_SELECT_PREFIX,
};
use ticketry_core::message::{
    ActionRow, Button, ButtonStyle, Embed, Form, FormInput, OutboundMessage, SelectMenu,
    SelectOption,
};
use ticketry_core::{ChannelId, Rating, RoleId, TicketRecord, TradeAction, UserProfile};

use crate::relay::{rating_colour, star_bar};

pub const INFO_COLOUR: u32 = 0x3498db;
pub const SUCCESS_COLOUR: u32 = 0x27ae60;
pub const DANGER_COLOUR: u32 = 0xe74c3c;
pub const CLOSED_COLOUR: u32 = 0x95a5a6;

pub const GENERIC_ERROR: &str = "An error occurred. Please try again.";
pub const CREATION_FAILED: &str = "Failed to create ticket. Please try again.";
pub const SESSION_EXPIRED: &str = "Session expired. Please try rating again.";
pub const CLOSE_CANCELLED: &str = "Ticket closure cancelled.";
pub const RESET_DONE: &str = "All ticket data has been reset.";

/// Service line used when a review arrives without a prompted ticket behind it.
pub const UNSPECIFIED_SERVICE: &str = "Unspecified";

/// Entry panel listing every configured service.
pub fn panel(config: &TicketryConfig) -> OutboundMessage {
    let brand = &config.bot.brand_name;
    let embed = Embed::new(
        format!("🎫 {brand} Tickets"),
        "**Open a ticket to purchase our stock.**\n\n\
         **Check our current stock before opening a ticket.**",
        INFO_COLOUR,
    )
    .footer(format!("{brand} • Quality Service"));

    let options = config
        .services
        .iter()
        .map(|service| SelectOption {
            label: service.label.clone(),
            value: service.key.clone(),
            description: (!service.description.is_empty()).then(|| service.description.clone()),
            emoji: service.emoji.clone(),
        })
        .collect();

    OutboundMessage::new()
        .with_embed(embed)
        .with_row(ActionRow::Select(SelectMenu {
            control: SERVICE_SELECT.to_string(),
            placeholder: "Choose a service...".to_string(),
            options,
        }))
}

/// Ephemeral buy/sell choice for a trade service.
pub fn trade_choice(service: &ServiceConfig) -> OutboundMessage {
    let title = match &service.emoji {
        Some(emoji) => format!("{emoji} {}", service.label),
        None => service.label.clone(),
    };
    let lower = service.label.to_lowercase();
    let option = |action: TradeAction, label: String, description: String| SelectOption {
        label,
        value: format!("{action}_{}", service.key),
        description: Some(description),
        emoji: service.emoji.clone(),
    };

    OutboundMessage::new()
        .with_embed(Embed::new(title, "Choose your transaction type:", INFO_COLOUR))
        .with_row(ActionRow::Select(SelectMenu {
            control: format!("{TRADE_SELECT_PREFIX}{}", service.key),
            placeholder: "Select buy or sell...".to_string(),
            options: vec![
                option(
                    TradeAction::Buy,
                    format!("Buy {}", service.label),
                    format!("Purchase {lower}"),
                ),
                option(
                    TradeAction::Sell,
                    format!("Sell {}", service.label),
                    format!("Sell your {lower}"),
                ),
            ],
        }))
        .ephemeral()
}

/// Ephemeral placeholder shown while the ticket channel is set up.
pub fn creating_ticket() -> OutboundMessage {
    OutboundMessage::new()
        .with_embed(Embed::new(
            "Creating your ticket...",
            "Setting up your support channel",
            INFO_COLOUR,
        ))
        .ephemeral()
}

pub fn ticket_conflict(channel: &ChannelId) -> OutboundMessage {
    OutboundMessage::new().with_embed(Embed::new(
        "Already Have Open Ticket",
        format!(
            "You already have an active ticket: {}\n\nPlease close it before creating a new one.",
            channel.mention()
        ),
        DANGER_COLOUR,
    ))
}

pub fn ticket_created(ticket: &TicketRecord) -> OutboundMessage {
    OutboundMessage::new().with_embed(Embed::new(
        "Ticket Created",
        format!(
            "**Channel:** {}\n**Service:** {}\n\nStaff will assist you shortly.",
            ticket.channel_id.mention(),
            ticket.description
        ),
        SUCCESS_COLOUR,
    ))
}

pub fn creation_failed() -> OutboundMessage {
    OutboundMessage::text(CREATION_FAILED)
}

/// First message in a new ticket channel; pings the owner and the support role.
pub fn ticket_intro(
    ticket: &TicketRecord,
    support_role: Option<&RoleId>,
    brand: &str,
) -> OutboundMessage {
    let content = match support_role {
        Some(role) => format!("{} {}", ticket.user_id.mention(), role.mention()),
        None => ticket.user_id.mention(),
    };
    let embed = Embed::new(
        format!("Ticket #{}", ticket.number),
        format!(
            "**Service:** {}\n**Client:** {}\n**Created:** <t:{}:R>",
            ticket.description,
            ticket.user_id.mention(),
            ticket.created_at.timestamp()
        ),
        INFO_COLOUR,
    )
    .field(
        "Getting Started",
        "Please provide details about what you need. Our team will assist you shortly.",
        false,
    )
    .footer(format!("{brand} • Quality Service"));

    OutboundMessage::text(content)
        .with_embed(embed)
        .with_row(ActionRow::Buttons(vec![
            Button::new(CLOSE_BUTTON, "Close Ticket", ButtonStyle::Danger).emoji("🔒"),
        ]))
}

pub fn close_confirmation() -> OutboundMessage {
    OutboundMessage::new()
        .with_embed(Embed::new(
            "Close Ticket",
            "Are you sure you want to close this ticket? A feedback request will be sent to the user.",
            DANGER_COLOUR,
        ))
        .with_row(ActionRow::Buttons(vec![
            Button::new(CLOSE_CONFIRM, "Confirm Close", ButtonStyle::Danger),
            Button::new(CLOSE_CANCEL, "Cancel", ButtonStyle::Secondary),
        ]))
        .ephemeral()
}

pub fn close_cancelled() -> OutboundMessage {
    OutboundMessage::text(CLOSE_CANCELLED)
}

/// Posted in the ticket channel just before it is deleted.
pub fn closure_notice(closer: &UserProfile, prompt_delivered: bool) -> OutboundMessage {
    let follow_up = if prompt_delivered {
        "Feedback request sent to user."
    } else {
        "The user could not be reached for feedback."
    };
    OutboundMessage::new().with_embed(Embed::new(
        "Ticket Closed",
        format!("Closed by {}\n\n{follow_up}", closer.id.mention()),
        CLOSED_COLOUR,
    ))
}

/// Direct message asking the ticket owner for a rating.
pub fn feedback_prompt(brand: &str, description: &str, staff: Option<&str>) -> OutboundMessage {
    let embed = Embed::new(
        "How was your experience?",
        format!(
            "Thank you for using {brand} for **{description}**.\n\n\
             Your feedback helps us improve our service."
        ),
        INFO_COLOUR,
    )
    .field(
        "Service Details",
        format!(
            "**Service:** {description}\n**Completed by:** {}",
            staff.unwrap_or("Our Team")
        ),
        false,
    )
    .footer(brand.to_string());

    let options = Rating::all_descending()
        .map(|rating| {
            let (label, blurb) = rating.label();
            SelectOption {
                label: label.to_string(),
                value: rating.control_value(),
                description: Some(blurb.to_string()),
                emoji: Some("⭐".to_string()),
            }
        })
        .collect();

    OutboundMessage::new()
        .with_embed(embed)
        .with_row(ActionRow::Select(SelectMenu {
            control: RATING_SELECT.to_string(),
            placeholder: "Select your rating...".to_string(),
            options,
        }))
}

/// Optional free-text follow-up opened after a rating is picked.
pub fn comment_form(max_length: u16) -> Form {
    Form {
        control: COMMENT_FORM.to_string(),
        title: "Add Your Feedback (Optional)".to_string(),
        inputs: vec![FormInput {
            field: COMMENT_FIELD.to_string(),
            label: "Your comments (optional)".to_string(),
            placeholder: Some("Share your experience or suggestions...".to_string()),
            required: false,
            max_length,
            paragraph: true,
        }],
    }
}

/// Public review card for the feedback channel.
///
/// The comment field is omitted when the comment is blank.
pub fn review(
    reviewer: &UserProfile,
    rating: Rating,
    description: &str,
    comment: &str,
    brand: &str,
    at: DateTime<Utc>,
) -> OutboundMessage {
    let mut embed = Embed::new(
        "Customer Review",
        format!(
            "**Rating:** {rating}/5 {}\n**Service:** {description}",
            star_bar(rating)
        ),
        rating_colour(rating),
    )
    .field("Reviewed By", reviewer.tag.clone(), true)
    .field("User ID", format!("`{}`", reviewer.id), true)
    .field("Time", format!("<t:{}:f>", at.timestamp()), true)
    .footer(format!("{brand} • Customer Feedback"));

    if let Some(avatar) = &reviewer.avatar_url {
        embed = embed.thumbnail(avatar.clone());
    }
    let comment = comment.trim();
    if !comment.is_empty() {
        embed = embed.field("Comment", comment, false);
    }

    OutboundMessage::new().with_embed(embed)
}

pub fn feedback_thanks() -> OutboundMessage {
    OutboundMessage::new()
        .with_embed(Embed::new(
            "Thank you for your feedback!",
            "Your review has been recorded and helps us improve our service.",
            SUCCESS_COLOUR,
        ))
        .ephemeral()
}

pub fn session_expired() -> OutboundMessage {
    OutboundMessage::text(SESSION_EXPIRED).ephemeral()
}

pub fn generic_error() -> OutboundMessage {
    OutboundMessage::text(GENERIC_ERROR)
}

pub fn reset_done() -> OutboundMessage {
    OutboundMessage::text(RESET_DONE)
}
