// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation between the platform-neutral message model and serenity
//! builders, plus snowflake parsing for identifiers.

use serenity::all as discord;
use serenity::all::{
    CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter, CreateInputText,
    CreateInteractionResponseMessage, CreateMessage, CreateModal, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption, EditInteractionResponse, InputTextStyle,
    ReactionType, Timestamp,
};

use ticketry_core::message::{ActionRow, Button, ButtonStyle, Embed, Form, OutboundMessage, SelectMenu};
use ticketry_core::{ChannelId, RoleId, TicketryError, UserId, UserProfile};

/// Parses a snowflake identifier. Zero is rejected because serenity ids are non-zero.
pub fn snowflake(kind: &str, id: &str) -> Result<u64, TicketryError> {
    match id.parse::<u64>() {
        Ok(0) | Err(_) => Err(TicketryError::InvalidInteraction(format!(
            "{kind} id `{id}` is not a valid snowflake"
        ))),
        Ok(value) => Ok(value),
    }
}

pub fn channel_id(id: &ChannelId) -> Result<discord::ChannelId, TicketryError> {
    snowflake("channel", id.as_str()).map(discord::ChannelId::new)
}

pub fn user_id(id: &UserId) -> Result<discord::UserId, TicketryError> {
    snowflake("user", id.as_str()).map(discord::UserId::new)
}

pub fn role_id(id: &RoleId) -> Result<discord::RoleId, TicketryError> {
    snowflake("role", id.as_str()).map(discord::RoleId::new)
}

/// Profile of a Discord user as the desk sees it.
pub fn profile(user: &discord::User) -> UserProfile {
    UserProfile {
        id: UserId::new(user.id.to_string()),
        tag: user.tag(),
        avatar_url: Some(user.face()),
    }
}

/// Parses an emoji string: a unicode emoji or a custom `<:name:id>` reference.
pub fn reaction(emoji: &str) -> Option<ReactionType> {
    ReactionType::try_from(emoji).ok()
}

pub fn embed(source: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new().colour(source.colour);
    if !source.title.is_empty() {
        builder = builder.title(&source.title);
    }
    if !source.description.is_empty() {
        builder = builder.description(&source.description);
    }
    for field in &source.fields {
        builder = builder.field(&field.name, &field.value, field.inline);
    }
    if let Some(footer) = &source.footer {
        builder = builder.footer(CreateEmbedFooter::new(footer));
    }
    if let Some(url) = &source.thumbnail {
        builder = builder.thumbnail(url);
    }
    if source.timestamp {
        builder = builder.timestamp(Timestamp::now());
    }
    builder
}

fn button_style(style: ButtonStyle) -> discord::ButtonStyle {
    match style {
        ButtonStyle::Primary => discord::ButtonStyle::Primary,
        ButtonStyle::Secondary => discord::ButtonStyle::Secondary,
        ButtonStyle::Success => discord::ButtonStyle::Success,
        ButtonStyle::Danger => discord::ButtonStyle::Danger,
    }
}

fn button(source: &Button) -> CreateButton {
    let mut builder = CreateButton::new(&source.control)
        .label(&source.label)
        .style(button_style(source.style));
    if let Some(emoji) = source.emoji.as_deref().and_then(reaction) {
        builder = builder.emoji(emoji);
    }
    builder
}

fn select_menu(source: &SelectMenu) -> CreateSelectMenu {
    let options = source
        .options
        .iter()
        .map(|option| {
            let mut builder = CreateSelectMenuOption::new(&option.label, &option.value);
            if let Some(description) = &option.description {
                builder = builder.description(description);
            }
            if let Some(emoji) = option.emoji.as_deref().and_then(reaction) {
                builder = builder.emoji(emoji);
            }
            builder
        })
        .collect();
    CreateSelectMenu::new(&source.control, CreateSelectMenuKind::String { options })
        .placeholder(&source.placeholder)
}

pub fn action_row(row: &ActionRow) -> CreateActionRow {
    match row {
        ActionRow::Buttons(buttons) => CreateActionRow::Buttons(buttons.iter().map(button).collect()),
        ActionRow::Select(menu) => CreateActionRow::SelectMenu(select_menu(menu)),
    }
}

fn embeds(msg: &OutboundMessage) -> Vec<CreateEmbed> {
    msg.embeds.iter().map(embed).collect()
}

fn components(msg: &OutboundMessage) -> Vec<CreateActionRow> {
    msg.components.iter().map(action_row).collect()
}

/// A channel post or direct message. `ephemeral` does not apply here.
pub fn create_message(msg: &OutboundMessage) -> CreateMessage {
    let mut builder = CreateMessage::new()
        .embeds(embeds(msg))
        .components(components(msg));
    if let Some(content) = &msg.content {
        builder = builder.content(content);
    }
    builder
}

/// Body of an initial interaction response or a message update.
pub fn response_message(msg: &OutboundMessage) -> CreateInteractionResponseMessage {
    let mut builder = CreateInteractionResponseMessage::new()
        .embeds(embeds(msg))
        .components(components(msg));
    if let Some(content) = &msg.content {
        builder = builder.content(content);
    }
    if msg.ephemeral {
        builder = builder.ephemeral(true);
    }
    builder
}

/// Replacement for an earlier response. Absent content clears the old text.
pub fn edit_response(msg: &OutboundMessage) -> EditInteractionResponse {
    EditInteractionResponse::new()
        .content(msg.content.clone().unwrap_or_default())
        .embeds(embeds(msg))
        .components(components(msg))
}

pub fn modal(form: &Form) -> CreateModal {
    let rows = form
        .inputs
        .iter()
        .map(|input| {
            let style = if input.paragraph {
                InputTextStyle::Paragraph
            } else {
                InputTextStyle::Short
            };
            let mut text = CreateInputText::new(style, &input.label, &input.field)
                .required(input.required)
                .max_length(input.max_length);
            if let Some(placeholder) = &input.placeholder {
                text = text.placeholder(placeholder);
            }
            CreateActionRow::InputText(text)
        })
        .collect();
    CreateModal::new(&form.control, &form.title).components(rows)
}
