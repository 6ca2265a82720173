// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform-neutral outbound message model.
//!
//! Platform adapters translate these into their native builders. The core only
//! describes content, embeds, and interactive controls.

/// A message to post into a channel, a direct message, or an interaction reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundMessage {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub components: Vec<ActionRow>,
    /// Only honoured for interaction replies.
    pub ephemeral: bool,
}

impl OutboundMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plain text message.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn with_row(mut self, row: ActionRow) -> Self {
        self.components.push(row);
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }
}

/// A rich card with a title, body, colour, and optional fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub colour: u32,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
    pub thumbnail: Option<String>,
    /// Stamp the embed with the send time.
    pub timestamp: bool,
}

impl Embed {
    pub fn new(title: impl Into<String>, description: impl Into<String>, colour: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            colour,
            timestamp: true,
            ..Self::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// One row of interactive controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRow {
    Buttons(Vec<Button>),
    Select(SelectMenu),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub control: String,
    pub label: String,
    pub style: ButtonStyle,
    pub emoji: Option<String>,
}

impl Button {
    pub fn new(control: impl Into<String>, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            control: control.into(),
            label: label.into(),
            style,
            emoji: None,
        }
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

/// A single-choice selection control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectMenu {
    pub control: String,
    pub placeholder: String,
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
}

/// A pop-up form with free-text inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub control: String,
    pub title: String,
    pub inputs: Vec<FormInput>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub field: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub required: bool,
    pub max_length: u16,
    /// Multi-line input when `true`.
    pub paragraph: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_embeds_and_rows() {
        let msg = OutboundMessage::text("hello")
            .with_embed(Embed::new("t", "d", 0x3498db).field("a", "b", true))
            .with_row(ActionRow::Buttons(vec![Button::new(
                "x",
                "X",
                ButtonStyle::Danger,
            )]))
            .ephemeral();

        assert_eq!(msg.content.as_deref(), Some("hello"));
        assert_eq!(msg.embeds.len(), 1);
        assert_eq!(msg.embeds[0].fields[0].name, "a");
        assert!(msg.embeds[0].timestamp);
        assert_eq!(msg.components.len(), 1);
        assert!(msg.ephemeral);
    }
}
