// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway event handling: interaction routing and admin text commands.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    ActionRow as DiscordActionRow, ActionRowComponent, ActivityData, ComponentInteraction,
    ComponentInteractionDataKind, Context, EventHandler, GuildId, Interaction, Message,
    ModalInteraction, Permissions, Ready, RoleId,
};
use tracing::{debug, error, info, warn};

use ticketry_agent::Dispatcher;
use ticketry_core::{AdminCommand, ChannelId, InteractionEvent};

use crate::convert;
use crate::responder::DiscordResponder;

/// Text commands recognised in guild channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCommand {
    SetupTickets,
    ResetTickets,
}

/// Matches a message body against the admin commands.
pub fn parse_command(content: &str) -> Option<TextCommand> {
    match content.trim() {
        "!setup-tickets" => Some(TextCommand::SetupTickets),
        "!reset-tickets" => Some(TextCommand::ResetTickets),
        _ => None,
    }
}

/// Returns `true` if `roles` include the configured admin role.
///
/// With no admin role configured nobody holds it.
pub fn has_admin_role(roles: &[RoleId], admin_role: Option<RoleId>) -> bool {
    admin_role.is_some_and(|admin| roles.contains(&admin))
}

/// Guild owners and members with any role granting Administrator.
pub fn grants_administrator(
    is_owner: bool,
    role_permissions: impl IntoIterator<Item = Permissions>,
) -> bool {
    is_owner
        || role_permissions
            .into_iter()
            .any(|permissions| permissions.administrator())
}

/// Publishing the panel is open to guild administrators as well as the
/// admin role; wiping ticket history needs the admin role.
pub fn may_run(
    command: TextCommand,
    roles: &[RoleId],
    admin_role: Option<RoleId>,
    is_administrator: bool,
) -> bool {
    match command {
        TextCommand::SetupTickets => is_administrator || has_admin_role(roles, admin_role),
        TextCommand::ResetTickets => has_admin_role(roles, admin_role),
    }
}

/// Collects the text inputs of a submitted modal by field id.
pub fn form_fields(rows: &[DiscordActionRow]) -> HashMap<String, String> {
    rows.iter()
        .flat_map(|row| row.components.iter())
        .filter_map(|component| match component {
            ActionRowComponent::InputText(input) => Some((
                input.custom_id.clone(),
                input.value.clone().unwrap_or_default(),
            )),
            _ => None,
        })
        .collect()
}

/// Converts a component interaction. Returns `None` for component kinds the
/// desk never sends (user, role, and channel selects).
pub fn component_event(interaction: &ComponentInteraction) -> Option<InteractionEvent> {
    let actor = convert::profile(&interaction.user);
    let channel_id = Some(ChannelId::new(interaction.channel_id.to_string()));
    let control = interaction.data.custom_id.clone();
    match &interaction.data.kind {
        ComponentInteractionDataKind::StringSelect { values } => Some(InteractionEvent::Selection {
            actor,
            channel_id,
            control,
            values: values.clone(),
        }),
        ComponentInteractionDataKind::Button => Some(InteractionEvent::ButtonPress {
            actor,
            channel_id,
            control,
        }),
        _ => None,
    }
}

pub fn modal_event(interaction: &ModalInteraction) -> InteractionEvent {
    InteractionEvent::FormSubmit {
        actor: convert::profile(&interaction.user),
        channel_id: Some(ChannelId::new(interaction.channel_id.to_string())),
        form: interaction.data.custom_id.clone(),
        fields: form_fields(&interaction.data.components),
    }
}

/// serenity event handler feeding the [`Dispatcher`].
pub struct Handler {
    dispatcher: Arc<Dispatcher>,
    guild_id: GuildId,
    admin_role: Option<RoleId>,
    presence: String,
}

impl Handler {
    pub fn new(dispatcher: Arc<Dispatcher>, guild_id: GuildId, admin_role: Option<RoleId>) -> Self {
        let presence = dispatcher.config().bot.brand_name.clone();
        Self {
            dispatcher,
            guild_id,
            admin_role,
            presence,
        }
    }

    async fn run_command(&self, ctx: &Context, msg: &Message, command: TextCommand) {
        let channel_id = ChannelId::new(msg.channel_id.to_string());
        let admin = match command {
            TextCommand::SetupTickets => AdminCommand::PublishPanel { channel_id },
            TextCommand::ResetTickets => AdminCommand::ResetTickets,
        };

        match self.dispatcher.handle_admin(admin).await {
            Ok(Some(reply)) => {
                let builder = convert::create_message(&reply).reference_message(msg);
                if let Err(e) = msg.channel_id.send_message(&ctx.http, builder).await {
                    warn!(error = %e, "failed to answer admin command");
                }
            }
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, ?command, "admin command failed");
                return;
            }
        }

        if command == TextCommand::SetupTickets {
            if let Err(e) = msg.delete(&ctx.http).await {
                debug!(error = %e, "could not delete setup command message");
            }
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.tag(), guilds = ready.guilds.len(), "connected to Discord");
        ctx.set_activity(Some(ActivityData::watching(self.presence.as_str())));
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Component(component) => {
                let Some(event) = component_event(&component) else {
                    debug!(control = %component.data.custom_id, "ignoring unsupported component");
                    return;
                };
                let responder = DiscordResponder::component(ctx.http.clone(), component);
                self.dispatcher.handle(event, &responder).await;
            }
            Interaction::Modal(modal) => {
                let event = modal_event(&modal);
                let responder = DiscordResponder::modal(ctx.http.clone(), modal);
                self.dispatcher.handle(event, &responder).await;
            }
            _ => {}
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || msg.guild_id != Some(self.guild_id) {
            return;
        }
        let Some(command) = parse_command(&msg.content) else {
            return;
        };

        let roles = msg
            .member
            .as_ref()
            .map(|member| member.roles.as_slice())
            .unwrap_or_default();
        // Resolved from the cache; the guild reference must not live across awaits.
        let is_administrator = msg.guild(&ctx.cache).is_some_and(|guild| {
            let everyone = RoleId::new(guild.id.get());
            grants_administrator(
                guild.owner_id == msg.author.id,
                std::iter::once(&everyone)
                    .chain(roles)
                    .filter_map(|id| guild.roles.get(id))
                    .map(|role| role.permissions),
            )
        });
        if !may_run(command, roles, self.admin_role, is_administrator) {
            debug!(user = %msg.author.id, ?command, "admin command from unauthorized member");
            return;
        }

        info!(user = %msg.author.id, ?command, "running admin command");
        self.run_command(&ctx, &msg, command).await;
    }
}
