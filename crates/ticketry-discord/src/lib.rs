// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord platform adapter for the Ticketry support desk.
//!
//! Implements [`Platform`] over the serenity HTTP client and runs the gateway
//! connection that feeds interactions and admin commands to the
//! [`Dispatcher`].

pub mod convert;
pub mod handler;
pub mod responder;

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    ChannelType, Client, CreateChannel, GatewayIntents, GuildId, Http, PermissionOverwrite,
    PermissionOverwriteType, Permissions,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use ticketry_agent::Dispatcher;
use ticketry_config::TicketryConfig;
use ticketry_core::message::OutboundMessage;
use ticketry_core::{ChannelId, MessageId, Platform, RoleId, TicketryError, UserId, UserProfile};

pub use handler::Handler;
pub use responder::DiscordResponder;

/// Gateway intents the desk needs: guild and member events, message
/// content for the admin commands, and direct messages for feedback.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::DIRECT_MESSAGES
}

fn token(config: &TicketryConfig) -> Result<&str, TicketryError> {
    match config.bot.token.as_deref() {
        Some(token) if !token.trim().is_empty() => Ok(token),
        Some(_) => Err(TicketryError::Config("bot.token cannot be empty".into())),
        None => Err(TicketryError::Config(
            "bot.token is required for the Discord adapter".into(),
        )),
    }
}

fn guild(config: &TicketryConfig) -> Result<GuildId, TicketryError> {
    match config.bot.guild_id {
        Some(id) if id != 0 => Ok(GuildId::new(id)),
        _ => Err(TicketryError::Config(
            "bot.guild_id is required for the Discord adapter".into(),
        )),
    }
}

fn is_not_found(err: &serenity::Error) -> bool {
    matches!(err, serenity::Error::Http(e) if e.status_code().map(|s| s.as_u16()) == Some(404))
}

/// Channel permission overwrites for a ticket: hidden from `@everyone`,
/// open to the owner and, when configured, the support role.
pub fn ticket_overwrites(
    guild_id: GuildId,
    owner: serenity::all::UserId,
    support_role: Option<serenity::all::RoleId>,
) -> Vec<PermissionOverwrite> {
    let mut overwrites = vec![
        PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(guild_id.everyone_role()),
        },
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(owner),
        },
    ];
    if let Some(role) = support_role {
        overwrites.push(PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL
                | Permissions::SEND_MESSAGES
                | Permissions::READ_MESSAGE_HISTORY,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Role(role),
        });
    }
    overwrites
}

/// [`Platform`] backed by the Discord REST API for one guild.
pub struct DiscordPlatform {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl DiscordPlatform {
    /// Creates the adapter. Requires `bot.token` and `bot.guild_id`.
    pub fn new(config: &TicketryConfig) -> Result<Self, TicketryError> {
        let token = token(config)?;
        let guild_id = guild(config)?;
        Ok(Self {
            http: Arc::new(Http::new(token)),
            guild_id,
        })
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }
}

#[async_trait]
impl Platform for DiscordPlatform {
    fn name(&self) -> &str {
        "discord"
    }

    async fn create_private_channel(
        &self,
        name: &str,
        owner: &UserId,
        support_role: Option<&RoleId>,
    ) -> Result<ChannelId, TicketryError> {
        let owner = convert::user_id(owner)?;
        let support_role = support_role.map(convert::role_id).transpose()?;
        let builder = CreateChannel::new(name)
            .kind(ChannelType::Text)
            .permissions(ticket_overwrites(self.guild_id, owner, support_role));

        let channel = self
            .guild_id
            .create_channel(&self.http, builder)
            .await
            .map_err(|e| TicketryError::platform(format!("failed to create channel {name}"), e))?;
        debug!(channel = %channel.id, name, "created ticket channel");
        Ok(ChannelId::new(channel.id.to_string()))
    }

    async fn channel_exists(&self, channel: &ChannelId) -> Result<bool, TicketryError> {
        let id = convert::channel_id(channel)?;
        match id.to_channel(&self.http).await {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(TicketryError::platform("failed to resolve channel", e)),
        }
    }

    async fn send_message(
        &self,
        channel: &ChannelId,
        msg: OutboundMessage,
    ) -> Result<MessageId, TicketryError> {
        let id = convert::channel_id(channel)?;
        let sent = id
            .send_message(&self.http, convert::create_message(&msg))
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    TicketryError::NotFound {
                        kind: "channel".into(),
                        id: channel.to_string(),
                    }
                } else {
                    TicketryError::platform("failed to send channel message", e)
                }
            })?;
        Ok(MessageId::new(sent.id.to_string()))
    }

    async fn send_direct(
        &self,
        user: &UserId,
        msg: OutboundMessage,
    ) -> Result<MessageId, TicketryError> {
        let id = convert::user_id(user)?;
        let sent = id
            .direct_message(&self.http, convert::create_message(&msg))
            .await
            .map_err(|e| TicketryError::platform("failed to send direct message", e))?;
        Ok(MessageId::new(sent.id.to_string()))
    }

    async fn delete_channel(&self, channel: &ChannelId) -> Result<(), TicketryError> {
        let id = convert::channel_id(channel)?;
        id.delete(&self.http).await.map_err(|e| {
            if is_not_found(&e) {
                TicketryError::NotFound {
                    kind: "channel".into(),
                    id: channel.to_string(),
                }
            } else {
                TicketryError::platform("failed to delete channel", e)
            }
        })?;
        Ok(())
    }

    async fn fetch_user(&self, user: &UserId) -> Result<UserProfile, TicketryError> {
        let id = convert::user_id(user)?;
        let fetched = id.to_user(&self.http).await.map_err(|e| {
            if is_not_found(&e) {
                TicketryError::NotFound {
                    kind: "user".into(),
                    id: user.to_string(),
                }
            } else {
                TicketryError::platform("failed to fetch user", e)
            }
        })?;
        Ok(convert::profile(&fetched))
    }
}

/// Connects to the Discord gateway and serves events until `cancel` fires
/// or the connection fails.
pub async fn run(
    config: &TicketryConfig,
    dispatcher: Arc<Dispatcher>,
    cancel: CancellationToken,
) -> Result<(), TicketryError> {
    let token = token(config)?;
    let guild_id = guild(config)?;
    let admin_role = config.bot.admin_role_id.filter(|id| *id != 0).map(serenity::all::RoleId::new);

    let handler = Handler::new(dispatcher, guild_id, admin_role);
    let mut client = Client::builder(token, intents())
        .event_handler(handler)
        .await
        .map_err(|e| TicketryError::platform("failed to build Discord client", e))?;
    let shard_manager = client.shard_manager.clone();

    info!(guild = %guild_id, "starting Discord gateway");
    tokio::select! {
        result = client.start() => {
            result.map_err(|e| TicketryError::platform("Discord gateway connection failed", e))?;
        }
        _ = cancel.cancelled() => {
            info!("stopping Discord gateway");
            shard_manager.shutdown_all().await;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>, guild: Option<u64>) -> TicketryConfig {
        let mut config = TicketryConfig::default();
        config.bot.token = token.map(str::to_string);
        config.bot.guild_id = guild;
        config
    }

    #[test]
    fn platform_requires_token() {
        let err = DiscordPlatform::new(&config(None, Some(1))).err().unwrap();
        assert!(err.to_string().contains("bot.token is required"));
    }

    #[test]
    fn platform_rejects_blank_token() {
        let err = DiscordPlatform::new(&config(Some("  "), Some(1))).err().unwrap();
        assert!(err.to_string().contains("bot.token cannot be empty"));
    }

    #[test]
    fn platform_requires_guild() {
        let err = DiscordPlatform::new(&config(Some("token"), None)).err().unwrap();
        assert!(err.to_string().contains("bot.guild_id is required"));
    }

    #[test]
    fn platform_builds_with_token_and_guild() {
        let platform = DiscordPlatform::new(&config(Some("token"), Some(77))).unwrap();
        assert_eq!(platform.name(), "discord");
        assert_eq!(platform.guild_id(), GuildId::new(77));
    }

    #[test]
    fn overwrites_hide_channel_from_everyone() {
        let guild_id = GuildId::new(1);
        let owner = serenity::all::UserId::new(2);
        let overwrites = ticket_overwrites(guild_id, owner, None);

        assert_eq!(overwrites.len(), 2);
        assert_eq!(
            overwrites[0].kind,
            PermissionOverwriteType::Role(guild_id.everyone_role())
        );
        assert!(overwrites[0].deny.contains(Permissions::VIEW_CHANNEL));
        assert_eq!(overwrites[1].kind, PermissionOverwriteType::Member(owner));
        assert!(overwrites[1].allow.contains(Permissions::SEND_MESSAGES));
    }

    #[test]
    fn overwrites_grant_support_role_history() {
        let role = serenity::all::RoleId::new(5);
        let overwrites =
            ticket_overwrites(GuildId::new(1), serenity::all::UserId::new(2), Some(role));

        assert_eq!(overwrites.len(), 3);
        assert_eq!(overwrites[2].kind, PermissionOverwriteType::Role(role));
        assert!(overwrites[2].allow.contains(Permissions::READ_MESSAGE_HISTORY));
    }

    #[test]
    fn intents_include_message_content() {
        assert!(intents().contains(GatewayIntents::MESSAGE_CONTENT));
        assert!(intents().contains(GatewayIntents::DIRECT_MESSAGES));
    }
}
