// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Ticketry support desk.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Ticketry configuration.
///
/// Every section is optional and defaults to sensible values, so an empty
/// file (or no file at all) yields a runnable offline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TicketryConfig {
    /// Bot identity and platform settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Ticket document location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Ticket channel settings.
    #[serde(default)]
    pub tickets: TicketsConfig,

    /// Feedback collection settings.
    #[serde(default)]
    pub feedback: FeedbackConfig,

    /// Services offered on the entry panel.
    #[serde(default = "default_services")]
    pub services: Vec<ServiceConfig>,
}

impl Default for TicketryConfig {
    fn default() -> Self {
        Self {
            bot: BotConfig::default(),
            storage: StorageConfig::default(),
            tickets: TicketsConfig::default(),
            feedback: FeedbackConfig::default(),
            services: default_services(),
        }
    }
}

impl TicketryConfig {
    /// Looks up a service by its key.
    pub fn service(&self, key: &str) -> Option<&ServiceConfig> {
        self.services.iter().find(|s| s.key == key)
    }
}

/// Bot identity and platform configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Platform bot token. `None` disables the platform connection.
    #[serde(default)]
    pub token: Option<String>,

    /// Guild (server) the desk operates in.
    #[serde(default)]
    pub guild_id: Option<u64>,

    /// Role granted access to every ticket channel.
    #[serde(default)]
    pub support_role_id: Option<u64>,

    /// Role allowed to run admin commands. Guild administrators may also
    /// publish the ticket panel without it.
    #[serde(default)]
    pub admin_role_id: Option<u64>,

    /// Name shown in embed footers and the presence line.
    #[serde(default = "default_brand_name")]
    pub brand_name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            guild_id: None,
            support_role_id: None,
            admin_role_id: None,
            brand_name: default_brand_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_brand_name() -> String {
    "Support Desk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Ticket document storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the JSON ticket document.
    #[serde(default = "default_document_path")]
    pub document_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            document_path: default_document_path(),
        }
    }
}

fn default_document_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("ticketry").join("tickets.json"))
        .unwrap_or_else(|| std::path::PathBuf::from("tickets.json"))
        .display()
        .to_string()
}

/// Ticket channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TicketsConfig {
    /// Ticket channels are named `<channel_prefix>-<number>`.
    #[serde(default = "default_channel_prefix")]
    pub channel_prefix: String,

    /// Seconds the closure notice stays visible before the channel is deleted.
    #[serde(default = "default_close_delay_secs")]
    pub close_delay_secs: u64,
}

impl Default for TicketsConfig {
    fn default() -> Self {
        Self {
            channel_prefix: default_channel_prefix(),
            close_delay_secs: default_close_delay_secs(),
        }
    }
}

fn default_channel_prefix() -> String {
    "ticket".to_string()
}

fn default_close_delay_secs() -> u64 {
    3
}

/// Feedback collection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FeedbackConfig {
    /// Channel receiving published reviews. `None` disables publishing.
    #[serde(default)]
    pub channel_id: Option<u64>,

    /// Lifetime of an unanswered feedback session. `0` keeps sessions forever.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Maximum length of the optional review comment.
    #[serde(default = "default_comment_max_length")]
    pub comment_max_length: u16,

    /// Interval between sweeps of expired sessions.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            channel_id: None,
            session_ttl_secs: default_session_ttl_secs(),
            comment_max_length: default_comment_max_length(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_session_ttl_secs() -> u64 {
    86_400
}

fn default_comment_max_length() -> u16 {
    500
}

fn default_sweep_interval_secs() -> u64 {
    300
}

/// A service users can open a ticket for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Stable identifier used in control values and ticket types.
    pub key: String,

    /// Display name on the panel.
    pub label: String,

    /// One-line blurb on the panel option.
    #[serde(default)]
    pub description: String,

    /// Trade services ask "buy or sell?" before a ticket is opened.
    #[serde(default)]
    pub trade: bool,

    /// Optional emoji (unicode or `<:name:id>`).
    #[serde(default)]
    pub emoji: Option<String>,
}

fn default_services() -> Vec<ServiceConfig> {
    vec![
        ServiceConfig {
            key: "limiteds".to_string(),
            label: "Limiteds".to_string(),
            description: "Buy or sell Limited items".to_string(),
            trade: true,
            emoji: None,
        },
        ServiceConfig {
            key: "dahood".to_string(),
            label: "Dahood Skins".to_string(),
            description: "Buy or sell Dahood skins".to_string(),
            trade: true,
            emoji: None,
        },
        ServiceConfig {
            key: "services".to_string(),
            label: "Buying Services".to_string(),
            description: "Professional buying services".to_string(),
            trade: false,
            emoji: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: TicketryConfig = toml::from_str("").unwrap();
        assert_eq!(config.bot.brand_name, "Support Desk");
        assert_eq!(config.tickets.channel_prefix, "ticket");
        assert_eq!(config.tickets.close_delay_secs, 3);
        assert_eq!(config.feedback.session_ttl_secs, 86_400);
        assert_eq!(config.feedback.comment_max_length, 500);
        assert_eq!(config.services.len(), 3);
        assert!(config.storage.document_path.ends_with("tickets.json"));
    }

    #[test]
    fn services_replace_the_default_catalog() {
        let toml_str = r#"
[[services]]
key = "boosting"
label = "Boosting"
trade = false
"#;
        let config: TicketryConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.services.len(), 1);
        assert_eq!(config.services[0].key, "boosting");
        assert!(config.services[0].description.is_empty());
        assert!(config.service("limiteds").is_none());
    }

    #[test]
    fn service_lookup_by_key() {
        let config = TicketryConfig::default();
        assert!(config.service("dahood").unwrap().trade);
        assert!(!config.service("services").unwrap().trade);
    }

    #[test]
    fn services_deny_unknown_fields() {
        let toml_str = r#"
[[services]]
key = "x"
label = "X"
price = 3
"#;
        assert!(toml::from_str::<TicketryConfig>(toml_str).is_err());
    }
}
