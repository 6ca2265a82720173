// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./ticketry.toml` > `~/.config/ticketry/ticketry.toml` >
//! `/etc/ticketry/ticketry.toml`, with `TICKETRY_*` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TicketryConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ticketry/ticketry.toml";
/// Config file in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "ticketry.toml";

/// Sections addressable from the environment.
const ENV_SECTIONS: &[&str] = &["bot", "storage", "tickets", "feedback"];

/// Per-user config file under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ticketry").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ticketry/ticketry.toml`
/// 3. `~/.config/ticketry/ticketry.toml`
/// 4. `./ticketry.toml`
/// 5. `TICKETRY_*` environment variables
pub fn load_config() -> Result<TicketryConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<TicketryConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TicketryConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TicketryConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TicketryConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TicketryConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `TICKETRY_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Keys themselves contain underscores (`support_role_id`), so only the first
/// segment naming a known section is turned into a dot.
fn env_provider() -> Env {
    Env::prefixed("TICKETRY_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}
