// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::TicketryConfig;

/// Upper bound the platform puts on a text input.
const MAX_COMMENT_LENGTH: u16 = 4000;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &TicketryConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.document_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.document_path must not be empty",
        ));
    }

    let prefix = config.tickets.channel_prefix.trim();
    if prefix.is_empty() {
        errors.push(ConfigError::validation(
            "tickets.channel_prefix must not be empty",
        ));
    } else if prefix.chars().any(char::is_whitespace) {
        errors.push(ConfigError::validation(format!(
            "tickets.channel_prefix `{prefix}` must not contain whitespace"
        )));
    }

    let max_len = config.feedback.comment_max_length;
    if max_len == 0 || max_len > MAX_COMMENT_LENGTH {
        errors.push(ConfigError::validation(format!(
            "feedback.comment_max_length must be between 1 and {MAX_COMMENT_LENGTH}, got {max_len}"
        )));
    }

    if config.feedback.sweep_interval_secs == 0 {
        errors.push(ConfigError::validation(
            "feedback.sweep_interval_secs must be at least 1",
        ));
    }

    if let Some(token) = &config.bot.token {
        if token.trim().is_empty() {
            errors.push(ConfigError::validation("bot.token must not be blank"));
        }
    }

    let ids = [
        ("bot.guild_id", config.bot.guild_id),
        ("bot.support_role_id", config.bot.support_role_id),
        ("bot.admin_role_id", config.bot.admin_role_id),
        ("feedback.channel_id", config.feedback.channel_id),
    ];
    for (key, id) in ids {
        if id == Some(0) {
            errors.push(ConfigError::validation(format!("{key} must not be 0")));
        }
    }

    if config.services.is_empty() {
        errors.push(ConfigError::validation(
            "at least one [[services]] entry is required",
        ));
    }

    let mut seen = HashSet::new();
    for (i, service) in config.services.iter().enumerate() {
        let key = service.key.trim();
        if key.is_empty() {
            errors.push(ConfigError::validation(format!(
                "services[{i}].key must not be empty"
            )));
            continue;
        }
        // `_` separates the action from the key in trade control values.
        if key.contains('_') || key.chars().any(char::is_whitespace) {
            errors.push(ConfigError::validation(format!(
                "services[{i}].key `{key}` must not contain `_` or whitespace"
            )));
        }
        if service.label.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "services[{i}].label must not be empty"
            )));
        }
        if !seen.insert(key) {
            errors.push(ConfigError::validation(format!(
                "duplicate service key `{key}` in [[services]]"
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
