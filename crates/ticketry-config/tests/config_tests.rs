// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Ticketry configuration system.

use ticketry_config::diagnostic::ConfigError;
use ticketry_config::{load_and_validate_str, load_config_from_str};

/// A fully populated file deserializes into the expected values.
#[test]
fn valid_toml_deserializes_into_ticketry_config() {
    let toml = r#"
[bot]
token = "abc.def"
guild_id = 1406416544451399832
support_role_id = 1406420130044313772
admin_role_id = 1406420130044313772
brand_name = "Romel's Stock"
log_level = "debug"

[storage]
document_path = "/tmp/tickets.json"

[tickets]
channel_prefix = "order"
close_delay_secs = 5

[feedback]
channel_id = 1429250208016896040
session_ttl_secs = 0
comment_max_length = 300

[[services]]
key = "limiteds"
label = "Limiteds"
description = "Buy or sell Limited items"
trade = true
emoji = "<:lim:1429231822646018149>"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.token.as_deref(), Some("abc.def"));
    assert_eq!(config.bot.guild_id, Some(1406416544451399832));
    assert_eq!(config.bot.support_role_id, Some(1406420130044313772));
    assert_eq!(config.bot.brand_name, "Romel's Stock");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.storage.document_path, "/tmp/tickets.json");
    assert_eq!(config.tickets.channel_prefix, "order");
    assert_eq!(config.tickets.close_delay_secs, 5);
    assert_eq!(config.feedback.channel_id, Some(1429250208016896040));
    assert_eq!(config.feedback.session_ttl_secs, 0);
    assert_eq!(config.feedback.comment_max_length, 300);
    assert_eq!(config.services.len(), 1);
    assert!(config.services[0].trade);
    assert_eq!(
        config.services[0].emoji.as_deref(),
        Some("<:lim:1429231822646018149>")
    );
}

/// Unknown keys are rejected and reported with a suggestion.
#[test]
fn unknown_key_produces_suggestion() {
    let toml = r#"
[bot]
tokne = "abc"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, suggestion: Some(s), .. } if key == "tokne" && s == "token"
    )));
}

/// Wrong value types are reported as InvalidType.
#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[tickets]
close_delay_secs = "soon"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_errors_surface_through_load() {
    let toml = r#"
[tickets]
channel_prefix = ""
"#;

    let errors = load_and_validate_str(toml).expect_err("empty prefix is invalid");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("channel_prefix"))
    ));
}

/// An empty file is a valid configuration.
#[test]
fn empty_file_is_valid() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.services.len(), 3);
    assert!(config.bot.token.is_none());
}

/// `TICKETRY_<SECTION>_<KEY>` variables override file and default values.
#[test]
#[serial_test::serial]
fn env_vars_override_defaults() {
    // SAFETY: serialized with every other test that touches the environment.
    unsafe {
        std::env::set_var("TICKETRY_BOT_BRAND_NAME", "Env Desk");
        std::env::set_var("TICKETRY_TICKETS_CLOSE_DELAY_SECS", "7");
    }
    let loaded = ticketry_config::load_config();
    unsafe {
        std::env::remove_var("TICKETRY_BOT_BRAND_NAME");
        std::env::remove_var("TICKETRY_TICKETS_CLOSE_DELAY_SECS");
    }

    let config = loaded.expect("env overrides should deserialize");
    assert_eq!(config.bot.brand_name, "Env Desk");
    assert_eq!(config.tickets.close_delay_secs, 7);
}
