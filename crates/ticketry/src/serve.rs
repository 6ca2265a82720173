// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ticketry serve` command implementation.
//!
//! Opens the ticket document, wires the dispatcher to the Discord adapter,
//! and runs the gateway until a shutdown signal arrives. Pending channel
//! deletions get a short window to finish on the way out.

use std::sync::Arc;
use std::time::Duration;

use ticketry_agent::{Dispatcher, shutdown, spawn_session_sweeper};
use ticketry_config::TicketryConfig;
use ticketry_core::TicketryError;
use ticketry_storage::TicketStore;
use tracing::{error, info};

#[cfg(feature = "discord")]
use ticketry_discord::DiscordPlatform;

/// How long shutdown waits for scheduled channel deletions.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the `ticketry serve` command.
pub async fn run_serve(config: TicketryConfig) -> Result<(), TicketryError> {
    init_tracing(&config.bot.log_level);

    info!("starting ticketry serve");

    let store = Arc::new(TicketStore::open(&config.storage.document_path)?);
    let summary = store.summary().await?;
    info!(
        path = %store.path().display(),
        open = summary.open,
        closed = summary.closed,
        counter = summary.counter,
        "ticket document loaded"
    );

    #[cfg(feature = "discord")]
    let platform = {
        let p = DiscordPlatform::new(&config).map_err(|e| {
            error!(error = %e, "failed to initialize Discord platform");
            eprintln!(
                "error: Discord credentials required. Set bot.token and bot.guild_id in ticketry.toml \
                 or TICKETRY_BOT_TOKEN / TICKETRY_BOT_GUILD_ID"
            );
            e
        })?;
        Arc::new(p)
    };

    #[cfg(not(feature = "discord"))]
    compile_error!("ticketry requires the 'discord' feature for the platform adapter");

    let dispatcher = Arc::new(Dispatcher::new(config.clone(), store, platform));

    // Install signal handler.
    let cancel = shutdown::install_signal_handler();

    let sweeper = spawn_session_sweeper(
        dispatcher.feedback().clone(),
        Duration::from_secs(config.feedback.sweep_interval_secs),
        cancel.clone(),
    );
    info!(
        ttl_secs = config.feedback.session_ttl_secs,
        interval_secs = config.feedback.sweep_interval_secs,
        "feedback session sweeper started"
    );

    let result = ticketry_discord::run(&config, dispatcher.clone(), cancel.clone()).await;
    if let Err(e) = &result {
        error!(error = %e, "Discord adapter stopped with an error");
    }

    cancel.cancel();
    if let Err(e) = sweeper.await {
        error!(error = %e, "feedback session sweeper panicked");
    }
    shutdown::drain_deletions(dispatcher.scheduler(), DRAIN_TIMEOUT).await;

    result?;
    info!("ticketry serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

/// Our crates log at `log_level`; everything else (serenity included) at warn.
fn default_directive(log_level: &str) -> String {
    ["ticketry", "ticketry_agent", "ticketry_storage", "ticketry_discord"]
        .iter()
        .map(|target| format!("{target}={log_level}"))
        .chain(std::iter::once("warn".to_string()))
        .collect::<Vec<_>>()
        .join(",")
}
