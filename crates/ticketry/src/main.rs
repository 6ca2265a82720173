// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticketry - a Discord support desk with private ticket channels and
//! star-rated feedback.
//!
//! This is the binary entry point.

mod reset;
mod serve;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ticketry - private ticket channels with star-rated feedback.
#[derive(Parser, Debug)]
#[command(name = "ticketry", version, about, long_about = None)]
struct Cli {
    /// Load this file instead of the standard configuration hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect to Discord and serve the support desk.
    Serve,
    /// Summarize the ticket document.
    Status {
        /// Output JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// Remove ticket history. The ticket counter is kept.
    ResetTickets {
        /// Only reset this user's history.
        #[arg(long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => ticketry_config::load_and_validate_path(path),
        None => ticketry_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            ticketry_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Status { json }) => status::run_status(&config, json).await,
        Some(Commands::ResetTickets { user }) => reset::run_reset(&config, user.as_deref()).await,
        None => {
            println!("ticketry: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
