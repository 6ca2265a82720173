// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ticketry status` command implementation.
//!
//! Reads the ticket document and prints how many tickets are open and
//! closed, and the last number handed out.

use serde::Serialize;
use ticketry_config::TicketryConfig;
use ticketry_core::TicketryError;
use ticketry_storage::{StoreSummary, TicketStore};

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub document_path: String,
    pub users: usize,
    pub open: usize,
    pub closed: usize,
    pub counter: u64,
}

impl StatusResponse {
    fn new(document_path: String, summary: StoreSummary) -> Self {
        Self {
            document_path,
            users: summary.users,
            open: summary.open,
            closed: summary.closed,
            counter: summary.counter,
        }
    }
}

/// Run the `ticketry status` command.
pub async fn run_status(config: &TicketryConfig, json: bool) -> Result<(), TicketryError> {
    let store = TicketStore::open(&config.storage.document_path)?;
    let status = StatusResponse::new(store.path().display().to_string(), store.summary().await?);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&status).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        print!("{}", render(&status));
    }
    Ok(())
}

fn render(status: &StatusResponse) -> String {
    format!(
        "\n  ticketry status\n  {rule}\n    Document: {path}\n    Users:    {users}\n    Open:     {open}\n    Closed:   {closed}\n    Counter:  {counter}\n\n",
        rule = "-".repeat(35),
        path = status.document_path,
        users = status.users,
        open = status.open,
        closed = status.closed,
        counter = status.counter,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StatusResponse {
        StatusResponse::new(
            "/tmp/tickets.json".to_string(),
            StoreSummary {
                users: 2,
                open: 1,
                closed: 3,
                counter: 4,
            },
        )
    }

    #[test]
    fn status_response_serializes() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"open\":1"));
        assert!(json.contains("\"closed\":3"));
        assert!(json.contains("\"counter\":4"));
    }

    #[test]
    fn render_lists_every_count() {
        let text = render(&sample());
        assert!(text.contains("Document: /tmp/tickets.json"));
        assert!(text.contains("Open:     1"));
        assert!(text.contains("Counter:  4"));
    }

    #[tokio::test]
    async fn status_reads_a_fresh_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TicketryConfig::default();
        config.storage.document_path = dir.path().join("tickets.json").display().to_string();
        run_status(&config, true).await.unwrap();
        assert!(dir.path().join("tickets.json").exists());
    }
}
