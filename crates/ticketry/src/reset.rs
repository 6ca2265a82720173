// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ticketry reset-tickets` command implementation.
//!
//! Offline counterpart of the `!reset-tickets` admin command. Do not run it
//! against a document a live `serve` process is writing.

use ticketry_config::TicketryConfig;
use ticketry_core::{TicketryError, UserId};
use ticketry_storage::TicketStore;

/// Run the `ticketry reset-tickets` command.
pub async fn run_reset(config: &TicketryConfig, user: Option<&str>) -> Result<(), TicketryError> {
    let store = TicketStore::open(&config.storage.document_path)?;
    println!("{}", reset(&store, user).await?);
    Ok(())
}

async fn reset(store: &TicketStore, user: Option<&str>) -> Result<String, TicketryError> {
    match user {
        Some(id) => {
            if store.reset_user_tickets(&UserId::new(id)).await? {
                Ok(format!("Ticket history for user {id} has been reset."))
            } else {
                Ok(format!("User {id} has no ticket history."))
            }
        }
        None => {
            let removed = store.reset_all_tickets().await?;
            Ok(format!(
                "All ticket data has been reset ({removed} users, counter kept at {}).",
                store.counter().await?
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ticketry_core::{ChannelId, TicketRecord};

    fn record(user: &UserId, number: u64) -> TicketRecord {
        TicketRecord {
            channel_id: ChannelId::new(format!("{}", 100 + number)),
            user_id: user.clone(),
            user_tag: format!("user{user}"),
            kind: "limiteds".to_string(),
            description: "Limiteds".to_string(),
            open: true,
            number,
            created_at: Utc::now(),
            closed_at: None,
            opened_by: format!("user{user}"),
            closed_by: None,
        }
    }

    async fn seeded_store(dir: &tempfile::TempDir) -> TicketStore {
        let store = TicketStore::open(dir.path().join("tickets.json")).unwrap();
        for (user, number) in [("1", 1), ("2", 2)] {
            let user = UserId::new(user);
            store
                .set_user_tickets(&user, vec![record(&user, number)])
                .await
                .unwrap();
        }
        store.set_counter(2).await.unwrap();
        store
    }

    #[tokio::test]
    async fn reset_all_keeps_counter() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir).await;

        let message = reset(&store, None).await.unwrap();
        assert!(message.contains("2 users"));
        assert!(message.contains("counter kept at 2"));
        assert_eq!(store.summary().await.unwrap().open, 0);
        assert_eq!(store.counter().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn reset_single_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir).await;

        let message = reset(&store, Some("1")).await.unwrap();
        assert!(message.contains("user 1 has been reset"));
        assert!(store.user_tickets(&UserId::new("1")).await.unwrap().is_empty());
        assert_eq!(store.user_tickets(&UserId::new("2")).await.unwrap().len(), 1);

        let again = reset(&store, Some("1")).await.unwrap();
        assert!(again.contains("no ticket history"));
    }
}
