// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed accessors over the persisted ticket document.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, info};

use ticketry_core::TicketryError;
use ticketry_core::types::{ChannelId, TicketDocument, TicketRecord, UserId};

use crate::document;
use crate::models::StoreSummary;

/// File-backed store of per-user ticket history and the global counter.
///
/// Every call re-reads the document; every mutation writes it back in full.
/// File access runs on the blocking pool, never on a runtime worker.
/// Mutations hold an async write lock across their read-modify-write cycle,
/// so two logical operations in this process never overwrite each other.
/// Separate processes sharing one file are not coordinated.
pub struct TicketStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// Run blocking document I/O off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T, TicketryError>
where
    F: FnOnce() -> Result<T, TicketryError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| TicketryError::Internal(format!("ticket store task failed: {e}")))?
}

impl TicketStore {
    /// Open the store at `path`, creating an empty document if none exists.
    ///
    /// Blocking. Called once at startup before any interaction is served.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TicketryError> {
        let path = path.into();
        if document::ensure_exists(&path)? {
            info!(path = %path.display(), "created empty ticket document");
        }
        // Fail fast on a corrupt document instead of on the first interaction.
        document::load(&path)?;
        debug!(path = %path.display(), "ticket store opened");
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<TicketDocument, TicketryError> {
        let path = self.path.clone();
        blocking(move || document::load(&path)).await
    }

    async fn persist(&self, doc: TicketDocument) -> Result<(), TicketryError> {
        let path = self.path.clone();
        blocking(move || document::persist(&path, &doc)).await
    }

    /// Load the full document.
    pub async fn read(&self) -> Result<TicketDocument, TicketryError> {
        self.load().await
    }

    /// Replace the full document.
    pub async fn write(&self, doc: TicketDocument) -> Result<(), TicketryError> {
        let _guard = self.write_lock.lock().await;
        self.persist(doc).await
    }

    /// Read-modify-write under the write lock.
    ///
    /// The document is persisted only when `f` returns `Ok`.
    pub async fn update<T, F>(&self, f: F) -> Result<T, TicketryError>
    where
        F: FnOnce(&mut TicketDocument) -> Result<T, TicketryError> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        let out = f(&mut doc)?;
        self.persist(doc).await?;
        Ok(out)
    }

    /// The user's ticket history, oldest first. Empty when the user has none.
    pub async fn user_tickets(&self, user: &UserId) -> Result<Vec<TicketRecord>, TicketryError> {
        Ok(self.read().await?.tickets.remove(user).unwrap_or_default())
    }

    /// Replace one user's ticket history.
    pub async fn set_user_tickets(
        &self,
        user: &UserId,
        tickets: Vec<TicketRecord>,
    ) -> Result<(), TicketryError> {
        self.update(|doc| {
            doc.tickets.insert(user.clone(), tickets);
            Ok(())
        })
        .await
    }

    /// Last ticket number handed out; `0` before the first ticket.
    pub async fn counter(&self) -> Result<u64, TicketryError> {
        Ok(self.read().await?.counter)
    }

    pub async fn set_counter(&self, value: u64) -> Result<(), TicketryError> {
        self.update(|doc| {
            doc.counter = value;
            Ok(())
        })
        .await
    }

    /// Reserve the next ticket number and persist the counter immediately.
    ///
    /// A reserved number is never handed out again, even if the ticket it was
    /// meant for is never created.
    pub async fn allocate_number(&self) -> Result<u64, TicketryError> {
        self.update(|doc| {
            doc.counter += 1;
            Ok(doc.counter)
        })
        .await
    }

    /// Append a record to its owner's history.
    pub async fn append_ticket(&self, record: TicketRecord) -> Result<(), TicketryError> {
        self.update(|doc| {
            doc.counter = doc.counter.max(record.number);
            doc.tickets
                .entry(record.user_id.clone())
                .or_default()
                .push(record);
            Ok(())
        })
        .await
    }

    /// The user's open ticket, if any.
    pub async fn open_ticket(&self, user: &UserId) -> Result<Option<TicketRecord>, TicketryError> {
        Ok(self.read().await?.open_ticket(user).cloned())
    }

    /// Locate the open ticket bound to `channel` and its owner.
    ///
    /// Linear scan over every stored ticket.
    pub async fn find_open_by_channel(
        &self,
        channel: &ChannelId,
    ) -> Result<Option<(UserId, TicketRecord)>, TicketryError> {
        Ok(self
            .read()
            .await?
            .find_open_by_channel(channel)
            .map(|(user, ticket)| (user.clone(), ticket.clone())))
    }

    /// Remove all history for one user. Returns whether anything was removed.
    ///
    /// Idempotent: a second call finds nothing and leaves the file untouched.
    pub async fn reset_user_tickets(&self, user: &UserId) -> Result<bool, TicketryError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        if doc.tickets.remove(user).is_none() {
            return Ok(false);
        }
        self.persist(doc).await?;
        info!(user_id = %user, "user ticket history reset");
        Ok(true)
    }

    /// Remove every user's history; the counter is left untouched.
    ///
    /// Returns the number of users whose history was removed.
    pub async fn reset_all_tickets(&self) -> Result<usize, TicketryError> {
        let removed = self
            .update(|doc| {
                let users = doc.tickets.len();
                doc.tickets.clear();
                Ok(users)
            })
            .await?;
        info!(users = removed, "all ticket history reset");
        Ok(removed)
    }

    pub async fn summary(&self) -> Result<StoreSummary, TicketryError> {
        Ok(StoreSummary::from(&self.read().await?))
    }
}
