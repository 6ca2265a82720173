// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whole-document load and save.
//!
//! Saves go through a temporary file in the target directory followed by an
//! atomic rename, so a crash mid-write never leaves a torn document behind.

use std::io::Write;
use std::path::Path;

use ticketry_core::TicketryError;
use ticketry_core::types::TicketDocument;

/// Load the document at `path`.
///
/// A malformed file is an error; it is never silently replaced.
pub fn load(path: &Path) -> Result<TicketDocument, TicketryError> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        TicketryError::storage(format!(
            "ticket document {} is malformed: {e}",
            path.display()
        ))
    })
}

/// Persist `doc` to `path`, replacing any previous content atomically.
pub fn persist(path: &Path, doc: &TicketDocument) -> Result<(), TicketryError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, doc)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| TicketryError::from(e.error))?;
    Ok(())
}

/// Create the parent directory and an empty document if `path` does not exist.
///
/// Returns `true` when a new document was written.
pub fn ensure_exists(path: &Path) -> Result<bool, TicketryError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    persist(path, &TicketDocument::default())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn ensure_exists_writes_empty_document_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("tickets.json");

        assert!(ensure_exists(&path).unwrap());
        assert!(!ensure_exists(&path).unwrap());

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "tickets": {}, "counter": 0 }));
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tickets.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, TicketryError::Storage { .. }));
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn persist_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tickets.json");
        let mut doc = TicketDocument::default();
        persist(&path, &doc).unwrap();

        doc.counter = 41;
        persist(&path, &doc).unwrap();
        assert_eq!(load(&path).unwrap().counter, 41);
    }
}
