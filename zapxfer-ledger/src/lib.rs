//! Durable, ordered history of completed transfers.
//!
//! The ledger is an in-memory list of [`TransferRecord`]s, most-recent
//! first, mirrored to a single JSON file. Every append rewrites the whole
//! serialized sequence through a temporary file and an atomic rename, so
//! the previous on-disk state stays readable if persistence is interrupted.
//! There is no background flushing: `append` blocks until the new state is
//! durably on disk, and in-memory and persisted state converge after every
//! successful call.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;
use zapxfer_types::{Direction, TransferRecord};

// ============================================================================
// Error types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("history log is corrupt: {0}")]
    Corrupt(String),
    #[error("could not persist history: {0}")]
    PersistFailed(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

// ============================================================================
// HistoryLedger
// ============================================================================

/// The transfer history, loaded once and kept in sync with its file.
#[derive(Debug)]
pub struct HistoryLedger {
    path: PathBuf,
    records: Vec<TransferRecord>,
}

impl HistoryLedger {
    /// Opens the ledger at `path`, loading any persisted records.
    ///
    /// A missing file is a first run and yields an empty ledger. A file
    /// that exists but cannot be read or parsed is reported as
    /// [`LedgerError::Corrupt`]; the caller decides whether to fail or to
    /// continue from empty (the engine continues; history is advisory).
    pub fn open(path: impl Into<PathBuf>) -> LedgerResult<Self> {
        let path = path.into();
        let records = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| LedgerError::Corrupt(e.to_string()))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(LedgerError::Corrupt(format!("unreadable: {e}"))),
        };
        Ok(Self { path, records })
    }

    /// A fresh, empty ledger at `path`. Used to recover from a corrupt
    /// history file without blocking startup.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, most-recent-first.
    pub fn records(&self) -> &[TransferRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Prepends `record`, persists the whole sequence, and returns the
    /// updated sequence.
    ///
    /// If persistence fails the prepend is rolled back, so the in-memory
    /// view never shows a record the disk does not have.
    pub fn append(&mut self, record: TransferRecord) -> LedgerResult<&[TransferRecord]> {
        self.records.insert(0, record);
        if let Err(e) = self.persist() {
            self.records.remove(0);
            return Err(e);
        }
        tracing::debug!(total = self.records.len(), "history entry appended");
        Ok(self.records.as_slice())
    }

    /// Records matching `direction`, ledger order preserved.
    pub fn query(&self, direction: Direction) -> impl Iterator<Item = &TransferRecord> {
        self.records
            .iter()
            .filter(move |record| record.direction == direction)
    }

    /// Serializes the full sequence through a temporary sibling file and
    /// renames it into place. The rename is the publish point; until it
    /// happens the previous file is intact.
    fn persist(&self) -> LedgerResult<()> {
        let json = serde_json::to_vec_pretty(&self.records)
            .map_err(|e| LedgerError::PersistFailed(e.to_string()))?;

        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("history.json");
        let staging = self
            .path
            .with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

        if let Err(e) = write_durably(&staging, &json) {
            let _ = fs::remove_file(&staging);
            return Err(LedgerError::PersistFailed(e.to_string()));
        }
        if let Err(e) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(LedgerError::PersistFailed(format!("publish failed: {e}")));
        }
        Ok(())
    }
}

fn write_durably(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}
