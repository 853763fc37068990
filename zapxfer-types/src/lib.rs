//! Shared types for ZapXfer transfers.
//!
//! Everything here is plain data: serde-serializable, no I/O. The engine,
//! store, and ledger crates all speak these types at their boundaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Which way a transfer went, and which store holds its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    /// Stable string form, also the store directory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Sent => "Sent",
            Direction::Received => "Received",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed transfer, as recorded in the history ledger.
///
/// Records are immutable once created; the ledger only prepends them.
/// `stored_path` always lies under the store directory matching `direction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Original file name as the user saw it.
    pub name: String,
    pub direction: Direction,
    /// Completion time. ISO-8601 in the persisted form, so lexical order
    /// matches chronological order.
    pub timestamp: DateTime<Utc>,
    /// Where the staged (encrypted) file lives in the storage tree.
    pub stored_path: PathBuf,
    /// Counterpart device for outbound transfers; unknown for inbound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_device: Option<String>,
}

impl TransferRecord {
    /// Builds a record for a completed outbound transfer, stamped now.
    pub fn sent(
        name: impl Into<String>,
        stored_path: impl Into<PathBuf>,
        peer_device: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Sent,
            timestamp: Utc::now(),
            stored_path: stored_path.into(),
            peer_device: Some(peer_device.into()),
        }
    }

    /// Builds a record for a completed inbound transfer, stamped now.
    pub fn received(name: impl Into<String>, stored_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Received,
            timestamp: Utc::now(),
            stored_path: stored_path.into(),
            peer_device: None,
        }
    }
}

/// What the file-selection collaborator hands the engine: the picked file's
/// name and its full content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub name: String,
    pub content: Vec<u8>,
}

impl FileSelection {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// A selection without a name cannot be staged anywhere.
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
    }
}
