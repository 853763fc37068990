//! On-disk layout for staged transfer files.
//!
//! Owns an application-private root with exactly two stores, `Sent/` and
//! `Received/`, one file per transfer named after the original file name.
//! Writes follow a write-then-publish discipline: content is staged under a
//! transfer-unique temporary name in the same directory, flushed, then
//! renamed over the final name. A crash mid-write leaves either the old
//! file or nothing, never a partial artifact under the final name.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;
use zapxfer_types::Direction;

// ============================================================================
// Error types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage directory unavailable: {0}")]
    DirectoryUnavailable(String),
    #[error("could not write {name}: {reason}")]
    WriteFailed { name: String, reason: String },
    #[error("could not read {path}: {reason}")]
    ReadFailed { path: String, reason: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid file name: {0:?}")]
    InvalidName(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// ============================================================================
// StorageLayout
// ============================================================================

/// Handle to the two-store directory tree.
///
/// Cheap to clone conceptually (it is just the root path); the engine wraps
/// it in an `Arc` and shares it across transfers. Writes need no locking:
/// every write stages under its own unique temporary name, and the final
/// rename is atomic, so concurrent transfers can only race on who publishes
/// last (last writer wins, per the collision policy).
#[derive(Debug, Clone)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one store.
    pub fn dir_for(&self, direction: Direction) -> PathBuf {
        self.root.join(direction.as_str())
    }

    pub fn sent_dir(&self) -> PathBuf {
        self.dir_for(Direction::Sent)
    }

    pub fn received_dir(&self) -> PathBuf {
        self.dir_for(Direction::Received)
    }

    /// Creates both store directories, intermediates included. Idempotent:
    /// calling it again when everything exists is a no-op.
    pub fn ensure_layout(&self) -> StorageResult<()> {
        for direction in [Direction::Sent, Direction::Received] {
            let dir = self.dir_for(direction);
            fs::create_dir_all(&dir).map_err(|e| {
                StorageError::DirectoryUnavailable(format!("{}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }

    /// Stages `bytes` under `name` in the given store and returns the final
    /// path.
    ///
    /// An existing file under the same name is only replaced once the new
    /// content is fully staged. On any failure the temporary file is
    /// removed and nothing new is visible under `name`.
    pub fn write(&self, direction: Direction, name: &str, bytes: &[u8]) -> StorageResult<PathBuf> {
        let file_name = sanitize_name(name)?;
        let dir = self.dir_for(direction);
        fs::create_dir_all(&dir)
            .map_err(|e| StorageError::DirectoryUnavailable(format!("{}: {e}", dir.display())))?;

        // Transfer-scoped token keeps concurrent stages of the same name
        // from colliding on the temporary file.
        let staging = dir.join(format!(".{file_name}.{}.part", Uuid::new_v4()));
        let final_path = dir.join(&file_name);

        if let Err(e) = stage_file(&staging, bytes) {
            let _ = fs::remove_file(&staging);
            return Err(StorageError::WriteFailed {
                name: file_name,
                reason: e.to_string(),
            });
        }

        if let Err(e) = fs::rename(&staging, &final_path) {
            let _ = fs::remove_file(&staging);
            return Err(StorageError::WriteFailed {
                name: file_name,
                reason: format!("publish failed: {e}"),
            });
        }

        tracing::debug!(
            path = %final_path.display(),
            size = bytes.len(),
            "staged file published"
        );
        Ok(final_path)
    }

    /// Reads back a staged file. Paths outside the managed tree are treated
    /// as missing rather than followed.
    pub fn read(&self, path: &Path) -> StorageResult<Vec<u8>> {
        if !path.starts_with(&self.root) {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
            _ => StorageError::ReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            },
        })
    }

    /// Whether a staged file exists under the managed tree.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root) && path.is_file()
    }
}

/// Writes and flushes the staged copy. Split out so the caller can treat
/// every failure mode uniformly (clean up, report `WriteFailed`).
fn stage_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}

/// Reduces a caller-supplied name to a single path component.
///
/// Collaborators hand us display names, not paths; anything that would
/// escape the store directory is rejected rather than silently rewritten.
fn sanitize_name(name: &str) -> StorageResult<String> {
    if name.trim().is_empty() {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    let component = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StorageError::InvalidName(name.to_string()))?;
    if component != name {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(component.to_string())
}
