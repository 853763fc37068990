//! Engine configuration.

use std::path::PathBuf;

/// Where the engine keeps its storage tree and history file.
///
/// Both paths are injected; the engine never guesses an application
/// directory on its own.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Root of the storage tree; `Sent/` and `Received/` live directly
    /// under it.
    pub storage_root: PathBuf,
    /// Path of the JSON history file.
    pub ledger_path: PathBuf,
}

impl EngineConfig {
    /// Lays everything out under one application folder: the two stores
    /// beside a `history.json`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            ledger_path: dir.join("history.json"),
            storage_root: dir,
        }
    }
}
