//! The transfer engine — one transfer at a time, run to completion.

use crate::channel::DeviceChannel;
use crate::config::EngineConfig;
use crate::error::{TransferError, TransferResult};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::task;
use tracing::{debug, info, warn};
use zapxfer_crypto::{EncryptedData, TransferKey};
use zapxfer_ledger::HistoryLedger;
use zapxfer_store::StorageLayout;
use zapxfer_types::{Direction, FileSelection, TransferRecord};

/// Where a transfer currently stands. Logged as the transfer advances;
/// a failure reports the phase it died in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    Idle,
    FileSelected,
    DeviceConfirmed,
    Encrypting,
    Decrypting,
    Persisting,
    RecordingHistory,
    Completed,
    Failed,
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferPhase::Idle => "idle",
            TransferPhase::FileSelected => "file-selected",
            TransferPhase::DeviceConfirmed => "device-confirmed",
            TransferPhase::Encrypting => "encrypting",
            TransferPhase::Decrypting => "decrypting",
            TransferPhase::Persisting => "persisting",
            TransferPhase::RecordingHistory => "recording-history",
            TransferPhase::Completed => "completed",
            TransferPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What a completed transfer hands back to the caller.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub record: TransferRecord,
    /// Present when the transfer completed but its history entry could not
    /// be persisted. Inform-only; nothing to retry.
    pub history_warning: Option<String>,
}

/// The encrypted transfer & history engine.
///
/// All collaborators are injected at construction and shared behind `Arc`s;
/// cloning the engine clones the handles, not the state. Ledger appends are
/// serialized through a single mutex so concurrent completions cannot drop
/// records; transfers otherwise own their buffers exclusively and need no
/// locking.
#[derive(Clone)]
pub struct TransferEngine {
    storage: Arc<StorageLayout>,
    ledger: Arc<Mutex<HistoryLedger>>,
    key: Arc<TransferKey>,
    channel: Arc<dyn DeviceChannel>,
}

impl TransferEngine {
    /// Brings the engine up: ensures the storage layout exists and loads
    /// the history ledger.
    ///
    /// An unusable storage root is fatal: transfers could not be staged.
    /// An unreadable or corrupt history file is not: the engine logs a
    /// warning and starts from an empty ledger, because history is
    /// supplementary and must never block transfers.
    pub fn open(
        config: &EngineConfig,
        key: TransferKey,
        channel: Arc<dyn DeviceChannel>,
    ) -> TransferResult<Self> {
        let storage = StorageLayout::new(&config.storage_root);
        storage.ensure_layout()?;

        let ledger = match HistoryLedger::open(&config.ledger_path) {
            Ok(ledger) => ledger,
            Err(e) => {
                warn!(error = %e, "[XFER] history unavailable, starting with empty ledger");
                HistoryLedger::empty(&config.ledger_path)
            }
        };

        info!(
            root = %config.storage_root.display(),
            entries = ledger.len(),
            "[XFER] engine ready"
        );

        Ok(Self {
            storage: Arc::new(storage),
            ledger: Arc::new(Mutex::new(ledger)),
            key: Arc::new(key),
            channel,
        })
    }

    /// Runs one outbound transfer: encrypt, stage into `Sent/`, record
    /// history, then hand the staged file to the device channel.
    ///
    /// Delivery is fire-and-forget: the transfer is complete once the
    /// encrypted file is durably staged and does not wait on the peer.
    pub async fn send_file(
        &self,
        selection: FileSelection,
        device: &str,
    ) -> TransferResult<TransferOutcome> {
        if selection.is_empty() {
            return Err(TransferError::InvalidSelection);
        }
        let FileSelection { name, content } = selection;

        debug!(file = %name, phase = %TransferPhase::Encrypting, "[XFER] transfer advancing");
        let key = self.key.clone();
        let blob = task::spawn_blocking(move || zapxfer_crypto::encrypt(&key, &content))
            .await
            .map_err(|e| TransferError::Runtime(e.to_string()))?
            .map_err(TransferError::Encrypt)?
            .to_bytes();

        debug!(file = %name, phase = %TransferPhase::Persisting, "[XFER] transfer advancing");
        let storage = self.storage.clone();
        let stage_name = name.clone();
        let stored_path = task::spawn_blocking(move || {
            storage.write(Direction::Sent, &stage_name, &blob)
        })
        .await
        .map_err(|e| TransferError::Runtime(e.to_string()))??;

        debug!(file = %name, phase = %TransferPhase::RecordingHistory, "[XFER] transfer advancing");
        let record = TransferRecord::sent(&name, &stored_path, device);
        let history_warning = self.record_history(record.clone()).await;

        info!(
            file = %name,
            device,
            path = %stored_path.display(),
            phase = %TransferPhase::Completed,
            "[XFER] file encrypted and staged for delivery"
        );
        self.spawn_delivery(stored_path, device.to_string());

        Ok(TransferOutcome {
            record,
            history_warning,
        })
    }

    /// Runs one inbound transfer: authenticate the payload by decrypting
    /// it, stage the (still encrypted) blob into `Received/`, record
    /// history.
    ///
    /// A payload that fails authentication is rejected before anything
    /// touches disk. The staged file keeps the encrypted form, so content
    /// rests encrypted in both stores; [`Self::open_stored`] is the read
    /// side.
    pub async fn receive_file(
        &self,
        name: &str,
        payload: Vec<u8>,
    ) -> TransferResult<TransferOutcome> {
        if name.trim().is_empty() {
            return Err(TransferError::InvalidSelection);
        }

        debug!(file = %name, phase = %TransferPhase::Decrypting, "[XFER] transfer advancing");
        let key = self.key.clone();
        let verified = task::spawn_blocking(move || {
            let blob = EncryptedData::from_bytes(&payload)?;
            zapxfer_crypto::decrypt(&key, &blob)?;
            Ok(payload)
        })
        .await
        .map_err(|e| TransferError::Runtime(e.to_string()))?
        .map_err(TransferError::Decrypt)?;

        debug!(file = %name, phase = %TransferPhase::Persisting, "[XFER] transfer advancing");
        let storage = self.storage.clone();
        let stage_name = name.to_string();
        let stored_path = task::spawn_blocking(move || {
            storage.write(Direction::Received, &stage_name, &verified)
        })
        .await
        .map_err(|e| TransferError::Runtime(e.to_string()))??;

        debug!(file = %name, phase = %TransferPhase::RecordingHistory, "[XFER] transfer advancing");
        let record = TransferRecord::received(name, &stored_path);
        let history_warning = self.record_history(record.clone()).await;

        info!(
            file = %name,
            path = %stored_path.display(),
            phase = %TransferPhase::Completed,
            "[XFER] inbound file stored"
        );

        Ok(TransferOutcome {
            record,
            history_warning,
        })
    }

    /// Reads a staged file back and decrypts it.
    pub async fn open_stored(&self, record: &TransferRecord) -> TransferResult<Vec<u8>> {
        let storage = self.storage.clone();
        let key = self.key.clone();
        let path = record.stored_path.clone();

        task::spawn_blocking(move || {
            let bytes = storage.read(&path)?;
            let blob = EncryptedData::from_bytes(&bytes).map_err(TransferError::Decrypt)?;
            zapxfer_crypto::decrypt(&key, &blob).map_err(TransferError::Decrypt)
        })
        .await
        .map_err(|e| TransferError::Runtime(e.to_string()))?
    }

    /// Re-delivers an already-staged file over the device channel.
    pub async fn resend(&self, record: &TransferRecord, device: &str) -> TransferResult<()> {
        let storage = self.storage.clone();
        let path = record.stored_path.clone();
        let present = task::spawn_blocking(move || storage.contains(&path))
            .await
            .map_err(|e| TransferError::Runtime(e.to_string()))?;
        if !present {
            return Err(TransferError::Storage(zapxfer_store::StorageError::NotFound(
                record.stored_path.display().to_string(),
            )));
        }

        self.spawn_delivery(record.stored_path.clone(), device.to_string());
        Ok(())
    }

    /// Snapshot of the full history, most-recent-first.
    pub fn history(&self) -> Vec<TransferRecord> {
        self.ledger.lock().unwrap().records().to_vec()
    }

    /// Snapshot of the history for one direction, order preserved.
    pub fn history_for(&self, direction: Direction) -> Vec<TransferRecord> {
        self.ledger
            .lock()
            .unwrap()
            .query(direction)
            .cloned()
            .collect()
    }

    /// Appends to the ledger; any failure becomes a warning, never an
    /// error. The staged file already exists, so the transfer stands.
    async fn record_history(&self, record: TransferRecord) -> Option<String> {
        let ledger = self.ledger.clone();
        let result =
            task::spawn_blocking(move || ledger.lock().unwrap().append(record).map(|_| ())).await;

        match result {
            Ok(Ok(())) => None,
            Ok(Err(e)) => {
                warn!(error = %e, "[XFER] transfer completed but history was not recorded");
                Some(e.to_string())
            }
            Err(e) => {
                warn!(error = %e, "[XFER] history task failed");
                Some(e.to_string())
            }
        }
    }

    /// Hands a staged file to the device channel without blocking the
    /// transfer that produced it.
    fn spawn_delivery(&self, stored_path: PathBuf, device: String) {
        let channel = self.channel.clone();
        tokio::spawn(async move {
            match channel.send(&stored_path, &device).await {
                Ok(()) => info!(
                    path = %stored_path.display(),
                    device,
                    "[XFER] delivery handed to channel"
                ),
                Err(e) => warn!(
                    path = %stored_path.display(),
                    device,
                    error = %e,
                    "[XFER] delivery failed"
                ),
            }
        });
    }
}
