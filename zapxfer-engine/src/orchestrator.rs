//! Transfer orchestrator — the command loop UI collaborators drive.
//!
//! The loop owns the selection state machine: a file selection arrives
//! first, then either a device confirmation (which runs the outbound
//! transfer to completion) or a cancellation. Inbound payloads are
//! independent of any pending selection. Once a transfer starts running
//! there is no cancellation: it reaches completed or failed, never a
//! half-written artifact.

use crate::engine::{TransferEngine, TransferPhase};
use crate::error::{TransferError, TransferResult};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use zapxfer_types::{Direction, FileSelection, TransferRecord};

/// Commands that can be sent to the orchestrator.
#[derive(Debug)]
pub enum TransferCommand {
    /// The file-selection collaborator picked a file.
    SelectFile { selection: FileSelection },
    /// The device-selection collaborator confirmed the peer; runs the
    /// pending outbound transfer.
    ConfirmDevice { device: String },
    /// Drop the pending selection (only possible before encryption
    /// starts).
    CancelSelection,
    /// An inbound payload arrived from a peer.
    ReceivePayload { name: String, payload: Vec<u8> },
    /// Re-deliver an already-staged file from the history list.
    ResendStored {
        record: TransferRecord,
        device: String,
    },
    /// Stop the orchestrator.
    Shutdown,
}

impl TransferCommand {
    /// Name for logging. Commands carry file content; only the variant
    /// belongs in the log.
    fn name(&self) -> &'static str {
        match self {
            TransferCommand::SelectFile { .. } => "select-file",
            TransferCommand::ConfirmDevice { .. } => "confirm-device",
            TransferCommand::CancelSelection => "cancel-selection",
            TransferCommand::ReceivePayload { .. } => "receive-payload",
            TransferCommand::ResendStored { .. } => "resend-stored",
            TransferCommand::Shutdown => "shutdown",
        }
    }
}

/// Events emitted by the orchestrator for the UI.
#[derive(Debug, Clone)]
pub enum TransferEvent {
    /// A selection was accepted and awaits a device confirmation.
    FileSelected { name: String },
    /// The pending selection was dropped.
    SelectionCancelled,
    /// A transfer finished; `history_warning` is set when the file was
    /// stored but its history entry was not.
    TransferCompleted {
        record: TransferRecord,
        history_warning: Option<String>,
    },
    /// A transfer died; `message` names the cause in user terms.
    TransferFailed {
        direction: Direction,
        message: String,
    },
}

/// Handle to send commands to the orchestrator.
#[derive(Clone)]
pub struct EngineHandle {
    command_tx: mpsc::Sender<TransferCommand>,
}

impl EngineHandle {
    pub async fn select_file(&self, selection: FileSelection) -> TransferResult<()> {
        self.send(TransferCommand::SelectFile { selection }).await
    }

    pub async fn confirm_device(&self, device: impl Into<String>) -> TransferResult<()> {
        self.send(TransferCommand::ConfirmDevice {
            device: device.into(),
        })
        .await
    }

    pub async fn cancel_selection(&self) -> TransferResult<()> {
        self.send(TransferCommand::CancelSelection).await
    }

    pub async fn receive_payload(
        &self,
        name: impl Into<String>,
        payload: Vec<u8>,
    ) -> TransferResult<()> {
        self.send(TransferCommand::ReceivePayload {
            name: name.into(),
            payload,
        })
        .await
    }

    pub async fn resend_stored(
        &self,
        record: TransferRecord,
        device: impl Into<String>,
    ) -> TransferResult<()> {
        self.send(TransferCommand::ResendStored {
            record,
            device: device.into(),
        })
        .await
    }

    pub async fn shutdown(&self) -> TransferResult<()> {
        self.send(TransferCommand::Shutdown).await
    }

    async fn send(&self, command: TransferCommand) -> TransferResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| TransferError::ChannelClosed)
    }
}

/// The transfer orchestrator.
pub struct TransferOrchestrator {
    engine: TransferEngine,
    /// Selection awaiting a device confirmation; `None` means idle.
    pending: Option<FileSelection>,
    event_tx: mpsc::Sender<TransferEvent>,
}

impl TransferOrchestrator {
    /// Runs the command loop until `Shutdown` or until every handle is
    /// dropped.
    pub async fn run(mut self, mut command_rx: mpsc::Receiver<TransferCommand>) {
        info!("[XFER] orchestrator started");

        while let Some(command) = command_rx.recv().await {
            debug!(command = command.name(), "[XFER] received command");
            match command {
                TransferCommand::Shutdown => {
                    info!("[XFER] orchestrator shutting down");
                    break;
                }
                TransferCommand::SelectFile { selection } => {
                    self.handle_select(selection).await;
                }
                TransferCommand::ConfirmDevice { device } => {
                    self.handle_confirm(device).await;
                }
                TransferCommand::CancelSelection => {
                    if self.pending.take().is_some() {
                        debug!(state = %TransferPhase::Idle, "[XFER] selection cancelled");
                        let _ = self.event_tx.send(TransferEvent::SelectionCancelled).await;
                    } else {
                        warn!("[XFER] cancel with no pending selection");
                    }
                }
                TransferCommand::ReceivePayload { name, payload } => {
                    self.handle_receive(name, payload).await;
                }
                TransferCommand::ResendStored { record, device } => {
                    if let Err(e) = self.engine.resend(&record, &device).await {
                        warn!(file = %record.name, error = %e, "[XFER] re-send failed");
                    }
                }
            }
        }
    }

    async fn handle_select(&mut self, selection: FileSelection) {
        // An unnamed selection cannot be staged; stay idle.
        if selection.is_empty() {
            warn!("[XFER] ignoring empty file selection");
            return;
        }
        debug!(
            file = %selection.name,
            state = %TransferPhase::FileSelected,
            "[XFER] file selected"
        );
        let name = selection.name.clone();
        self.pending = Some(selection);
        let _ = self
            .event_tx
            .send(TransferEvent::FileSelected { name })
            .await;
    }

    async fn handle_confirm(&mut self, device: String) {
        let Some(selection) = self.pending.take() else {
            warn!(device, "[XFER] device confirmed with no pending selection");
            return;
        };
        debug!(device, state = %TransferPhase::DeviceConfirmed, "[XFER] device confirmed");

        let event = match self.engine.send_file(selection, &device).await {
            Ok(outcome) => TransferEvent::TransferCompleted {
                record: outcome.record,
                history_warning: outcome.history_warning,
            },
            Err(e) => {
                warn!(error = %e, state = %TransferPhase::Failed, "[XFER] outbound transfer failed");
                TransferEvent::TransferFailed {
                    direction: Direction::Sent,
                    message: e.to_string(),
                }
            }
        };
        let _ = self.event_tx.send(event).await;
    }

    async fn handle_receive(&mut self, name: String, payload: Vec<u8>) {
        let event = match self.engine.receive_file(&name, payload).await {
            Ok(outcome) => TransferEvent::TransferCompleted {
                record: outcome.record,
                history_warning: outcome.history_warning,
            },
            Err(e) => {
                warn!(
                    file = %name,
                    error = %e,
                    state = %TransferPhase::Failed,
                    "[XFER] inbound transfer failed"
                );
                TransferEvent::TransferFailed {
                    direction: Direction::Received,
                    message: e.to_string(),
                }
            }
        };
        let _ = self.event_tx.send(event).await;
    }
}

/// Creates an orchestrator and returns the pieces needed to run it:
/// the command handle for collaborators, the event stream for the UI, the
/// command receiver to pass to [`TransferOrchestrator::run`], and the
/// orchestrator itself.
pub fn create_orchestrator(
    engine: TransferEngine,
) -> (
    EngineHandle,
    mpsc::Receiver<TransferEvent>,
    mpsc::Receiver<TransferCommand>,
    TransferOrchestrator,
) {
    let (command_tx, command_rx) = mpsc::channel(32);
    let (event_tx, event_rx) = mpsc::channel(64);

    let handle = EngineHandle { command_tx };
    let orchestrator = TransferOrchestrator {
        engine,
        pending: None,
        event_tx,
    };

    (handle, event_rx, command_rx, orchestrator)
}
