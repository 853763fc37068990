//! Encrypted transfer engine for ZapXfer.
//!
//! Composes the crypto codec, storage layout, and history ledger into
//! whole transfers:
//! - outbound: encrypt → stage into `Sent/` → record history → hand off to
//!   the device channel
//! - inbound: authenticate-decrypt → stage into `Received/` → record
//!   history
//!
//! The engine is the only writer of the ledger and owns all its
//! collaborator handles by injection; there are no process globals. A
//! failed history append never fails a transfer; the staged file is the
//! source of truth, history is advisory.
//!
//! UI-facing collaborators drive the engine through the
//! [`orchestrator`] command loop and observe it through its events; the
//! [`TransferEngine`] methods are the direct library API underneath.

pub mod channel;
pub mod config;
pub mod engine;
pub mod error;
pub mod orchestrator;

pub use channel::{DeliveryError, DeviceChannel, SimulatedChannel};
pub use config::EngineConfig;
pub use engine::{TransferEngine, TransferOutcome, TransferPhase};
pub use error::{TransferError, TransferResult};
pub use orchestrator::{
    create_orchestrator, EngineHandle, TransferCommand, TransferEvent, TransferOrchestrator,
};
