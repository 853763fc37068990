//! Device-channel capability — the transport seam.
//!
//! The engine hands a staged file to "whatever moves bytes to a peer"
//! through this trait and never learns which transport is behind it. The
//! simulated variant stands in where no real radio/network transport
//! exists yet.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
#[error("delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// Transport capability for outbound transfers.
///
/// Implementations receive the staged (encrypted) file's path and the
/// chosen peer device. Delivery runs after a transfer has completed and is
/// never awaited by the transfer itself.
#[async_trait]
pub trait DeviceChannel: Send + Sync {
    async fn send(&self, stored_path: &Path, device: &str) -> Result<(), DeliveryError>;
}

/// In-process stand-in for a real transport.
///
/// Carries a finite roster of reachable devices (the UI's device picker
/// lists exactly these) and treats a delivery to any of them as
/// immediately successful.
pub struct SimulatedChannel {
    devices: Vec<String>,
}

impl SimulatedChannel {
    pub fn new(devices: Vec<String>) -> Self {
        Self { devices }
    }

    /// The devices this channel can reach.
    pub fn devices(&self) -> &[String] {
        &self.devices
    }
}

impl Default for SimulatedChannel {
    fn default() -> Self {
        Self::new(vec![
            "Device A".to_string(),
            "Device B".to_string(),
            "Device C".to_string(),
        ])
    }
}

#[async_trait]
impl DeviceChannel for SimulatedChannel {
    async fn send(&self, stored_path: &Path, device: &str) -> Result<(), DeliveryError> {
        if !self.devices.iter().any(|d| d == device) {
            return Err(DeliveryError(format!("unknown device {device:?}")));
        }
        info!(
            path = %stored_path.display(),
            device,
            "[XFER] simulated delivery"
        );
        Ok(())
    }
}
