//! Transfer error types.

use thiserror::Error;
use zapxfer_crypto::CryptoError;
use zapxfer_store::StorageError;

/// Result type for engine operations.
pub type TransferResult<T> = Result<T, TransferError>;

/// Fatal causes for a single transfer.
///
/// Each variant reads as the message a UI shows the user, and the variants
/// keep "could not encrypt", "could not decrypt", and "could not store"
/// apart so the caller can react differently to each. Ledger failures are
/// deliberately absent: they are non-fatal and surface as a warning on the
/// completed outcome instead.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("missing or empty file name")]
    InvalidSelection,

    #[error("could not encrypt file: {0}")]
    Encrypt(#[source] CryptoError),

    #[error("could not decrypt inbound payload: {0}")]
    Decrypt(#[source] CryptoError),

    #[error("could not store file: {0}")]
    Storage(#[from] StorageError),

    #[error("engine is shut down")]
    ChannelClosed,

    #[error("worker task failed: {0}")]
    Runtime(String),
}
