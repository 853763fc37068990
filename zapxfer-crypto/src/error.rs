//! Crypto error types.

use thiserror::Error;

/// Result type for codec operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while encrypting or decrypting transfer content.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("invalid ciphertext (wrong key or tampered data)")]
    InvalidCiphertext,

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKey { expected: usize, actual: usize },

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}
