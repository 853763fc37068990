//! Content encryption for ZapXfer.
//!
//! Provides transfer-content encryption using:
//! - ChaCha20-Poly1305 for authenticated encryption
//! - Argon2id for key derivation from the pre-shared passphrase
//! - Key material zeroized on drop
//!
//! # Architecture
//!
//! The codec is a pure byte transform: plaintext in, nonce-prefixed
//! authenticated ciphertext out, and back. It never touches the
//! filesystem; staging encrypted blobs is the store's job.
//!
//! Decryption is all-or-nothing: a flipped bit anywhere in the blob, or a
//! mismatched key, fails the Poly1305 tag check and surfaces as
//! [`CryptoError::InvalidCiphertext`]. There is no path that returns
//! unauthenticated plaintext.

mod cipher;
mod error;
mod key;

pub use cipher::{decrypt, encrypt, EncryptedData, NONCE_SIZE, TAG_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use key::{derive_key, KdfParams, Salt, TransferKey, KEY_SIZE, SALT_SIZE};
