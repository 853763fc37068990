use zapxfer_crypto::{
    decrypt, derive_key, encrypt, CryptoError, KdfParams, Salt, TransferKey, KEY_SIZE,
};

/// Cheap Argon2id costs so the test suite stays fast.
fn test_params() -> KdfParams {
    KdfParams {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    }
}

#[test]
fn same_passphrase_and_salt_derive_same_key() {
    let salt = Salt::random();
    let params = test_params();

    let key1 = derive_key("shared-secret", &salt, &params).unwrap();
    let key2 = derive_key("shared-secret", &salt, &params).unwrap();

    assert_eq!(key1.as_bytes(), key2.as_bytes());
}

#[test]
fn different_salts_derive_different_keys() {
    let params = test_params();
    let key1 = derive_key("shared-secret", &Salt::random(), &params).unwrap();
    let key2 = derive_key("shared-secret", &Salt::random(), &params).unwrap();

    assert_ne!(key1.as_bytes(), key2.as_bytes());
}

#[test]
fn different_passphrases_derive_different_keys() {
    let salt = Salt::random();
    let params = test_params();

    let key1 = derive_key("passphrase-one", &salt, &params).unwrap();
    let key2 = derive_key("passphrase-two", &salt, &params).unwrap();

    assert_ne!(key1.as_bytes(), key2.as_bytes());
}

#[test]
fn derived_keys_interoperate_across_devices() {
    // Two peers holding the same passphrase and salt can read each
    // other's blobs.
    let salt = Salt::from_bytes(*b"0123456789abcdef");
    let params = test_params();

    let sender_key = derive_key("shared-secret", &salt, &params).unwrap();
    let receiver_key = derive_key("shared-secret", &salt, &params).unwrap();

    let blob = encrypt(&sender_key, b"cross-device payload").unwrap();
    assert_eq!(decrypt(&receiver_key, &blob).unwrap(), b"cross-device payload");
}

#[test]
fn from_slice_rejects_wrong_length() {
    let result = TransferKey::from_slice(&[0u8; 16]);
    assert!(matches!(
        result,
        Err(CryptoError::InvalidKey {
            expected: KEY_SIZE,
            actual: 16,
        })
    ));
}

#[test]
fn from_slice_accepts_exact_length() {
    let key = TransferKey::from_slice(&[7u8; KEY_SIZE]).unwrap();
    assert_eq!(key.as_bytes(), &[7u8; KEY_SIZE]);
}

#[test]
fn generated_keys_differ() {
    let key1 = TransferKey::generate();
    let key2 = TransferKey::generate();
    assert_ne!(key1.as_bytes(), key2.as_bytes());
}

#[test]
fn debug_output_never_leaks_key_material() {
    let key = TransferKey::from_bytes([0xAB; KEY_SIZE]);
    let printed = format!("{key:?}");
    assert_eq!(printed, "TransferKey(..)");
    assert!(!printed.contains("ab"));
}
