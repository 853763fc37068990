use zapxfer_crypto::{
    decrypt, encrypt, CryptoError, EncryptedData, TransferKey, NONCE_SIZE, TAG_SIZE,
};

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = TransferKey::generate();
    let plaintext = b"the quick brown fox";

    let blob = encrypt(&key, plaintext).unwrap();
    let recovered = decrypt(&key, &blob).unwrap();

    assert_eq!(recovered, plaintext);
}

#[test]
fn empty_plaintext_roundtrips() {
    let key = TransferKey::generate();
    let blob = encrypt(&key, b"").unwrap();
    assert_eq!(decrypt(&key, &blob).unwrap(), b"");
}

#[test]
fn binary_content_roundtrips() {
    let key = TransferKey::generate();
    let plaintext: Vec<u8> = (0..=255).cycle().take(4096).collect();

    let blob = encrypt(&key, &plaintext).unwrap();
    assert_eq!(decrypt(&key, &blob).unwrap(), plaintext);
}

#[test]
fn wrong_key_fails() {
    let key = TransferKey::generate();
    let other = TransferKey::generate();

    let blob = encrypt(&key, b"secret").unwrap();
    let result = decrypt(&other, &blob);

    assert!(matches!(result, Err(CryptoError::InvalidCiphertext)));
}

#[test]
fn tampered_ciphertext_fails() {
    let key = TransferKey::generate();
    let mut blob = encrypt(&key, b"secret payload").unwrap();

    if let Some(byte) = blob.ciphertext.first_mut() {
        *byte ^= 0xFF;
    }

    assert!(matches!(
        decrypt(&key, &blob),
        Err(CryptoError::InvalidCiphertext)
    ));
}

#[test]
fn tampered_nonce_fails() {
    let key = TransferKey::generate();
    let mut blob = encrypt(&key, b"secret payload").unwrap();
    blob.nonce[0] ^= 0xFF;

    assert!(matches!(
        decrypt(&key, &blob),
        Err(CryptoError::InvalidCiphertext)
    ));
}

#[test]
fn each_encryption_produces_different_blob() {
    let key = TransferKey::generate();
    let plaintext = b"same plaintext every time";

    let blob1 = encrypt(&key, plaintext).unwrap();
    let blob2 = encrypt(&key, plaintext).unwrap();

    assert_ne!(blob1.nonce, blob2.nonce);
    assert_ne!(blob1.ciphertext, blob2.ciphertext);

    assert_eq!(decrypt(&key, &blob1).unwrap(), plaintext);
    assert_eq!(decrypt(&key, &blob2).unwrap(), plaintext);
}

#[test]
fn byte_form_roundtrips() {
    let key = TransferKey::generate();
    let blob = encrypt(&key, b"flatten me").unwrap();

    let bytes = blob.to_bytes();
    assert_eq!(bytes.len(), NONCE_SIZE + blob.ciphertext.len());

    let parsed = EncryptedData::from_bytes(&bytes).unwrap();
    assert_eq!(parsed, blob);
    assert_eq!(decrypt(&key, &parsed).unwrap(), b"flatten me");
}

#[test]
fn truncated_blob_is_rejected() {
    let short = vec![0u8; NONCE_SIZE + TAG_SIZE - 1];
    assert!(matches!(
        EncryptedData::from_bytes(&short),
        Err(CryptoError::InvalidCiphertext)
    ));
}

#[test]
fn json_form_roundtrips() {
    let key = TransferKey::generate();
    let blob = encrypt(&key, b"serialize me").unwrap();

    let json = serde_json::to_string(&blob).unwrap();
    let back: EncryptedData = serde_json::from_str(&json).unwrap();

    assert_eq!(back, blob);
    assert_eq!(decrypt(&key, &back).unwrap(), b"serialize me");
}

// Property-based tests
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn roundtrip_always_recovers_plaintext(
            plaintext in proptest::collection::vec(any::<u8>(), 0..2048),
        ) {
            let key = TransferKey::generate();
            let blob = encrypt(&key, &plaintext).unwrap();
            prop_assert_eq!(decrypt(&key, &blob).unwrap(), plaintext);
        }

        #[test]
        fn flipping_any_byte_fails_decryption(
            plaintext in proptest::collection::vec(any::<u8>(), 1..256),
            flip in any::<u8>().prop_filter("must change the byte", |b| *b != 0),
            position in any::<prop::sample::Index>(),
        ) {
            let key = TransferKey::generate();
            let blob = encrypt(&key, &plaintext).unwrap();

            let mut bytes = blob.to_bytes();
            let idx = position.index(bytes.len());
            bytes[idx] ^= flip;

            let tampered = EncryptedData::from_bytes(&bytes).unwrap();
            prop_assert!(decrypt(&key, &tampered).is_err());
        }
    }
}
