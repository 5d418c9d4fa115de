//! Integration tests for the Passline crypto module.

use passline::crypto::{decrypt, derive_key, encrypt, generate_salt, Argon2Params, VaultKey};
use passline::PasslineError;

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = [0xABu8; 32];
    let plaintext = b"correct horse battery staple";

    let sealed = encrypt(&key, plaintext).expect("encrypt should succeed");
    let recovered =
        decrypt(&key, &sealed.nonce, &sealed.ciphertext, &sealed.tag).expect("decrypt");
    assert_eq!(recovered, plaintext);
}

#[test]
fn encrypt_uses_fresh_nonce_each_time() {
    let key = [0xCDu8; 32];

    let s1 = encrypt(&key, b"same").expect("encrypt 1");
    let s2 = encrypt(&key, b"same").expect("encrypt 2");

    assert_ne!(s1.nonce, s2.nonce, "nonces must never repeat");
    assert_ne!(s1.ciphertext, s2.ciphertext);
}

#[test]
fn decrypt_with_wrong_key_is_integrity_error() {
    let sealed = encrypt(&[0x11u8; 32], b"TOP_SECRET").expect("encrypt");
    let result = decrypt(&[0x22u8; 32], &sealed.nonce, &sealed.ciphertext, &sealed.tag);

    assert!(matches!(result, Err(PasslineError::IntegrityError)));
}

#[test]
fn tampered_ciphertext_or_tag_fails() {
    let key = [0x33u8; 32];
    let sealed = encrypt(&key, b"do not touch").expect("encrypt");

    let mut ct = sealed.ciphertext.clone();
    ct[0] ^= 0x01;
    assert!(matches!(
        decrypt(&key, &sealed.nonce, &ct, &sealed.tag),
        Err(PasslineError::IntegrityError)
    ));

    let mut tag = sealed.tag.clone();
    tag[15] ^= 0x80;
    assert!(matches!(
        decrypt(&key, &sealed.nonce, &sealed.ciphertext, &tag),
        Err(PasslineError::IntegrityError)
    ));
}

#[test]
fn empty_plaintext_roundtrips() {
    let key = [0x44u8; 32];
    let sealed = encrypt(&key, b"").expect("encrypt");
    assert!(sealed.ciphertext.is_empty());
    assert!(decrypt(&key, &sealed.nonce, &sealed.ciphertext, &sealed.tag)
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Key derivation and verifier
// ---------------------------------------------------------------------------

#[test]
fn kdf_then_cipher_roundtrip() {
    let salt = generate_salt();
    let params = Argon2Params::minimum();

    let key = derive_key(b"m1", &salt, &params).unwrap();
    let credential_key = key.credential_key().unwrap();
    let sealed = encrypt(credential_key.as_bytes(), b"p@ss").unwrap();

    let again = derive_key(b"m1", &salt, &params)
        .unwrap()
        .credential_key()
        .unwrap();
    let plain = decrypt(again.as_bytes(), &sealed.nonce, &sealed.ciphertext, &sealed.tag).unwrap();
    assert_eq!(plain, b"p@ss");
}

#[test]
fn verifier_distinguishes_master_passwords() {
    let salt = generate_salt();
    let params = Argon2Params::minimum();

    let right = derive_key(b"m1", &salt, &params).unwrap();
    let wrong = derive_key(b"wrong", &salt, &params).unwrap();
    let token = right.verifier(&salt).unwrap();

    assert!(right.matches_verifier(&salt, &token).unwrap());
    assert!(!wrong.matches_verifier(&salt, &token).unwrap());
}

#[test]
fn vault_key_exposes_bytes() {
    let key = VaultKey::new([0x5Au8; 32]);
    assert_eq!(key.as_bytes(), &[0x5Au8; 32]);
}
