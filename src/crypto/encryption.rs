//! AES-256-GCM authenticated encryption of single credential passwords.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce.  The
//! authentication tag is kept detached so the vault file can store the
//! nonce, ciphertext and tag as separate fields.

use aes_gcm::aead::{AeadInPlace, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce, Tag};
use zeroize::Zeroize;

use crate::errors::{PasslineError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Output of a single `encrypt` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

/// Encrypt `plaintext` with a 32-byte `key`.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Sealed> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| PasslineError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(&nonce, b"", &mut buffer)
        .map_err(|e| {
            buffer.zeroize();
            PasslineError::EncryptionFailed(format!("encryption error: {e}"))
        })?;

    Ok(Sealed {
        nonce: nonce.to_vec(),
        ciphertext: buffer,
        tag: tag.to_vec(),
    })
}

/// Decrypt a record produced by `encrypt`.
///
/// Fails with `IntegrityError` when the tag does not verify.  No partial
/// plaintext is ever returned.
pub fn decrypt(key: &[u8], nonce: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN || tag.len() != TAG_LEN {
        return Err(PasslineError::IntegrityError);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| PasslineError::IntegrityError)?;

    let mut buffer = ciphertext.to_vec();
    match cipher.decrypt_in_place_detached(
        Nonce::from_slice(nonce),
        b"",
        &mut buffer,
        Tag::from_slice(tag),
    ) {
        Ok(()) => Ok(buffer),
        Err(_) => {
            buffer.zeroize();
            Err(PasslineError::IntegrityError)
        }
    }
}
