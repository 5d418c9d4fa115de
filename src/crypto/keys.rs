//! Sub-key derivation and the master-password verifier.
//!
//! From the Argon2id output we expand two independent keys with
//! HKDF-SHA256:
//! - the **credential key**, used with AES-256-GCM for every stored password;
//! - the **verifier key**, used to compute the vault's verifier token.
//!
//! The verifier token is `HMAC-SHA256(verifier_key, salt)`.  Checking a
//! candidate master password only needs one KDF run and one HMAC, no
//! credential ciphertext is touched.

use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

use super::kdf::KEY_LEN;
use crate::errors::{PasslineError, Result};

const CREDENTIAL_INFO: &[u8] = b"passline-credential-key";
const VERIFIER_INFO: &[u8] = b"passline-verifier-key";

/// A 32-byte key that zeroes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; KEY_LEN] {
        &mut self.bytes
    }

    /// Key used to encrypt and decrypt credential passwords.
    pub fn credential_key(&self) -> Result<VaultKey> {
        hkdf_derive(&self.bytes, CREDENTIAL_INFO)
    }

    /// Compute the verifier token binding this key to `salt`.
    pub fn verifier(&self, salt: &[u8]) -> Result<Vec<u8>> {
        let mac = self.verifier_mac(salt)?;
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Check a stored verifier token in constant time.
    pub fn matches_verifier(&self, salt: &[u8], expected: &[u8]) -> Result<bool> {
        let mac = self.verifier_mac(salt)?;
        Ok(mac.verify_slice(expected).is_ok())
    }

    fn verifier_mac(&self, salt: &[u8]) -> Result<Hmac<Sha256>> {
        let verifier_key = hkdf_derive(&self.bytes, VERIFIER_INFO)?;
        let mut mac = Hmac::<Sha256>::new_from_slice(verifier_key.as_bytes())
            .map_err(|e| PasslineError::KeyDerivationFailed(format!("invalid HMAC key: {e}")))?;
        mac.update(salt);
        Ok(mac)
    }
}

// The master key already has full entropy (it came from Argon2id), so the
// extract step runs with the default zero salt.
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<VaultKey> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = VaultKey::new([0u8; KEY_LEN]);
    hk.expand(info, okm.as_mut_bytes())
        .map_err(|e| PasslineError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_key_differs_from_master() {
        let master = VaultKey::new([0x11; KEY_LEN]);
        let sub = master.credential_key().unwrap();
        assert_ne!(sub.as_bytes(), master.as_bytes());
    }

    #[test]
    fn verifier_roundtrip() {
        let master = VaultKey::new([0x22; KEY_LEN]);
        let salt = b"some-salt-bytes";

        let token = master.verifier(salt).unwrap();
        assert_eq!(token.len(), 32);
        assert!(master.matches_verifier(salt, &token).unwrap());
    }

    #[test]
    fn verifier_rejects_other_key_and_salt() {
        let master = VaultKey::new([0x22; KEY_LEN]);
        let other = VaultKey::new([0x23; KEY_LEN]);
        let token = master.verifier(b"salt-one").unwrap();

        assert!(!other.matches_verifier(b"salt-one", &token).unwrap());
        assert!(!master.matches_verifier(b"salt-two", &token).unwrap());
        assert!(!master.matches_verifier(b"salt-one", &token[..16]).unwrap());
    }
}
