//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF, so brute-forcing a master password
//! against a stolen vault file costs memory as well as time.  The cost
//! parameters are chosen when the vault is created and stored in the
//! vault file, which keeps every later derivation deterministic.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::keys::VaultKey;
use crate::errors::{PasslineError, Result};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Largest memory cost accepted from a vault file or config (4 GiB).
pub const MAX_MEMORY_KIB: u32 = 4 * 1024 * 1024;

/// Largest iteration count accepted.
pub const MAX_ITERATIONS: u32 = 64;

/// Largest lane count accepted.
pub const MAX_PARALLELISM: u32 = 64;

/// Argon2id cost parameters.
///
/// Serialized into the vault file as the `kdf` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// The cheapest parameters that still pass validation.
    ///
    /// Only meant for tests and throwaway vaults.
    pub fn minimum() -> Self {
        Self {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    /// Reject settings that are too weak to protect a vault, or so large
    /// that deriving a key would exhaust memory or never finish.
    ///
    /// Vault files carry their own params, so this runs on every load and
    /// restore as well as on config values.
    pub fn validate(&self) -> Result<()> {
        self.argon2_params().map(|_| ())
    }

    fn argon2_params(&self) -> Result<Params> {
        let out_of_range = |what: &str, min: u32, max: u32, got: u32| {
            PasslineError::KeyDerivationFailed(format!(
                "Argon2 {what} must be between {min} and {max} (got {got})"
            ))
        };

        if !(MIN_MEMORY_KIB..=MAX_MEMORY_KIB).contains(&self.memory_kib) {
            return Err(out_of_range(
                "memory_kib",
                MIN_MEMORY_KIB,
                MAX_MEMORY_KIB,
                self.memory_kib,
            ));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(out_of_range("iterations", 1, MAX_ITERATIONS, self.iterations));
        }
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(out_of_range(
                "parallelism",
                1,
                MAX_PARALLELISM,
                self.parallelism,
            ));
        }

        Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| PasslineError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))
    }
}

/// Derive the 32-byte vault key from a master password and salt.
///
/// The same password + salt + params always produce the same key.  An
/// empty password is accepted; password policy belongs to the caller.
/// Argon2id's running time depends only on its parameters and the input
/// lengths, never on the password bytes themselves.
pub fn derive_key(password: &[u8], salt: &[u8], params: &Argon2Params) -> Result<VaultKey> {
    let argon2_params = params.argon2_params()?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = VaultKey::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password, salt, key.as_mut_bytes())
        .map_err(|e| PasslineError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
