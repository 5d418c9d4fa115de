//! JSON vault file format and structural validation.
//!
//! A vault file (and a backup file) is one pretty-printed JSON object:
//!
//! ```text
//! {
//!   "version": 1,
//!   "salt": "<base64>",
//!   "verifier": "<base64>" | null,
//!   "kdf": { "memory_kib": .., "iterations": .., "parallelism": .. },
//!   "items": [ { "name": "..", "credentials": [
//!       { "username": "..", "nonce": "<b64>", "ciphertext": "<b64>", "tag": "<b64>" } ] } ]
//! }
//! ```
//!
//! Decoding never falls back to a default vault: any parse or validation
//! failure is surfaced as `InvalidVaultFormat`.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use super::model::{Vault, CURRENT_VERSION};
use crate::crypto::encryption::{NONCE_LEN, TAG_LEN};
use crate::crypto::kdf::SALT_LEN;
use crate::errors::{PasslineError, Result};

/// Length of the verifier token (HMAC-SHA256 output).
const VERIFIER_LEN: usize = 32;

/// Serialize a vault to its on-disk bytes.
///
/// Output is deterministic: the same vault always yields the same bytes.
pub fn encode_vault(vault: &Vault) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(vault)
        .map_err(|e| PasslineError::SerializationError(format!("vault: {e}")))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parse and validate vault bytes read from disk or a backup.
pub fn decode_vault(bytes: &[u8]) -> Result<Vault> {
    let vault: Vault = serde_json::from_slice(bytes)
        .map_err(|e| PasslineError::InvalidVaultFormat(format!("vault JSON: {e}")))?;
    validate(&vault)?;
    Ok(vault)
}

/// Check every structural invariant of a deserialized vault.
pub fn validate(vault: &Vault) -> Result<()> {
    if vault.version != CURRENT_VERSION {
        return Err(PasslineError::InvalidVaultFormat(format!(
            "unsupported version {}, expected {CURRENT_VERSION}",
            vault.version
        )));
    }

    if vault.salt.len() != SALT_LEN {
        return Err(PasslineError::InvalidVaultFormat(format!(
            "salt must be {SALT_LEN} bytes, got {}",
            vault.salt.len()
        )));
    }

    if let Some(ref verifier) = vault.verifier {
        if verifier.len() != VERIFIER_LEN {
            return Err(PasslineError::InvalidVaultFormat(format!(
                "verifier must be {VERIFIER_LEN} bytes, got {}",
                verifier.len()
            )));
        }
    } else if !vault.items.is_empty() {
        return Err(PasslineError::InvalidVaultFormat(
            "vault has credentials but no verifier".into(),
        ));
    }

    vault
        .kdf
        .validate()
        .map_err(|e| PasslineError::InvalidVaultFormat(format!("kdf: {e}")))?;

    let mut sites = HashSet::new();
    for item in &vault.items {
        if item.name.is_empty() {
            return Err(PasslineError::InvalidVaultFormat(
                "item with empty site name".into(),
            ));
        }
        if !sites.insert(item.name.as_str()) {
            return Err(PasslineError::InvalidVaultFormat(format!(
                "duplicate site '{}'",
                item.name
            )));
        }
        if item.credentials.is_empty() {
            return Err(PasslineError::InvalidVaultFormat(format!(
                "site '{}' has no credentials",
                item.name
            )));
        }

        let mut usernames = HashSet::new();
        for cred in &item.credentials {
            if cred.username.is_empty() {
                return Err(PasslineError::InvalidVaultFormat(format!(
                    "empty username under site '{}'",
                    item.name
                )));
            }
            if !usernames.insert(cred.username.as_str()) {
                return Err(PasslineError::InvalidVaultFormat(format!(
                    "duplicate username '{}' under site '{}'",
                    cred.username, item.name
                )));
            }
            if cred.nonce.len() != NONCE_LEN || cred.tag.len() != TAG_LEN {
                return Err(PasslineError::InvalidVaultFormat(format!(
                    "bad nonce or tag length for '{}' under site '{}'",
                    cred.username, item.name
                )));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

pub(crate) fn option_base64_encode<S>(
    data: &Option<Vec<u8>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match data {
        Some(bytes) => base64_encode(bytes, serializer),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn option_base64_decode<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<u8>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    s.map(|s| BASE64.decode(&s).map_err(serde::de::Error::custom))
        .transpose()
}
