//! Vault, Item and Credential types.
//!
//! A `Vault` holds an ordered list of `Item`s (one per site) plus the salt,
//! verifier and KDF parameters needed to check a master password.  Each
//! `Item` holds an ordered list of `Credential`s, unique by username.
//!
//! A credential's plaintext password only ever lives in the transient
//! `password` field.  That field is skipped by serde, redacted from
//! `Debug` output and wiped on drop.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::format::{base64_decode, base64_encode, option_base64_decode, option_base64_encode};
use crate::crypto::{Argon2Params, Sealed};
use crate::errors::{PasslineError, Result};

/// Current vault schema version.
pub const CURRENT_VERSION: u8 = 1;

/// The root aggregate persisted to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub version: u8,

    /// Salt for Argon2id key derivation (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// HMAC token proving knowledge of the master password.
    /// `None` until the first credential is stored.
    #[serde(
        default,
        serialize_with = "option_base64_encode",
        deserialize_with = "option_base64_decode"
    )]
    pub verifier: Option<Vec<u8>>,

    /// Argon2 params fixed at vault creation.
    pub kdf: Argon2Params,

    #[serde(default)]
    pub items: Vec<Item>,
}

impl Vault {
    /// A fresh vault with a new random salt and no master password yet.
    pub fn empty(kdf: Argon2Params) -> Self {
        Self {
            version: CURRENT_VERSION,
            salt: crate::crypto::generate_salt().to_vec(),
            verifier: None,
            kdf,
            items: Vec::new(),
        }
    }

    /// Whether a master password has been bound to this vault.
    pub fn is_initialized(&self) -> bool {
        self.verifier.is_some()
    }

    pub fn item(&self, site: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.name == site)
    }

    pub(crate) fn item_mut(&mut self, site: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.name == site)
    }

    pub fn contains(&self, site: &str, username: &str) -> bool {
        self.item(site)
            .is_some_and(|item| item.find(username).is_some())
    }
}

/// All credentials stored for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Site identifier, unique within the vault (case-sensitive).
    pub name: String,

    #[serde(default)]
    pub credentials: Vec<Credential>,
}

impl Item {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            credentials: Vec::new(),
        }
    }

    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    /// Usernames in storage order, for building selection prompts.
    pub fn usernames(&self) -> Vec<String> {
        self.credentials.iter().map(|c| c.username.clone()).collect()
    }

    /// Look up a credential by exact username.
    pub fn credential_by_username(&self, username: &str) -> Result<Credential> {
        self.find(username)
            .cloned()
            .ok_or_else(|| PasslineError::CredentialNotFound {
                site: self.name.clone(),
                username: username.to_string(),
            })
    }

    pub(crate) fn find(&self, username: &str) -> Option<&Credential> {
        self.credentials.iter().find(|c| c.username == username)
    }

    pub(crate) fn find_mut(&mut self, username: &str) -> Option<&mut Credential> {
        self.credentials.iter_mut().find(|c| c.username == username)
    }
}

/// One username + encrypted password pair.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,

    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub nonce: Vec<u8>,

    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub ciphertext: Vec<u8>,

    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub tag: Vec<u8>,

    #[serde(skip)]
    password: Option<Zeroizing<String>>,
}

impl Credential {
    pub(crate) fn from_sealed(username: &str, sealed: Sealed) -> Self {
        Self {
            username: username.to_string(),
            nonce: sealed.nonce,
            ciphertext: sealed.ciphertext,
            tag: sealed.tag,
            password: None,
        }
    }

    /// The decrypted password, if this copy has been populated.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().map(String::as_str)
    }

    pub(crate) fn set_password(&mut self, plaintext: Zeroizing<String>) {
        self.password = Some(plaintext);
    }

    /// Wipe the plaintext password from memory.
    pub fn clear_password(&mut self) {
        // Dropping the Zeroizing wrapper zeroes the buffer.
        self.password = None;
    }
}

// Equality covers the persisted fields only.
impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
            && self.nonce == other.nonce
            && self.ciphertext == other.ciphertext
            && self.tag == other.tag
    }
}

impl Eq for Credential {}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("nonce", &self.nonce.len())
            .field("ciphertext", &self.ciphertext.len())
            .field("tag", &self.tag.len())
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
