//! Cryptographic primitives for Passline.
//!
//! This module provides:
//! - Argon2id password-based key derivation (`kdf`)
//! - HKDF sub-keys and the master-password verifier (`keys`)
//! - AES-256-GCM encryption and decryption with detached tags (`encryption`)
//! - Random password generation (`generator`)

pub mod encryption;
pub mod generator;
pub mod kdf;
pub mod keys;

pub use encryption::{decrypt, encrypt, Sealed};
pub use generator::generate_password;
pub use kdf::{derive_key, generate_salt, Argon2Params};
pub use keys::VaultKey;
