//! Vault module: encrypted credential storage.
//!
//! This module provides:
//! - `Vault`, `Item` and `Credential` types (`model`)
//! - JSON file format and validation (`format`)
//! - Atomic load/save of the vault file (`store`)
//! - Verbatim backup export/import (`backup`)
//! - The `VaultService` engine that ties them together (`service`)

pub mod backup;
pub mod format;
pub mod model;
pub mod service;
pub mod store;

pub use model::{Credential, Item, Vault};
pub use service::VaultService;
pub use store::VaultStore;
