//! Passline: a local, single-user encrypted password manager.
//!
//! The vault engine lives in [`vault`] and [`crypto`]; [`cli`] is the
//! interactive boundary built on top of it.

#[cfg(feature = "audit-log")]
pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod vault;

pub use errors::{PasslineError, Result};
pub use vault::{Credential, Item, VaultService};
