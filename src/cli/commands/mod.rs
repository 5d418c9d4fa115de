//! One module per subcommand, each exposing `execute`.

#[cfg(feature = "audit-log")]
pub mod audit_cmd;
pub mod backup;
pub mod create;
pub mod delete;
pub mod display;
pub mod edit;
pub mod generate;
pub mod list;
pub mod restore;
