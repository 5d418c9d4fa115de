//! User configuration (`config.toml` in the Passline home).

pub mod settings;

pub use settings::Settings;
