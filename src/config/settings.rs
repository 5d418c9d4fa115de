use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crypto::Argon2Params;
use crate::errors::{PasslineError, Result};

/// Contents of `<home>/config.toml`.
///
/// Every key is optional; an absent file means all defaults.  Unknown keys
/// are rejected so a typo such as `argon2_memory = ...` does not silently
/// fall back to the default cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Vault file, relative to the home directory unless absolute.
    pub vault_file: String,

    /// Where bare backup file names are resolved.
    pub backup_dir: Option<PathBuf>,

    /// Argon2 cost for vaults created from now on.  Existing vaults keep
    /// the parameters recorded in their own file.
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,

    /// Copy generated and displayed passwords instead of printing them.
    pub clipboard: bool,

    /// Seconds a copied password stays on the clipboard before it is
    /// cleared.  `0` leaves it there.
    pub clip_timeout: u64,

    /// Show a desktop notification after copying to the clipboard.
    /// `PASSLINE_NO_NOTIFY` turns this off regardless.
    pub notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let kdf = Argon2Params::default();
        Self {
            vault_file: "storage.json".into(),
            backup_dir: None,
            argon2_memory_kib: kdf.memory_kib,
            argon2_iterations: kdf.iterations,
            argon2_parallelism: kdf.parallelism,
            clipboard: true,
            clip_timeout: 45,
            notifications: true,
        }
    }
}

impl Settings {
    pub const FILE_NAME: &'static str = "config.toml";

    /// Read `<home>/config.toml`, falling back to defaults when absent.
    pub fn load(home: &Path) -> Result<Self> {
        let path = home.join(Self::FILE_NAME);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        let settings: Settings = toml::from_str(&text).map_err(|e| {
            PasslineError::ConfigError(format!("{}: {e}", path.display()))
        })?;
        if settings.vault_file.is_empty() {
            return Err(PasslineError::ConfigError(format!(
                "{}: vault_file cannot be empty",
                path.display()
            )));
        }
        settings
            .argon2_params()
            .validate()
            .map_err(|e| PasslineError::ConfigError(format!("{}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn vault_path(&self, home: &Path) -> PathBuf {
        home.join(&self.vault_file)
    }

    /// Resolve a backup path typed by the user.
    ///
    /// A bare file name goes under `backup_dir` when one is set; anything
    /// with a directory component is taken as given.
    pub fn backup_path(&self, input: &str) -> PathBuf {
        let path = Path::new(input);
        let bare = path.parent().is_some_and(|p| p.as_os_str().is_empty());
        match self.backup_dir {
            Some(ref dir) if bare => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn clip_timeout(&self) -> Duration {
        Duration::from_secs(self.clip_timeout)
    }

    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn load_str(toml: &str) -> Result<Settings> {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(Settings::FILE_NAME), toml).unwrap();
        Settings::load(tmp.path())
    }

    #[test]
    fn no_file_means_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.argon2_params(), Argon2Params::default());
        assert!(settings.clipboard);
        assert_eq!(settings.clip_timeout(), Duration::from_secs(45));
        assert!(settings.notifications);
    }

    #[test]
    fn every_key_is_read() {
        let settings = load_str(
            r#"
vault_file = "vault.json"
backup_dir = "/backups"
argon2_memory_kib = 131072
argon2_iterations = 5
argon2_parallelism = 8
clipboard = false
clip_timeout = 10
notifications = false
"#,
        )
        .unwrap();

        assert_eq!(settings.vault_file, "vault.json");
        assert_eq!(settings.backup_dir, Some(PathBuf::from("/backups")));
        assert_eq!(
            settings.argon2_params(),
            Argon2Params {
                memory_kib: 131_072,
                iterations: 5,
                parallelism: 8,
            }
        );
        assert!(!settings.clipboard);
        assert_eq!(settings.clip_timeout(), Duration::from_secs(10));
        assert!(!settings.notifications);
    }

    #[test]
    fn zero_clip_timeout_is_allowed() {
        let settings = load_str("clip_timeout = 0\n").unwrap();
        assert_eq!(settings.clip_timeout(), Duration::ZERO);
        assert!(settings.clipboard);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = load_str("clipboard = false\n").unwrap();
        assert!(!settings.clipboard);
        assert_eq!(settings.vault_file, "storage.json");
        assert_eq!(settings.argon2_iterations, 3);
    }

    #[test]
    fn bad_files_are_config_errors() {
        for toml in [
            "not valid {{toml",
            "argon2_memory_kib = 64\n",
            "argon2_memory = 65536\n",
            "vault_file = \"\"\n",
            "clip_timeout = -5\n",
            "clip_timeout = \"45s\"\n",
        ] {
            assert!(
                matches!(load_str(toml), Err(PasslineError::ConfigError(_))),
                "{toml:?} should be rejected"
            );
        }
    }

    #[test]
    fn vault_path_is_under_home() {
        let path = Settings::default().vault_path(Path::new("/home/user/.passline"));
        assert_eq!(path, PathBuf::from("/home/user/.passline/storage.json"));
    }

    #[test]
    fn bare_backup_names_use_backup_dir() {
        let s = Settings {
            backup_dir: Some(PathBuf::from("/backups")),
            ..Settings::default()
        };
        assert_eq!(s.backup_path("b.json"), PathBuf::from("/backups/b.json"));
        assert_eq!(s.backup_path("/tmp/b.json"), PathBuf::from("/tmp/b.json"));
        assert_eq!(s.backup_path("./b.json"), PathBuf::from("./b.json"));
        assert_eq!(
            Settings::default().backup_path("b.json"),
            PathBuf::from("b.json")
        );
    }
}
