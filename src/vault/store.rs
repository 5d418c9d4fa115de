//! Atomic load/save of the vault file.
//!
//! `VaultStore` knows where the vault lives on disk and nothing else; it
//! never decrypts anything.  Writes go to a temp file in the same
//! directory which is then renamed over the target, so readers never see
//! a half-written vault and a failed write leaves the old file intact.
//!
//! There is no cross-process locking.  Two processes saving at the same
//! time each rename a complete file into place and the last one wins.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::format::{decode_vault, encode_vault};
use super::model::Vault;
use crate::crypto::Argon2Params;
use crate::errors::Result;

/// Handle on the vault file at a fixed path.
#[derive(Debug, Clone)]
pub struct VaultStore {
    path: PathBuf,
}

impl VaultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a vault file has been written yet.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read and validate the vault.
    ///
    /// A missing file yields a fresh, uninitialized vault using
    /// `new_vault_params`; nothing is written until the first save.
    pub fn load(&self, new_vault_params: Argon2Params) -> Result<Vault> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                let vault = decode_vault(&bytes)?;
                tracing::debug!(
                    path = %self.path.display(),
                    items = vault.items.len(),
                    "vault loaded"
                );
                Ok(vault)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no vault file, starting empty");
                Ok(Vault::empty(new_vault_params))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Serialize and atomically write the vault.
    pub fn save(&self, vault: &Vault) -> Result<()> {
        let bytes = encode_vault(vault)?;
        write_atomic(&self.path, &bytes)?;
        tracing::debug!(path = %self.path.display(), "vault saved");
        Ok(())
    }
}

/// Write `bytes` to `path` via temp file + rename.
///
/// The temp file lives in the same directory so the rename stays on one
/// filesystem.  On Unix the file is created owner-only (0600).
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let result = write_and_sync(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        tracing::warn!(path = %path.display(), error = %e, "atomic write failed");
        return Err(e.into());
    }

    Ok(())
}

// The temp file must be created fresh: a leftover from a crashed write
// could carry wider permissions, and `mode` only applies on creation.
fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed stale temp file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
