//! Verbatim backup export/import.
//!
//! A backup is the exact on-disk representation of the vault: salt,
//! verifier, KDF params and every credential's ciphertext.  Nothing is
//! decrypted or re-encrypted, so a backup can only be opened with the
//! master password that was in effect when it was taken.

use std::fs;
use std::path::Path;

use super::format::{decode_vault, encode_vault};
use super::model::Vault;
use super::store::write_atomic;
use crate::errors::Result;

/// Serialize a vault into backup bytes.
pub fn export_backup(vault: &Vault) -> Result<Vec<u8>> {
    encode_vault(vault)
}

/// Parse backup bytes into a vault.
///
/// Malformed input is an error; there is no fallback to an empty vault.
pub fn import_backup(bytes: &[u8]) -> Result<Vault> {
    decode_vault(bytes)
}

/// Write backup bytes to `path` atomically.
pub fn write_backup(path: &Path, bytes: &[u8]) -> Result<()> {
    write_atomic(path, bytes)
}

/// Read and parse a backup file.
pub fn read_backup(path: &Path) -> Result<Vault> {
    let bytes = fs::read(path)?;
    import_backup(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Argon2Params;
    use crate::errors::PasslineError;
    use tempfile::TempDir;

    #[test]
    fn export_import_preserves_bytes() {
        let vault = Vault::empty(Argon2Params::minimum());
        let bytes = export_backup(&vault).unwrap();
        let restored = import_backup(&bytes).unwrap();
        assert_eq!(export_backup(&restored).unwrap(), bytes);
    }

    #[test]
    fn read_missing_backup_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = read_backup(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(PasslineError::Io(_))));
    }

    #[test]
    fn import_rejects_truncated_backup() {
        let vault = Vault::empty(Argon2Params::minimum());
        let bytes = export_backup(&vault).unwrap();
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(
            import_backup(truncated),
            Err(PasslineError::InvalidVaultFormat(_))
        ));
    }
}
