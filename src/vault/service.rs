//! High-level vault operations used by CLI commands.
//!
//! `VaultService` owns the in-memory `Vault` and the `VaultStore` it was
//! loaded from.  Every mutating call builds the next vault state on a
//! copy, persists it, and only then swaps it in, so a call either fully
//! applies (in memory and on disk) or leaves both exactly as they were.
//!
//! The master password is passed per call and never stored.  Derived
//! keys live in zeroize-on-drop wrappers for the duration of one call.

use std::path::{Path, PathBuf};

use zeroize::{Zeroize, Zeroizing};

use super::backup;
use super::model::{Credential, Item, Vault};
use super::store::VaultStore;
use crate::crypto::{self, Argon2Params, VaultKey};
use crate::errors::{PasslineError, Result};

/// The vault engine.  Construct one with [`VaultService::open`] and pass
/// it to whatever needs it.
pub struct VaultService {
    store: VaultStore,
    vault: Vault,
}

impl VaultService {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Load the vault at `path`.
    ///
    /// If no file exists yet, an empty vault is prepared with
    /// `new_vault_params`; it is written on the first successful create.
    pub fn open(path: impl Into<PathBuf>, new_vault_params: Argon2Params) -> Result<Self> {
        new_vault_params.validate()?;
        let store = VaultStore::new(path);
        let vault = store.load(new_vault_params)?;
        Ok(Self { store, vault })
    }

    // ------------------------------------------------------------------
    // Read-only projections
    // ------------------------------------------------------------------

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Whether a master password has been bound to the vault yet.
    pub fn is_initialized(&self) -> bool {
        self.vault.is_initialized()
    }

    pub fn item_count(&self) -> usize {
        self.vault.items.len()
    }

    /// True iff `site` has a credential for `username`.
    pub fn exists(&self, site: &str, username: &str) -> bool {
        self.vault.contains(site, username)
    }

    /// Site names in storage order.
    pub fn site_names(&self) -> Vec<String> {
        self.vault.items.iter().map(|i| i.name.clone()).collect()
    }

    pub fn sites(&self) -> &[Item] {
        &self.vault.items
    }

    pub fn site(&self, site: &str) -> Result<&Item> {
        self.vault
            .item(site)
            .ok_or_else(|| PasslineError::SiteNotFound(site.to_string()))
    }

    // ------------------------------------------------------------------
    // Master password
    // ------------------------------------------------------------------

    /// Check a candidate master password against the stored verifier.
    ///
    /// Returns `Ok(false)` for a wrong password.  A vault that has never
    /// stored a credential has no master password yet and accepts any
    /// candidate.
    pub fn check_password(&self, master_password: &str) -> Result<bool> {
        let Some(ref verifier) = self.vault.verifier else {
            return Ok(true);
        };
        let key = self.derive(master_password)?;
        key.matches_verifier(&self.vault.salt, verifier)
    }

    /// Decrypt `credential`'s stored password into its plaintext field.
    ///
    /// Fails with `WrongPassword` when the authentication tag does not
    /// verify; the credential is left untouched in that case.
    pub fn decrypt_password(&self, credential: &mut Credential, master_password: &str) -> Result<()> {
        let key = self.derive(master_password)?.credential_key()?;

        let plaintext = crypto::decrypt(
            key.as_bytes(),
            &credential.nonce,
            &credential.ciphertext,
            &credential.tag,
        )
        .map_err(|e| match e {
            PasslineError::IntegrityError => PasslineError::WrongPassword,
            other => other,
        })?;

        let password = String::from_utf8(plaintext).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            PasslineError::SerializationError("stored password is not valid UTF-8".to_string())
        })?;

        credential.set_password(Zeroizing::new(password));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Encrypt and store a new credential.
    ///
    /// The returned copy carries the plaintext for display; the stored
    /// copy never does.  The first credential ever stored binds
    /// `master_password` to the vault; later calls must use the same one.
    pub fn create_item(
        &mut self,
        site: &str,
        username: &str,
        password: &str,
        master_password: &str,
    ) -> Result<Credential> {
        validate_name("site", site)?;
        validate_name("username", username)?;

        if self.exists(site, username) {
            return Err(duplicate(site, username));
        }

        let key = self.derive(master_password)?;
        let mut next = self.vault.clone();

        match self.vault.verifier {
            Some(ref verifier) => {
                if !key.matches_verifier(&self.vault.salt, verifier)? {
                    tracing::warn!(site, "create rejected: wrong master password");
                    return Err(PasslineError::WrongPassword);
                }
            }
            None => {
                next.verifier = Some(key.verifier(&self.vault.salt)?);
                tracing::info!(path = %self.path().display(), "vault initialized");
            }
        }

        let credential_key = key.credential_key()?;
        let sealed = crypto::encrypt(credential_key.as_bytes(), password.as_bytes())?;
        let credential = Credential::from_sealed(username, sealed);

        match next.item_mut(site) {
            Some(item) => item.credentials.push(credential.clone()),
            None => {
                let mut item = Item::new(site);
                item.credentials.push(credential.clone());
                next.items.push(item);
            }
        }

        self.commit(next)?;
        tracing::info!(site, "credential created");

        let mut created = credential;
        created.set_password(Zeroizing::new(password.to_string()));
        Ok(created)
    }

    /// Like `create_item`, with a freshly generated random password.
    pub fn generate_item(
        &mut self,
        site: &str,
        username: &str,
        master_password: &str,
    ) -> Result<Credential> {
        let password = crypto::generate_password();
        self.create_item(site, username, &password, master_password)
    }

    /// Rename a credential's username in place.
    ///
    /// The ciphertext is untouched, so no master password is needed.
    /// Renaming to the current name succeeds without writing.
    pub fn edit_item(&mut self, site: &str, old_username: &str, new_username: &str) -> Result<()> {
        if !self.exists(site, old_username) {
            return Err(not_found(site, old_username));
        }
        if old_username == new_username {
            return Ok(());
        }
        validate_name("username", new_username)?;
        if self.exists(site, new_username) {
            return Err(duplicate(site, new_username));
        }

        let mut next = self.vault.clone();
        let credential = next
            .item_mut(site)
            .and_then(|item| item.find_mut(old_username))
            .ok_or_else(|| not_found(site, old_username))?;
        credential.username = new_username.to_string();

        self.commit(next)?;
        tracing::info!(site, "credential renamed");
        Ok(())
    }

    /// Remove a credential, and its site once the site is empty.
    pub fn delete_item(&mut self, site: &str, username: &str) -> Result<()> {
        if !self.exists(site, username) {
            return Err(not_found(site, username));
        }

        let mut next = self.vault.clone();
        if let Some(item) = next.item_mut(site) {
            item.credentials.retain(|c| c.username != username);
        }
        next.items.retain(|i| !i.credentials.is_empty());

        self.commit(next)?;
        tracing::info!(site, "credential deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Backup / restore
    // ------------------------------------------------------------------

    /// The vault's on-disk representation, byte for byte.
    pub fn export_backup(&self) -> Result<Vec<u8>> {
        backup::export_backup(&self.vault)
    }

    /// Replace the whole vault with a backup's contents.
    ///
    /// No merge and no master-password check: afterwards only the master
    /// password that produced the backup's verifier will work.
    pub fn import_backup(&mut self, bytes: &[u8]) -> Result<()> {
        let restored = backup::import_backup(bytes)?;
        self.commit(restored)?;
        tracing::info!(items = self.vault.items.len(), "vault restored from backup");
        Ok(())
    }

    /// Write a backup file at `path`.
    pub fn create_backup(&self, path: &Path) -> Result<()> {
        let bytes = self.export_backup()?;
        backup::write_backup(path, &bytes)?;
        tracing::info!(path = %path.display(), "backup written");
        Ok(())
    }

    /// Restore the vault from a backup file at `path`.
    pub fn restore_backup(&mut self, path: &Path) -> Result<()> {
        let restored = backup::read_backup(path)?;
        self.commit(restored)?;
        tracing::info!(path = %path.display(), "vault restored from backup");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn derive(&self, master_password: &str) -> Result<VaultKey> {
        crypto::derive_key(master_password.as_bytes(), &self.vault.salt, &self.vault.kdf)
    }

    /// Persist `next`, then make it the in-memory state.
    fn commit(&mut self, next: Vault) -> Result<()> {
        self.store.save(&next)?;
        self.vault = next;
        Ok(())
    }
}

fn validate_name(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(PasslineError::InvalidInput(format!("{what} cannot be empty")));
    }
    Ok(())
}

fn not_found(site: &str, username: &str) -> PasslineError {
    PasslineError::CredentialNotFound {
        site: site.to_string(),
        username: username.to_string(),
    }
}

fn duplicate(site: &str, username: &str) -> PasslineError {
    PasslineError::DuplicateEntry {
        site: site.to_string(),
        username: username.to_string(),
    }
}
