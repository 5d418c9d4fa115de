use thiserror::Error;

/// All errors that can occur in Passline.
///
/// The core never terminates the process: every failure travels up to the
/// binary, which decides how to report it.
#[derive(Debug, Error)]
pub enum PasslineError {
    // --- Lookup errors ---
    #[error("Site '{0}' not found")]
    SiteNotFound(String),

    #[error("No credential '{username}' for site '{site}'")]
    CredentialNotFound { site: String, username: String },

    #[error("Credential '{username}' already exists for site '{site}'")]
    DuplicateEntry { site: String, username: String },

    // --- Crypto errors ---
    #[error("Wrong master password")]
    WrongPassword,

    #[error("Authentication tag did not verify; wrong key or corrupted record")]
    IntegrityError,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Storage errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

impl PasslineError {
    /// True when the error means the requested site or credential is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PasslineError::SiteNotFound(_) | PasslineError::CredentialNotFound { .. }
        )
    }
}

/// Convenience type alias for Passline results.
pub type Result<T> = std::result::Result<T, PasslineError>;
