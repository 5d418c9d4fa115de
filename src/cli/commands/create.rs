//! `passline create`: store a credential with a password typed by the user.

use crate::cli::output;
use crate::cli::{arg_or_input, master_password_for, open_vault, prompt_failed, Cli};
use crate::errors::{PasslineError, Result};
#[cfg(feature = "audit-log")]
use crate::audit::{AuditEvent, AuditOp};
#[cfg(feature = "audit-log")]
use crate::cli::log_audit;

/// Execute the `create` command.
pub fn execute(cli: &Cli, site: Option<&str>, username: Option<&str>) -> Result<()> {
    let (_settings, mut service) = open_vault(cli)?;

    let site = arg_or_input(site, "site")?;
    let username = arg_or_input(username, "username")?;

    // Bail out before asking for any secret.
    if service.exists(&site, &username) {
        return Err(PasslineError::DuplicateEntry { site, username });
    }

    let password = zeroize::Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt(format!("Password for {username}@{site}"))
            .interact()
            .map_err(prompt_failed)?,
    );

    let master = master_password_for(&service)?;
    let mut credential = service.create_item(&site, &username, &password, &master)?;

    #[cfg(feature = "audit-log")]
    log_audit(cli, AuditEvent::credential(AuditOp::Create, &site, &username));
    output::success(&format!("Stored '{username}' for {site}"));
    output::print_credential(&site, &credential);
    credential.clear_password();

    Ok(())
}
