//! `passline generate`: store a credential with a random password.

use crate::cli::output;
use crate::cli::{arg_or_input, copy_to_clipboard, master_password_for, open_vault, Cli};
use crate::errors::{PasslineError, Result};
#[cfg(feature = "audit-log")]
use crate::audit::{AuditEvent, AuditOp};
#[cfg(feature = "audit-log")]
use crate::cli::log_audit;

/// Execute the `generate` command.
pub fn execute(cli: &Cli, site: Option<&str>, username: Option<&str>, print: bool) -> Result<()> {
    let (settings, mut service) = open_vault(cli)?;

    let site = arg_or_input(site, "site")?;
    let username = arg_or_input(username, "username")?;

    if service.exists(&site, &username) {
        return Err(PasslineError::DuplicateEntry { site, username });
    }

    let master = master_password_for(&service)?;
    let mut credential = service.generate_item(&site, &username, &master)?;
    #[cfg(feature = "audit-log")]
    log_audit(cli, AuditEvent::credential(AuditOp::Generate, &site, &username));

    let password = credential.password().unwrap_or_default();
    if print || !settings.clipboard {
        output::success(&format!("Generated password for '{username}' at {site}"));
        output::print_credential(&site, &credential);
    } else if let Err(e) = copy_to_clipboard(
        &settings,
        password,
        &format!("Generated password for '{username}' at {site} and copied it to the clipboard"),
    ) {
        // The credential is already stored; show it rather than lose it.
        output::warning(&e.to_string());
        output::print_credential(&site, &credential);
    }
    credential.clear_password();

    Ok(())
}
