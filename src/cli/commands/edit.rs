//! `passline edit`: rename a credential's username.

use crate::cli::output;
use crate::cli::{open_vault, prompt_failed, select_credential, select_item, Cli};
use crate::errors::Result;
#[cfg(feature = "audit-log")]
use crate::audit::{AuditEvent, AuditOp};
#[cfg(feature = "audit-log")]
use crate::cli::log_audit;

/// Execute the `edit` command.
pub fn execute(
    cli: &Cli,
    site: Option<&str>,
    username: Option<&str>,
    new_username: Option<&str>,
) -> Result<()> {
    let (_settings, mut service) = open_vault(cli)?;

    if service.item_count() == 0 {
        output::info("No items in this vault yet.");
        return Ok(());
    }

    let item = select_item(&service, site)?;
    let site = item.name.clone();
    let current = select_credential(item, username)?.username;

    let new_username = match new_username {
        Some(name) => name.to_string(),
        None => dialoguer::Input::<String>::new()
            .with_prompt("Please enter a new username")
            .default(current.clone())
            .interact_text()
            .map_err(prompt_failed)?,
    };

    service.edit_item(&site, &current, &new_username)?;

    if new_username == current {
        output::info("Username unchanged.");
    } else {
        #[cfg(feature = "audit-log")]
        log_audit(
            cli,
            AuditEvent::credential(AuditOp::Edit, &site, &new_username)
                .with_detail(&format!("renamed from {current}")),
        );
        output::success(&format!("Renamed '{current}' to '{new_username}' at {site}"));
    }

    Ok(())
}
