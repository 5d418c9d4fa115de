//! `passline delete`: remove a credential from the vault.

use crate::cli::output;
use crate::cli::{confirm, open_vault, select_credential, select_item, Cli};
use crate::errors::Result;
#[cfg(feature = "audit-log")]
use crate::audit::{AuditEvent, AuditOp};
#[cfg(feature = "audit-log")]
use crate::cli::log_audit;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, site: Option<&str>, username: Option<&str>, force: bool) -> Result<()> {
    let (_settings, mut service) = open_vault(cli)?;

    if service.item_count() == 0 {
        output::info("No items in this vault yet.");
        return Ok(());
    }

    let item = select_item(&service, site)?;
    let site = item.name.clone();
    let username = select_credential(item, username)?.username;

    if !force && !confirm(cli, &format!("Delete '{username}' at {site}?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    service.delete_item(&site, &username)?;

    #[cfg(feature = "audit-log")]
    log_audit(cli, AuditEvent::credential(AuditOp::Delete, &site, &username));
    output::success(&format!("Deleted '{username}' at {site}"));
    if service.site(&site).is_err() {
        output::tip(&format!("{site} had no credentials left and was removed."));
    }

    Ok(())
}
