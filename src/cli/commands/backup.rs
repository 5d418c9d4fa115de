//! `passline backup`: copy the encrypted vault to a backup file.

use crate::cli::output;
use crate::cli::{arg_or_input, open_vault, Cli};
use crate::errors::{PasslineError, Result};
#[cfg(feature = "audit-log")]
use crate::audit::{AuditEvent, AuditOp};
#[cfg(feature = "audit-log")]
use crate::cli::log_audit;

/// Execute the `backup` command.
pub fn execute(cli: &Cli, path: Option<&str>) -> Result<()> {
    let (settings, service) = open_vault(cli)?;

    let input = arg_or_input(path, "backup path")?;
    let dest = settings.backup_path(&input);

    if dest == service.path() {
        return Err(PasslineError::CommandFailed(
            "refusing to back up the vault onto itself".into(),
        ));
    }

    service.create_backup(&dest)?;

    let dest_str = dest.display().to_string();
    #[cfg(feature = "audit-log")]
    log_audit(cli, AuditEvent::vault(AuditOp::Backup, &dest_str));
    output::success(&format!(
        "Backed up {} site(s) to {dest_str}",
        service.item_count()
    ));
    output::tip("The backup opens only with the global password in use right now.");

    Ok(())
}
