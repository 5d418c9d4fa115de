//! `passline restore`: replace the vault with a backup file.
//!
//! The restore is unconditional: the current vault is overwritten, and
//! afterwards only the global password the backup was made with works.

use crate::cli::output;
use crate::cli::{arg_or_input, confirm, open_vault, Cli};
use crate::errors::Result;
#[cfg(feature = "audit-log")]
use crate::audit::{AuditEvent, AuditOp};
#[cfg(feature = "audit-log")]
use crate::cli::log_audit;

/// Execute the `restore` command.
pub fn execute(cli: &Cli, path: Option<&str>, force: bool) -> Result<()> {
    let (settings, mut service) = open_vault(cli)?;

    let input = arg_or_input(path, "backup path")?;
    let source = settings.backup_path(&input);
    let source_str = source.display().to_string();

    if !force {
        output::warning(
            "Restoring replaces every entry in the vault. The backup's own global password will apply afterwards.",
        );
        if !confirm(cli, &format!("Restore backup {source_str}?"))? {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    service.restore_backup(&source)?;

    #[cfg(feature = "audit-log")]
    log_audit(cli, AuditEvent::vault(AuditOp::Restore, &source_str));
    output::success(&format!(
        "Restored {} site(s) from {source_str}",
        service.item_count()
    ));

    Ok(())
}
