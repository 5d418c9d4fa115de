//! `passline display`: decrypt one credential and show it.

use crate::cli::output;
use crate::cli::{
    copy_to_clipboard, open_vault, prompt_master_password, select_credential, select_item, Cli,
};
use crate::errors::{PasslineError, Result};

/// Execute the `display` command.
pub fn execute(cli: &Cli, site: Option<&str>, username: Option<&str>, copy: bool) -> Result<()> {
    let (settings, service) = open_vault(cli)?;

    if service.item_count() == 0 {
        output::info("No items in this vault yet.");
        return Ok(());
    }

    let item = select_item(&service, site)?;
    let mut credential = select_credential(item, username)?;

    let master = prompt_master_password()?;
    if !service.check_password(&master)? {
        return Err(PasslineError::WrongPassword);
    }

    service.decrypt_password(&mut credential, &master)?;

    if copy {
        copy_to_clipboard(
            &settings,
            credential.password().unwrap_or_default(),
            &format!(
                "Copied password for '{}' at {} to the clipboard",
                credential.username, item.name
            ),
        )?;
    } else {
        output::print_credential(&item.name, &credential);
    }
    credential.clear_password();

    Ok(())
}
