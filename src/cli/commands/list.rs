//! `passline list`: show sites and usernames (never passwords).

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, site: Option<&str>) -> Result<()> {
    let (_settings, service) = open_vault(cli)?;

    match site {
        Some(name) => {
            let item = service.site(name)?;
            output::print_items_table(std::slice::from_ref(item));
        }
        None => {
            output::info(&format!("{} site(s)", service.item_count()));
            output::print_items_table(service.sites());
        }
    }

    Ok(())
}
