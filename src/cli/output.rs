//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{Credential, Item};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print one credential.  The password row only appears when the
/// credential has been decrypted.
pub fn print_credential(site: &str, credential: &Credential) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Site", site]);
    table.add_row(vec!["Username", credential.username.as_str()]);
    if let Some(password) = credential.password() {
        table.add_row(vec!["Password", password]);
    }
    println!("{table}");
}

/// Print a table of sites and their usernames.
pub fn print_items_table(items: &[Item]) {
    if items.is_empty() {
        info("No items in this vault yet.");
        tip("Run `passline create <SITE> <USERNAME>` to add your first credential.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Site", "Usernames"]);

    for item in items {
        table.add_row(vec![item.name.clone(), item.usernames().join("\n")]);
    }

    println!("{table}");
}
