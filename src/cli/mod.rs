//! CLI module: Clap argument parser, prompts, output helpers, and command
//! implementations.
//!
//! Everything interactive lives here.  The vault engine in `crate::vault`
//! never prompts and never exits; commands gather input first, then call
//! into a `VaultService` they construct themselves.

pub mod clipboard;
pub mod commands;
pub mod notify;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{PasslineError, Result};
use crate::vault::{Credential, Item, VaultService};

/// Passline CLI: local encrypted password manager.
#[derive(Parser)]
#[command(name = "passline", about = "Local encrypted password manager", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Passline home directory (default: ~/.passline)
    #[arg(long, env = "PASSLINE_HOME", global = true)]
    pub home: Option<String>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Store a new credential
    #[command(visible_alias = "add")]
    Create {
        /// Site or URL (prompted if omitted)
        site: Option<String>,
        /// Username or login (prompted if omitted)
        username: Option<String>,
    },

    /// Store a new credential with a generated password
    #[command(visible_alias = "gen")]
    Generate {
        /// Site or URL (prompted if omitted)
        site: Option<String>,
        /// Username or login (prompted if omitted)
        username: Option<String>,
        /// Print the password instead of copying it to the clipboard
        #[arg(long)]
        print: bool,
    },

    /// Decrypt and show a credential
    #[command(visible_alias = "show")]
    Display {
        /// Site (selected from a list if omitted)
        site: Option<String>,
        /// Username (selected from a list if omitted)
        username: Option<String>,
        /// Copy the password to the clipboard instead of printing it
        #[arg(short, long)]
        copy: bool,
    },

    /// Rename a credential's username
    Edit {
        /// Site (selected from a list if omitted)
        site: Option<String>,
        /// Current username (selected from a list if omitted)
        username: Option<String>,
        /// New username (prompted if omitted)
        #[arg(long)]
        new_username: Option<String>,
    },

    /// Delete a credential
    #[command(visible_alias = "rm")]
    Delete {
        /// Site (selected from a list if omitted)
        site: Option<String>,
        /// Username (selected from a list if omitted)
        username: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List sites and their usernames
    #[command(visible_alias = "ls")]
    List {
        /// Only show this site
        site: Option<String>,
    },

    /// Write an encrypted backup of the vault
    Backup {
        /// Backup file path (prompted if omitted)
        path: Option<String>,
    },

    /// Replace the vault with a backup
    Restore {
        /// Backup file path (prompted if omitted)
        path: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// View the audit log of vault operations
    #[cfg(feature = "audit-log")]
    Audit {
        /// Number of entries to show
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
        /// Only show entries for this site
        #[arg(long)]
        site: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the Passline home directory.
///
/// `--home` / `PASSLINE_HOME` win; otherwise `$HOME/.passline`.
pub fn home_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(ref home) = cli.home {
        return Ok(PathBuf::from(home));
    }
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".passline"))
        .ok_or_else(|| {
            PasslineError::ConfigError("cannot locate home directory; use --home".into())
        })
}

/// Load settings and open the vault they point at.
pub fn open_vault(cli: &Cli) -> Result<(Settings, VaultService)> {
    let home = home_dir(cli)?;
    let settings = Settings::load(&home)?;
    let service = VaultService::open(settings.vault_path(&home), settings.argon2_params())?;
    Ok((settings, service))
}

/// Map a dialoguer failure; Ctrl-C and Esc count as a cancellation.
pub fn prompt_failed(e: dialoguer::Error) -> PasslineError {
    match e {
        dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            PasslineError::UserCancelled
        }
        dialoguer::Error::IO(io) => PasslineError::CommandFailed(format!("prompt: {io}")),
    }
}

/// Get the master password, trying in order:
/// 1. `PASSLINE_PASSWORD` env var (scripts/CI)
/// 2. Interactive hidden prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_master_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("PASSLINE_PASSWORD") {
        return Ok(Zeroizing::new(pw));
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter global password")
        .interact()
        .map_err(prompt_failed)?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for the master password of a vault that has none yet.
///
/// Asks twice so a typo can't lock the user out of their own vault.
pub fn prompt_new_master_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("PASSLINE_PASSWORD") {
        return Ok(Zeroizing::new(pw));
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Choose global password")
        .with_confirmation("Confirm global password", "Passwords do not match, try again")
        .interact()
        .map_err(prompt_failed)?;
    Ok(Zeroizing::new(pw))
}

/// Master password prompt appropriate for the vault's state.
pub fn master_password_for(service: &VaultService) -> Result<Zeroizing<String>> {
    if service.is_initialized() {
        prompt_master_password()
    } else {
        output::info("This is a new vault; the password you choose now protects every entry.");
        prompt_new_master_password()
    }
}

/// Use the positional argument if given, otherwise ask for it.
pub fn arg_or_input(arg: Option<&str>, label: &str) -> Result<String> {
    if let Some(value) = arg.filter(|v| !v.is_empty()) {
        return Ok(value.to_string());
    }

    dialoguer::Input::<String>::new()
        .with_prompt(format!("Please enter a {label}"))
        .interact_text()
        .map_err(prompt_failed)
}

/// Use the positional argument if given, otherwise pick from `choices`.
///
/// A single choice is taken without asking.
pub fn arg_or_select(arg: Option<&str>, label: &str, choices: &[String]) -> Result<String> {
    if let Some(value) = arg.filter(|v| !v.is_empty()) {
        return Ok(value.to_string());
    }

    match choices {
        [] => Err(PasslineError::CommandFailed(format!("no {label} to choose from"))),
        [only] => {
            output::info(&format!("Selected {label}: {only}"));
            Ok(only.clone())
        }
        _ => {
            let index = dialoguer::Select::new()
                .with_prompt(format!("Please select a {label}"))
                .items(choices)
                .default(0)
                .interact()
                .map_err(prompt_failed)?;
            Ok(choices[index].clone())
        }
    }
}

/// Resolve the site argument to an item, offering a list if omitted.
pub fn select_item<'a>(service: &'a VaultService, site: Option<&str>) -> Result<&'a Item> {
    let names = service.site_names();
    let name = arg_or_select(site, "site", &names)?;
    service.site(&name)
}

/// Resolve the username argument within `item`, offering a list if omitted.
pub fn select_credential(item: &Item, username: Option<&str>) -> Result<Credential> {
    let name = arg_or_select(username, "username", &item.usernames())?;
    item.credential_by_username(&name)
}

/// Ask a yes/no question; `--yes` answers it.
pub fn confirm(cli: &Cli, prompt: &str) -> Result<bool> {
    if cli.yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(prompt_failed)
}

/// Copy `secret` to the system clipboard and announce it with `message`.
///
/// Blocks for the configured `clip_timeout`, then clears the clipboard if
/// it still holds `secret`.  Only a failed copy is an error; a failed
/// clear is reported as a warning since the copy already happened.
pub fn copy_to_clipboard(settings: &Settings, secret: &str, message: &str) -> Result<()> {
    use clipboard::ClipboardBackend;

    let mut backend = clipboard::SystemClipboard::open()?;
    backend.set_text(secret)?;

    let timeout = settings.clip_timeout();
    let body = if timeout.is_zero() {
        message.to_string()
    } else {
        format!("{message}. Clearing in {} seconds.", timeout.as_secs())
    };
    output::success(&body);
    notify::notify(settings, "passline", &body);

    if !timeout.is_zero() {
        output::tip("Keep this running until then, or press Ctrl-C to leave the clipboard as is.");
    }
    if let Err(e) = clipboard::clear_after(&mut backend, secret, timeout) {
        output::warning(&format!("Could not clear the clipboard: {e}"));
    }
    Ok(())
}

/// Record an operation in the audit log, if that feature is compiled in.
///
/// Never fails the calling command.
#[cfg(feature = "audit-log")]
pub fn log_audit(cli: &Cli, event: crate::audit::AuditEvent<'_>) {
    let Ok(home) = home_dir(cli) else {
        return;
    };
    if let Some(audit) = crate::audit::AuditLog::open(&home) {
        audit.record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with_home(home: Option<&str>) -> Cli {
        Cli {
            command: Commands::List { site: None },
            home: home.map(String::from),
            yes: false,
        }
    }

    #[test]
    fn explicit_home_wins() {
        let cli = cli_with_home(Some("/tmp/pl-home"));
        assert_eq!(home_dir(&cli).unwrap(), PathBuf::from("/tmp/pl-home"));
    }

    #[test]
    fn arguments_skip_prompts() {
        assert_eq!(arg_or_input(Some("example.com"), "site").unwrap(), "example.com");
        assert_eq!(
            arg_or_select(Some("bob"), "username", &["alice".into()]).unwrap(),
            "bob"
        );
    }

    #[test]
    fn single_choice_is_selected_without_prompt() {
        let choices = vec!["alice".to_string()];
        assert_eq!(arg_or_select(None, "username", &choices).unwrap(), "alice");
    }

    #[test]
    fn no_choices_is_an_error() {
        assert!(arg_or_select(None, "site", &[]).is_err());
    }

    #[test]
    fn yes_flag_confirms() {
        let mut cli = cli_with_home(None);
        cli.yes = true;
        assert!(confirm(&cli, "Really?").unwrap());
    }

    #[test]
    fn parses_aliases_and_flags() {
        let cli = Cli::try_parse_from(["passline", "gen", "example.com", "alice", "--print"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Generate { ref site, print: true, .. } if site.as_deref() == Some("example.com")
        ));

        let cli = Cli::try_parse_from(["passline", "rm", "-f", "example.com"]).unwrap();
        assert!(matches!(cli.command, Commands::Delete { force: true, .. }));
    }
}
