use clap::Parser;
use passline::cli::commands;
use passline::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create {
            ref site,
            ref username,
        } => commands::create::execute(&cli, site.as_deref(), username.as_deref()),
        Commands::Generate {
            ref site,
            ref username,
            print,
        } => commands::generate::execute(&cli, site.as_deref(), username.as_deref(), print),
        Commands::Display {
            ref site,
            ref username,
            copy,
        } => commands::display::execute(&cli, site.as_deref(), username.as_deref(), copy),
        Commands::Edit {
            ref site,
            ref username,
            ref new_username,
        } => commands::edit::execute(
            &cli,
            site.as_deref(),
            username.as_deref(),
            new_username.as_deref(),
        ),
        Commands::Delete {
            ref site,
            ref username,
            force,
        } => commands::delete::execute(&cli, site.as_deref(), username.as_deref(), force),
        Commands::List { ref site } => commands::list::execute(&cli, site.as_deref()),
        Commands::Backup { ref path } => commands::backup::execute(&cli, path.as_deref()),
        Commands::Restore { ref path, force } => {
            commands::restore::execute(&cli, path.as_deref(), force)
        }
        #[cfg(feature = "audit-log")]
        Commands::Audit {
            last,
            ref since,
            ref site,
        } => commands::audit_cmd::execute(&cli, last, since.as_deref(), site.as_deref()),
    };

    if let Err(e) = result {
        passline::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `PASSLINE_LOG` (default: warn).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("PASSLINE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
