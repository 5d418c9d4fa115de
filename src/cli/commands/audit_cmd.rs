//! `passline audit`: show recent vault operations.
//!
//!   passline audit                    # newest 50
//!   passline audit --last 10
//!   passline audit --since 7d         # also 24h, 30m
//!   passline audit --site example.com

use chrono::{DateTime, Duration, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::audit::{AuditEntry, AuditFilter, AuditLog, AuditOp};
use crate::cli::output;
use crate::cli::{home_dir, Cli};
use crate::errors::{PasslineError, Result};

pub fn execute(cli: &Cli, last: usize, since: Option<&str>, site: Option<&str>) -> Result<()> {
    let home = home_dir(cli)?;
    let audit = AuditLog::open(&home).ok_or_else(|| {
        PasslineError::AuditError(format!(
            "cannot open {}",
            AuditLog::db_path(&home).display()
        ))
    })?;

    let filter = AuditFilter {
        limit: last,
        since: since.map(since_instant).transpose()?,
        site: site.map(String::from),
    };
    let entries = audit.query(&filter)?;

    if entries.is_empty() {
        output::info("Nothing recorded for that selection.");
        return Ok(());
    }

    println!("{}", render(&entries));
    Ok(())
}

/// `"7d"` / `"24h"` / `"30m"` to the instant that long ago.
fn since_instant(input: &str) -> Result<DateTime<Utc>> {
    let bad = || {
        PasslineError::CommandFailed(format!(
            "cannot read '{input}' as a duration; try 7d, 24h or 30m"
        ))
    };

    let input = input.trim();
    let unit_at = input
        .char_indices()
        .last()
        .map(|(i, _)| i)
        .ok_or_else(bad)?;
    let amount: i64 = input[..unit_at].parse().map_err(|_| bad())?;
    if amount < 0 {
        return Err(bad());
    }

    let span = match &input[unit_at..] {
        "d" => Duration::try_days(amount),
        "h" => Duration::try_hours(amount),
        "m" => Duration::try_minutes(amount),
        _ => None,
    }
    .ok_or_else(bad)?;

    Utc::now().checked_sub_signed(span).ok_or_else(bad)
}

fn render(entries: &[AuditEntry]) -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["When", "Operation", "Site", "Username", "Detail"]);

    let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    for entry in entries {
        table.add_row(vec![
            entry
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            op_label(entry.op),
            dash(&entry.site),
            dash(&entry.username),
            dash(&entry.detail),
        ]);
    }
    table
}

fn op_label(op: AuditOp) -> String {
    let text = style(op.as_str());
    match op {
        AuditOp::Create | AuditOp::Generate => text.green(),
        AuditOp::Edit => text.blue(),
        AuditOp::Delete => text.red(),
        AuditOp::Backup => text.cyan(),
        AuditOp::Restore => text.yellow(),
    }
    .to_string()
}
