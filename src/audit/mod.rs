//! Operation history kept in `<home>/audit.db`.
//!
//! Every successful mutation or backup made through the CLI appends one
//! row naming the operation, the site and username it touched, and an
//! optional free-text detail (the backup path, the old username).  Rows
//! never carry a password, plaintext or encrypted.
//!
//! Logging is best effort.  A database that cannot be opened or written
//! only costs the history, never the command that triggered it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::errors::{PasslineError, Result};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS events (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    at        TEXT NOT NULL,
    op        TEXT NOT NULL,
    site      TEXT,
    username  TEXT,
    detail    TEXT
);
CREATE INDEX IF NOT EXISTS events_site ON events (site);";

/// The operations worth remembering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOp {
    Create,
    Generate,
    Edit,
    Delete,
    Backup,
    Restore,
}

impl AuditOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Generate => "generate",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Backup => "backup",
            Self::Restore => "restore",
        }
    }
}

impl fmt::Display for AuditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditOp {
    type Err = PasslineError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "create" => Self::Create,
            "generate" => Self::Generate,
            "edit" => Self::Edit,
            "delete" => Self::Delete,
            "backup" => Self::Backup,
            "restore" => Self::Restore,
            other => {
                return Err(PasslineError::AuditError(format!(
                    "unknown operation '{other}' in audit log"
                )))
            }
        })
    }
}

/// One recorded operation, before it is stored.
#[derive(Debug, Clone, Copy)]
pub struct AuditEvent<'a> {
    pub op: AuditOp,
    pub site: Option<&'a str>,
    pub username: Option<&'a str>,
    pub detail: Option<&'a str>,
}

impl<'a> AuditEvent<'a> {
    /// An event about one credential.
    pub fn credential(op: AuditOp, site: &'a str, username: &'a str) -> Self {
        Self {
            op,
            site: Some(site),
            username: Some(username),
            detail: None,
        }
    }

    /// An event about the vault file as a whole.
    pub fn vault(op: AuditOp, detail: &'a str) -> Self {
        Self {
            op,
            site: None,
            username: None,
            detail: Some(detail),
        }
    }

    pub fn with_detail(mut self, detail: &'a str) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// A stored row, as read back by [`AuditLog::query`].
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub op: AuditOp,
    pub site: Option<String>,
    pub username: Option<String>,
    pub detail: Option<String>,
}

type RawRow = (
    i64,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

/// Which rows to read back.
#[derive(Debug, Clone)]
pub struct AuditFilter {
    /// Newest rows first, at most this many.
    pub limit: usize,
    /// Only rows at or after this instant.
    pub since: Option<DateTime<Utc>>,
    /// Only rows for this exact site name.
    pub site: Option<String>,
}

impl Default for AuditFilter {
    fn default() -> Self {
        Self {
            limit: 50,
            since: None,
            site: None,
        }
    }
}

pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the database under `home`.
    ///
    /// `None` means "no history this time"; callers carry on without it.
    pub fn open(home: &Path) -> Option<Self> {
        let path = Self::db_path(home);
        let conn = match Connection::open(&path) {
            Ok(conn) => conn,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "audit log unavailable");
                return None;
            }
        };

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600));
        }

        if let Err(e) = conn.execute_batch(SCHEMA) {
            tracing::debug!(error = %e, "audit schema setup failed");
            return None;
        }

        Some(Self { conn })
    }

    pub fn db_path(home: &Path) -> PathBuf {
        home.join("audit.db")
    }

    /// Append `event`.  Failures are logged at debug level and dropped.
    pub fn record(&self, event: AuditEvent<'_>) {
        let result = self.conn.execute(
            "INSERT INTO events (at, op, site, username, detail) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                Utc::now().to_rfc3339(),
                event.op.as_str(),
                event.site,
                event.username,
                event.detail
            ],
        );
        if let Err(e) = result {
            tracing::debug!(error = %e, op = %event.op, "audit insert failed");
        }
    }

    /// Rows matching `filter`, newest first.
    pub fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        let limit = i64::try_from(filter.limit).unwrap_or(i64::MAX);
        let since = filter.since.map(|ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, at, op, site, username, detail FROM events
                 WHERE (?1 IS NULL OR at >= ?1) AND (?2 IS NULL OR site = ?2)
                 ORDER BY id DESC
                 LIMIT ?3",
            )
            .map_err(|e| PasslineError::AuditError(format!("prepare: {e}")))?;

        let rows = stmt
            .query_map(params![since, filter.site, limit], raw_row)
            .map_err(|e| PasslineError::AuditError(format!("query: {e}")))?;

        let entries = rows
            .map(|row| -> Result<AuditEntry> {
                let (id, at, op, site, username, detail) =
                    row.map_err(|e| PasslineError::AuditError(format!("read row: {e}")))?;
                let timestamp = DateTime::parse_from_rfc3339(&at)
                    .map_err(|e| PasslineError::AuditError(format!("bad timestamp '{at}': {e}")))?
                    .with_timezone(&Utc);
                Ok(AuditEntry {
                    id,
                    timestamp,
                    op: op.parse()?,
                    site,
                    username,
                    detail,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> AuditLog {
        AuditLog::open(dir.path()).expect("audit db should open")
    }

    #[test]
    fn open_creates_database() {
        let dir = TempDir::new().unwrap();
        open(&dir);
        assert!(AuditLog::db_path(dir.path()).exists());
    }

    #[test]
    fn records_come_back_newest_first() {
        let dir = TempDir::new().unwrap();
        let audit = open(&dir);

        audit.record(AuditEvent::credential(AuditOp::Create, "example.com", "alice"));
        audit.record(AuditEvent::credential(AuditOp::Generate, "example.com", "bob"));
        audit.record(
            AuditEvent::credential(AuditOp::Edit, "example.com", "carol")
                .with_detail("renamed from alice"),
        );

        let entries = audit.query(&AuditFilter::default()).unwrap();
        let ops: Vec<_> = entries.iter().map(|e| e.op).collect();
        assert_eq!(ops, vec![AuditOp::Edit, AuditOp::Generate, AuditOp::Create]);
        assert_eq!(entries[0].detail.as_deref(), Some("renamed from alice"));
        assert_eq!(entries[2].username.as_deref(), Some("alice"));
    }

    #[test]
    fn limit_caps_the_result() {
        let dir = TempDir::new().unwrap();
        let audit = open(&dir);
        for i in 0..10 {
            let site = format!("site-{i}.com");
            audit.record(AuditEvent::credential(AuditOp::Create, &site, "u"));
        }

        let filter = AuditFilter {
            limit: 3,
            ..AuditFilter::default()
        };
        let entries = audit.query(&filter).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].site.as_deref(), Some("site-9.com"));
    }

    #[test]
    fn since_and_site_filters() {
        let dir = TempDir::new().unwrap();
        let audit = open(&dir);
        audit.record(AuditEvent::vault(AuditOp::Backup, "/tmp/b.json"));
        audit.record(AuditEvent::credential(AuditOp::Delete, "a.com", "alice"));
        audit.record(AuditEvent::credential(AuditOp::Delete, "b.com", "bob"));

        let past = AuditFilter {
            since: Some(Utc::now() - chrono::Duration::hours(1)),
            ..AuditFilter::default()
        };
        assert_eq!(audit.query(&past).unwrap().len(), 3);

        let future = AuditFilter {
            since: Some(Utc::now() + chrono::Duration::hours(1)),
            ..AuditFilter::default()
        };
        assert!(audit.query(&future).unwrap().is_empty());

        let only_a = AuditFilter {
            site: Some("a.com".into()),
            ..AuditFilter::default()
        };
        let entries = audit.query(&only_a).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username.as_deref(), Some("alice"));
    }

    #[test]
    fn operation_names_roundtrip() {
        for op in [
            AuditOp::Create,
            AuditOp::Generate,
            AuditOp::Edit,
            AuditOp::Delete,
            AuditOp::Backup,
            AuditOp::Restore,
        ] {
            assert_eq!(op.as_str().parse::<AuditOp>().unwrap(), op);
        }
        assert!("rotate".parse::<AuditOp>().is_err());
    }

    #[test]
    fn unopenable_path_yields_none() {
        assert!(AuditLog::open(Path::new("/nonexistent/passline/home")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn database_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        open(&dir);
        let mode = std::fs::metadata(AuditLog::db_path(dir.path()))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
