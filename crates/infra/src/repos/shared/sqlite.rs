use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

const SCHEMA_VERSION: u32 = 1;

const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS reminders (
    id          TEXT PRIMARY KEY NOT NULL,
    kind        INTEGER NOT NULL,
    param       INTEGER NOT NULL,
    warning_at  TEXT NOT NULL,      -- json list of warning codes
    spec        TEXT NOT NULL,
    description TEXT NOT NULL,
    recipients  TEXT NOT NULL       -- json list of recipient ids
);

CREATE TABLE IF NOT EXISTS notifications (
    id           TEXT PRIMARY KEY NOT NULL,
    parent       TEXT NOT NULL,
    warning_time TEXT NOT NULL,
    description  TEXT NOT NULL,
    recipient    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_notifications_parent ON notifications(parent);
CREATE INDEX IF NOT EXISTS idx_notifications_warning_time ON notifications(warning_time);

CREATE TABLE IF NOT EXISTS recipients (
    id           TEXT PRIMARY KEY NOT NULL,
    display_name TEXT NOT NULL,
    address      TEXT NOT NULL,
    addr_type    TEXT NOT NULL,
    is_default   INTEGER NOT NULL
);
"#;

/// The sqlite file shared by the sqlite repositories.
///
/// Every repository call is short and never awaits while holding the
/// connection.
pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Opens (or creates) the database file at `path` and migrates it
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        info!(path = %path.display(), "Opening database");
        Self::migrate(Connection::open(path)?)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::migrate(Connection::open_in_memory()?)
    }

    fn migrate(conn: Connection) -> anyhow::Result<Self> {
        let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if current < SCHEMA_VERSION {
            info!(current_version = current, target_version = SCHEMA_VERSION, "Migrating database");
            conn.execute_batch(SCHEMA_V1)?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Fixed width so that text comparison in sql orders like the instants
pub fn encode_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_time(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
