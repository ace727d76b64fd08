//! Connection bootstrap: pragmas and the notes schema.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Default wait for a contended lock before failing with `SQLITE_BUSY`.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Latest representable timestamp (9999-12-31T23:59:59.999999Z) in microseconds.
pub const MAX_TIMESTAMP_MICROS: i64 = 253_402_300_799_999_999;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id TEXT PRIMARY KEY NOT NULL CHECK (length(id) = 36),
    content TEXT NOT NULL,
    created_at INTEGER NOT NULL CHECK (created_at BETWEEN 0 AND 253402300799999999),
    updated_at INTEGER NOT NULL,

    CHECK (updated_at >= created_at)
);

CREATE INDEX IF NOT EXISTS notes_created_at_id
ON notes (created_at DESC, id ASC);

-- Content writes stamp updated_at from the database clock, never moving it backwards
CREATE TRIGGER IF NOT EXISTS notes_touch_updated_at
AFTER UPDATE OF content ON notes
FOR EACH ROW
BEGIN
    UPDATE notes
    SET updated_at = MAX(OLD.updated_at, CAST(unixepoch('now', 'subsec') * 1000000 AS INTEGER))
    WHERE id = OLD.id;
END;
"#;

/// `SQLite` journal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalMode {
    /// Readers do not block the writer; required for multi-process use.
    #[default]
    Wal,
    Delete,
}

impl JournalMode {
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` synchronous mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    Full,
    /// Durable across application crashes; in WAL mode a power loss may drop
    /// the last commits but never corrupts the file.
    #[default]
    Normal,
}

impl SyncMode {
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Connection settings applied when opening a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub busy_timeout: Duration,
    pub journal_mode: JournalMode,
    pub synchronous: SyncMode,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            journal_mode: JournalMode::default(),
            synchronous: SyncMode::default(),
        }
    }
}

/// Open (creating if needed) the database file, apply pragmas and the schema.
pub fn open_connection(path: &Path, options: &StoreOptions) -> StoreResult<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_URI;
    let conn = Connection::open_with_flags(path, flags).map_err(|e| {
        StoreError::sqlite(format!("open database {}", path.display()), e)
    })?;
    apply_pragmas(&conn, options)?;
    apply_schema(&conn)?;
    Ok(conn)
}

/// Open a private in-memory database with the schema applied.
pub fn open_in_memory() -> StoreResult<Connection> {
    let conn =
        Connection::open_in_memory().map_err(|e| StoreError::sqlite("open in-memory database", e))?;
    apply_pragmas(&conn, &StoreOptions::default())?;
    apply_schema(&conn)?;
    Ok(conn)
}

/// Apply the durability and concurrency pragmas.
pub fn apply_pragmas(conn: &Connection, options: &StoreOptions) -> StoreResult<()> {
    conn.busy_timeout(options.busy_timeout)
        .map_err(|e| StoreError::sqlite("set busy timeout", e))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| StoreError::sqlite("enable foreign keys", e))?;
    // journal_mode reports the resulting mode as a row
    conn.pragma_update_and_check(None, "journal_mode", options.journal_mode.pragma_value(), |row| {
        row.get::<_, String>(0)
    })
    .map_err(|e| StoreError::sqlite("set journal mode", e))?;
    conn.execute_batch(&format!(
        "PRAGMA synchronous = {};",
        options.synchronous.pragma_value()
    ))
    .map_err(|e| StoreError::sqlite("set synchronous mode", e))?;
    Ok(())
}

/// Create the notes table, its listing index, and the update trigger.
///
/// Idempotent; safe to run on every start.
pub fn apply_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(SCHEMA)
        .map_err(|e| StoreError::sqlite("apply schema", e))
}
