//! SQLite storage backend.
//!
//! One [`SqliteNoteStore`] owns one connection. The connection sits behind a
//! mutex so the store can be shared with an async server, but it is only ever
//! used by one caller at a time. Coordination with other processes on the
//! same database file is left entirely to SQLite's locking.

mod row;
pub mod schema;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Params, TransactionBehavior};

use crate::error::{StoreError, StoreResult};
use crate::id::NoteId;
use crate::storage::traits::{NoteStore, NoteWriter};
use crate::storage::types::{NewNote, Note, NoteListPage, NoteUpdate, PageRequest};

use row::NoteRow;
pub use schema::{JournalMode, StoreOptions, SyncMode};

/// SQLite-backed note store.
pub struct SqliteNoteStore {
    conn: Mutex<Connection>,
}

impl SqliteNoteStore {
    /// Wrap a connection whose schema has already been applied.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open the database file at `path`, bootstrapping it if needed.
    pub fn open(path: &Path, options: &StoreOptions) -> StoreResult<Self> {
        Ok(Self::new(schema::open_connection(path, options)?))
    }

    /// Open a private in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(schema::open_in_memory()?))
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::ConnectionPoisoned)
    }
}

impl NoteStore for SqliteNoteStore {
    fn create(&self, note: &NewNote) -> StoreResult<NoteId> {
        let conn = self.lock_conn()?;
        insert_note(&conn, note)
    }

    fn find_by_id(&self, id: &NoteId) -> StoreResult<Option<Note>> {
        let conn = self.lock_conn()?;
        select_note(&conn, id)
    }

    fn list(&self, request: &PageRequest) -> StoreResult<NoteListPage> {
        let page_size = request.resolved_page_size()?;

        let mut conn = self.lock_conn()?;
        let notes = match request.after {
            None => select_page(&conn, page_size)?,
            Some(cursor) => {
                // cursor lookup and page read must see the same snapshot
                let tx = conn
                    .transaction()
                    .map_err(|e| StoreError::sqlite("begin listing transaction", e))?;
                let notes = select_page_after(&tx, page_size, &cursor)?;
                tx.commit()
                    .map_err(|e| StoreError::sqlite("commit listing transaction", e))?;
                notes
            }
        };

        Ok(NoteListPage { page_size, notes })
    }

    fn find_all(&self) -> StoreResult<Vec<Note>> {
        let conn = self.lock_conn()?;
        query_notes(
            &conn,
            "select all notes",
            r#"
            SELECT id, content, created_at, updated_at
            FROM notes
            ORDER BY rowid
            "#,
            [],
        )
    }

    fn update(&self, note: &NoteUpdate) -> StoreResult<()> {
        let conn = self.lock_conn()?;
        update_note(&conn, note)
    }

    fn delete_by_id(&self, id: &NoteId) -> StoreResult<()> {
        let conn = self.lock_conn()?;
        delete_note(&conn, id)
    }

    fn write_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn NoteWriter) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut conn = self.lock_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| StoreError::sqlite("begin immediate transaction", e))?;

        // Dropping `tx` on the error path rolls back.
        let value = f(&SqliteNoteWriter { conn: &tx })?;

        tx.commit()
            .map_err(|e| StoreError::sqlite("commit write transaction", e))?;
        Ok(value)
    }
}

/// [`NoteWriter`] bound to an open immediate transaction.
struct SqliteNoteWriter<'a> {
    conn: &'a Connection,
}

impl NoteWriter for SqliteNoteWriter<'_> {
    fn exists(&self, id: &NoteId) -> StoreResult<bool> {
        self.conn
            .query_row(
                "SELECT EXISTS (SELECT 1 FROM notes WHERE id = ?1)",
                [id.to_string()],
                |row| row.get(0),
            )
            .map_err(|e| StoreError::sqlite(format!("check note {} exists", id), e))
    }

    fn update(&self, note: &NoteUpdate) -> StoreResult<()> {
        update_note(self.conn, note)
    }

    fn delete_by_id(&self, id: &NoteId) -> StoreResult<()> {
        delete_note(self.conn, id)
    }
}

fn insert_note(conn: &Connection, note: &NewNote) -> StoreResult<NoteId> {
    let id = NoteId::new();
    let now = Utc::now().timestamp_micros();

    // Both timestamps are the insert time. If the clock has not moved past the
    // newest note, step one microsecond beyond it so creation order is strict.
    // A stored stamp of MAX_TIMESTAMP_MICROS would make this step fail the
    // created_at CHECK; inserts then error rather than reuse a stamp.
    conn.execute(
        r#"
        INSERT INTO notes (id, content, created_at, updated_at)
        SELECT ?1, ?2, stamp, stamp
        FROM (
            SELECT MAX(?3, COALESCE((SELECT MAX(created_at) + 1 FROM notes), ?3)) AS stamp
        )
        "#,
        (id.to_string(), &note.content, now),
    )
    .map_err(|e| StoreError::sqlite(format!("insert note {}", id), e))?;

    Ok(id)
}

fn select_note(conn: &Connection, id: &NoteId) -> StoreResult<Option<Note>> {
    let row = conn
        .query_row(
            r#"
            SELECT id, content, created_at, updated_at
            FROM notes
            WHERE id = ?1
            "#,
            [id.to_string()],
            NoteRow::from_row,
        )
        .optional()
        .map_err(|e| StoreError::sqlite(format!("select note {}", id), e))?;

    row.map(Note::try_from).transpose()
}

fn select_page(conn: &Connection, page_size: u32) -> StoreResult<Vec<Note>> {
    query_notes(
        conn,
        "select note page",
        r#"
        SELECT id, content, created_at, updated_at
        FROM notes
        ORDER BY created_at DESC, id ASC
        LIMIT ?1
        "#,
        [i64::from(page_size)],
    )
}

/// Keyset continuation on the full sort key: everything that sorts strictly
/// after the cursor row under `created_at DESC, id ASC`.
///
/// A cursor whose row is gone (deleted since the previous page was read) has
/// no sort position left, so the page falls back to rows with a greater id.
fn select_page_after(conn: &Connection, page_size: u32, cursor: &NoteId) -> StoreResult<Vec<Note>> {
    let cursor_created_at: Option<i64> = conn
        .query_row(
            "SELECT created_at FROM notes WHERE id = ?1",
            [cursor.to_string()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| StoreError::sqlite(format!("select cursor note {}", cursor), e))?;

    let Some(cursor_created_at) = cursor_created_at else {
        return query_notes(
            conn,
            "select note page after missing cursor",
            r#"
            SELECT id, content, created_at, updated_at
            FROM notes
            WHERE id > ?1
            ORDER BY created_at DESC, id ASC
            LIMIT ?2
            "#,
            (cursor.to_string(), i64::from(page_size)),
        );
    };

    query_notes(
        conn,
        "select note page",
        r#"
        SELECT id, content, created_at, updated_at
        FROM notes
        WHERE created_at < ?1
           OR (created_at = ?1 AND id > ?2)
        ORDER BY created_at DESC, id ASC
        LIMIT ?3
        "#,
        (cursor_created_at, cursor.to_string(), i64::from(page_size)),
    )
}

fn update_note(conn: &Connection, note: &NoteUpdate) -> StoreResult<()> {
    conn.execute(
        "UPDATE notes SET content = ?1 WHERE id = ?2",
        (&note.content, note.id.to_string()),
    )
    .map_err(|e| StoreError::sqlite(format!("update note {}", note.id), e))?;
    Ok(())
}

fn delete_note(conn: &Connection, id: &NoteId) -> StoreResult<()> {
    conn.execute("DELETE FROM notes WHERE id = ?1", [id.to_string()])
        .map_err(|e| StoreError::sqlite(format!("delete note {}", id), e))?;
    Ok(())
}

fn query_notes<P: Params>(
    conn: &Connection,
    context: &str,
    sql: &str,
    params: P,
) -> StoreResult<Vec<Note>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| StoreError::sqlite(context, e))?;
    let rows = stmt
        .query_map(params, NoteRow::from_row)
        .map_err(|e| StoreError::sqlite(context, e))?;

    let mut notes = Vec::new();
    for row in rows {
        let row = row.map_err(|e| StoreError::sqlite(context, e))?;
        notes.push(row.try_into()?);
    }

    Ok(notes)
}
