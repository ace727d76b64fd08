//! Note row type for database queries.

use chrono::{DateTime, Utc};

use crate::error::{StoreError, StoreResult};
use crate::id::NoteId;
use crate::storage::types::Note;

/// Raw row data from the notes table, before parsing into domain types.
///
/// Columns must be selected in the order `id, content, created_at, updated_at`.
#[derive(Debug)]
pub struct NoteRow {
    pub id: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl NoteRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            content: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }
}

impl TryFrom<NoteRow> for Note {
    type Error = StoreError;

    fn try_from(row: NoteRow) -> StoreResult<Self> {
        let id = NoteId::parse(&row.id)
            .map_err(|e| StoreError::CorruptRow(format!("Invalid note id: {}", e)))?;
        let created_at = DateTime::<Utc>::from_timestamp_micros(row.created_at)
            .ok_or_else(|| StoreError::CorruptRow(format!("Invalid created_at for {}", id)))?;
        let updated_at = DateTime::<Utc>::from_timestamp_micros(row.updated_at)
            .ok_or_else(|| StoreError::CorruptRow(format!("Invalid updated_at for {}", id)))?;

        Ok(Note {
            id,
            content: row.content,
            created_at,
            updated_at,
        })
    }
}
