//! Note service: the validating facade the request layer calls.
//!
//! Inputs arrive as primitives (content text, id strings, an optional page
//! size) and are validated here before anything reaches storage. Updates and
//! deletes check existence and mutate inside one immediate write transaction,
//! so a concurrent delete cannot slip between the check and the write.

use crate::error::{NotesError, Result, StoreError};
use crate::id::NoteId;
use crate::storage::traits::NoteStore;
use crate::storage::types::{NewNote, Note, NoteListPage, NoteUpdate, PageRequest};

/// Service over a [`NoteStore`], constructed once at startup.
pub struct NoteService<S> {
    store: S,
}

/// Failure inside an existence-checked write.
enum CheckedWrite {
    Missing,
    Store(StoreError),
}

impl From<StoreError> for CheckedWrite {
    fn from(err: StoreError) -> Self {
        CheckedWrite::Store(err)
    }
}

impl<S: NoteStore> NoteService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a note and return its id.
    pub fn create(&self, content: impl Into<String>) -> Result<NoteId> {
        let note = NewNote::new(content);
        self.store.create(&note).map_err(|e| {
            NotesError::service(
                format!("create note ({} bytes of content)", note.content.len()),
                e,
            )
        })
    }

    /// Look up a note. A well-formed id with no matching note is `Ok(None)`.
    pub fn find_by_id(&self, id: &str) -> Result<Option<Note>> {
        let id = NoteId::parse(id)?;
        self.store
            .find_by_id(&id)
            .map_err(|e| NotesError::service(format!("find note {}", id), e))
    }

    /// List a page of notes, newest first.
    pub fn list(&self, page_size: Option<i64>, after_id: Option<&str>) -> Result<NoteListPage> {
        let request = PageRequest {
            page_size,
            after: after_id.map(NoteId::parse).transpose()?,
        };
        request.resolved_page_size()?;

        self.store
            .list(&request)
            .map_err(|e| NotesError::service("list notes", e))
    }

    /// Every stored note. Unbounded; meant for export and tests.
    pub fn find_all(&self) -> Result<Vec<Note>> {
        self.store
            .find_all()
            .map_err(|e| NotesError::service("list all notes", e))
    }

    /// Replace the content of an existing note.
    ///
    /// # Errors
    ///
    /// Returns `NotesError::NotFound` if no note has this id; nothing is written.
    pub fn update(&self, id: &str, content: impl Into<String>) -> Result<()> {
        let update = NoteUpdate::new(NoteId::parse(id)?, content);

        self.store
            .write_transaction(|tx| {
                if !tx.exists(&update.id)? {
                    return Err(CheckedWrite::Missing);
                }
                tx.update(&update)?;
                Ok(())
            })
            .map_err(|e| match e {
                CheckedWrite::Missing => NotesError::NotFound(update.id),
                CheckedWrite::Store(source) => {
                    NotesError::service(format!("update note {}", update.id), source)
                }
            })
    }

    /// Delete an existing note.
    ///
    /// # Errors
    ///
    /// Returns `NotesError::NotFound` if no note has this id, including when
    /// it was already deleted.
    pub fn delete_by_id(&self, id: &str) -> Result<()> {
        let id = NoteId::parse(id)?;

        self.store
            .write_transaction(|tx| {
                if !tx.exists(&id)? {
                    return Err(CheckedWrite::Missing);
                }
                tx.delete_by_id(&id)?;
                Ok(())
            })
            .map_err(|e| match e {
                CheckedWrite::Missing => NotesError::NotFound(id),
                CheckedWrite::Store(source) => {
                    NotesError::service(format!("delete note {}", id), source)
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::storage::SqliteNoteStore;

    fn service() -> NoteService<SqliteNoteStore> {
        NoteService::new(SqliteNoteStore::open_in_memory().expect("in-memory store"))
    }

    #[test]
    fn test_malformed_id_is_validation_error() {
        let service = service();

        assert!(matches!(
            service.find_by_id("nope"),
            Err(NotesError::Validation(ValidationError::InvalidId { .. }))
        ));
        assert!(matches!(
            service.update("nope", "x"),
            Err(NotesError::Validation(_))
        ));
        assert!(matches!(
            service.delete_by_id("nope"),
            Err(NotesError::Validation(_))
        ));
        assert!(matches!(
            service.list(None, Some("nope")),
            Err(NotesError::Validation(_))
        ));
    }

    #[test]
    fn test_list_continues_after_cursor_is_deleted() {
        let service = service();
        for i in 0..5 {
            service.create(format!("n{}", i)).unwrap();
        }

        let first = service.list(Some(2), None).unwrap();
        let cursor = first.notes.last().unwrap().id;
        service.delete_by_id(&cursor.to_string()).unwrap();

        let next = service.list(Some(2), Some(&cursor.to_string())).unwrap();
        assert_eq!(next.page_size, 2);
        assert!(next.notes.len() <= 2);
        assert!(next.notes.iter().all(|n| n.id > cursor));
    }

    #[test]
    fn test_update_missing_writes_nothing() {
        let service = service();
        let missing = NoteId::new().to_string();

        assert!(matches!(
            service.update(&missing, "ghost"),
            Err(NotesError::NotFound(_))
        ));
        assert!(service.find_all().unwrap().is_empty());
    }
}
