//! Storage trait definitions.
//!
//! [`NoteStore`] is the interface the service layer programs against. It
//! owns the translation of typed note operations into queries; existence
//! checks for mutations are left to the caller, which runs them inside
//! [`NoteStore::write_transaction`].

use crate::error::{StoreError, StoreResult};
use crate::id::NoteId;

use super::types::{NewNote, Note, NoteListPage, NoteUpdate, PageRequest};

/// Storage interface for notes.
///
/// All implementations must ensure:
/// - Only parameterized statements touch the store
/// - Argument validation happens before any I/O
/// - Creation and update timestamps are assigned by the store, never the caller
pub trait NoteStore: Send + Sync {
    /// Insert a new note.
    ///
    /// # Returns
    ///
    /// Returns the freshly generated id. Creation and last-updated timestamps
    /// are both set to the insert time.
    fn create(&self, note: &NewNote) -> StoreResult<NoteId>;

    /// Get a note by id.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(note))` if found, `Ok(None)` if not found.
    fn find_by_id(&self, id: &NoteId) -> StoreResult<Option<Note>>;

    /// List one page of notes, newest first, ties broken by ascending id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if the page size is outside `[1, 100]`.
    /// An `after` id with no stored note is not an error.
    fn list(&self, request: &PageRequest) -> StoreResult<NoteListPage>;

    /// Every note in storage order. Unbounded; not for request paths.
    fn find_all(&self) -> StoreResult<Vec<Note>>;

    /// Overwrite a note's content. No-op if the id does not exist.
    fn update(&self, note: &NoteUpdate) -> StoreResult<()>;

    /// Remove a note. No-op if the id does not exist.
    fn delete_by_id(&self, id: &NoteId) -> StoreResult<()>;

    /// Run `f` inside a write transaction that takes the write lock up front.
    ///
    /// The transaction commits if `f` returns `Ok` and rolls back otherwise.
    /// Waiting for the lock is bounded by the store's busy timeout.
    fn write_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn NoteWriter) -> Result<T, E>,
        E: From<StoreError>;
}

/// Operations available inside [`NoteStore::write_transaction`].
pub trait NoteWriter {
    /// Whether a note with this id exists.
    fn exists(&self, id: &NoteId) -> StoreResult<bool>;

    /// Overwrite a note's content. No-op if the id does not exist.
    fn update(&self, note: &NoteUpdate) -> StoreResult<()>;

    /// Remove a note. No-op if the id does not exist.
    fn delete_by_id(&self, id: &NoteId) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_definition_compiles() {
        fn _accepts_note_store<T: NoteStore>(_store: T) {}
        fn _accepts_note_writer(_writer: &dyn NoteWriter) {}
    }
}
