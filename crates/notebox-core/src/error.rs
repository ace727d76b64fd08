//! Error types for Notebox core operations.
//!
//! Three layers of failure are kept apart:
//!
//! - [`ValidationError`]: caller input of the wrong shape or range. Raised
//!   before any I/O and never wrapped.
//! - [`StoreError`]: failures from the storage layer, carrying the rusqlite
//!   cause and the operation that hit it.
//! - [`NotesError`]: what the service layer reports to the request layer.

use thiserror::Error;

use crate::id::NoteId;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, NotesError>;

/// Result type alias for storage operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Caller-supplied input that cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The string is not a hyphenated UUID
    #[error("Invalid note id {value:?}: {reason}")]
    InvalidId { value: String, reason: String },

    /// The string is a UUID, but not an RFC 4122 version 4 one
    #[error("Note id {value} is not a random (version 4) UUID")]
    NotRandomId { value: String },

    /// Page size outside the accepted bounds
    #[error("pageSize must be between {min} and {max}, got {value}")]
    PageSizeOutOfRange { value: i64, min: i64, max: i64 },
}

/// Storage layer error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Argument rejected before touching the database
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// SQLite-specific failure, including busy timeouts and constraint violations
    #[error("SQLite error during {context}: {source}")]
    Sqlite {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A stored row could not be decoded into a note
    #[error("Corrupt note row: {0}")]
    CorruptRow(String),

    /// A previous holder of the connection panicked
    #[error("SQLite connection poisoned")]
    ConnectionPoisoned,
}

impl StoreError {
    pub(crate) fn sqlite(context: impl Into<String>, source: rusqlite::Error) -> Self {
        StoreError::Sqlite {
            context: context.into(),
            source,
        }
    }

    /// Whether the failure was a lock wait that ran past the busy timeout.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            StoreError::Sqlite {
                source: rusqlite::Error::SqliteFailure(err, _),
                ..
            } if matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            )
        )
    }
}

/// Error reported by [`NoteService`](crate::NoteService).
#[derive(Debug, Error)]
pub enum NotesError {
    /// Bad shape, type, or range; storage was never touched
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The note to mutate did not exist when the transaction checked
    #[error("Note not found: {0}")]
    NotFound(NoteId),

    /// Any other storage-originated failure
    #[error("Failed to {context}")]
    Service {
        context: String,
        #[source]
        source: StoreError,
    },
}

impl NotesError {
    /// Wrap a storage failure with the operation that caused it.
    ///
    /// Validation errors raised by the store are passed through unwrapped.
    pub(crate) fn service(context: impl Into<String>, source: StoreError) -> Self {
        match source {
            StoreError::Validation(err) => NotesError::Validation(err),
            source => NotesError::Service {
                context: context.into(),
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_unwraps_store_validation() {
        let err = NotesError::service(
            "list notes",
            StoreError::Validation(ValidationError::PageSizeOutOfRange {
                value: 0,
                min: 1,
                max: 100,
            }),
        );
        assert!(matches!(
            err,
            NotesError::Validation(ValidationError::PageSizeOutOfRange { value: 0, .. })
        ));
    }

    #[test]
    fn test_service_keeps_cause_chain() {
        let err = NotesError::service(
            "create note",
            StoreError::sqlite("insert note", rusqlite::Error::InvalidQuery),
        );
        assert_eq!(err.to_string(), "Failed to create note");

        let source = std::error::Error::source(&err).expect("store error");
        assert!(source.to_string().contains("insert note"));
        assert!(std::error::Error::source(source).is_some());
    }

    #[test]
    fn test_is_busy() {
        let busy = StoreError::sqlite(
            "begin immediate transaction",
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
                None,
            ),
        );
        assert!(busy.is_busy());
        assert!(!StoreError::ConnectionPoisoned.is_busy());
    }
}
