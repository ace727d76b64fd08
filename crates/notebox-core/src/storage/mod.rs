//! Storage abstraction for Notebox.
//!
//! This module defines the `NoteStore` trait and the value types that flow
//! through it.
//!
//! ## Architecture
//!
//! The service layer only sees the `NoteStore` trait. The SQLite backend
//! holds a single connection and relies on SQLite's own locking for
//! coordination between processes sharing one database file.

pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export public types
pub use sqlite::{JournalMode, SqliteNoteStore, StoreOptions, SyncMode};
pub use traits::{NoteStore, NoteWriter};
pub use types::{
    NewNote, Note, NoteListPage, NoteUpdate, PageRequest, PAGE_SIZE_DEFAULT, PAGE_SIZE_MAX,
    PAGE_SIZE_MIN,
};
