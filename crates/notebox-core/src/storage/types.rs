//! Core data types for the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::NoteId;

/// Page size used when a listing does not ask for one.
pub const PAGE_SIZE_DEFAULT: u32 = 20;

/// Smallest accepted page size (inclusive).
pub const PAGE_SIZE_MIN: i64 = 1;

/// Largest accepted page size (inclusive).
pub const PAGE_SIZE_MAX: i64 = 100;

/// A persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Primary key, never reused
    pub id: NoteId,

    /// Free-text body (may be empty)
    pub content: String,

    /// Set once at insert
    pub created_at: DateTime<Utc>,

    /// Set at insert and bumped by the store on every content write
    pub updated_at: DateTime<Utc>,
}

/// Builder for creating new notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub content: String,
}

impl NewNote {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Replacement content for an existing note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteUpdate {
    pub id: NoteId,
    pub content: String,
}

impl NoteUpdate {
    pub fn new(id: NoteId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// One page of a note listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteListPage {
    /// The page-size bound that was applied, not the number of notes returned
    pub page_size: u32,

    /// Notes, newest first
    pub notes: Vec<Note>,
}

/// Arguments for a keyset-paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Requested page size; [`PAGE_SIZE_DEFAULT`] when `None`
    pub page_size: Option<i64>,

    /// Continue after this note in listing order
    pub after: Option<NoteId>,
}

impl PageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn after(mut self, id: NoteId) -> Self {
        self.after = Some(id);
        self
    }

    /// The page size to apply, checked against the accepted range.
    pub fn resolved_page_size(&self) -> Result<u32, ValidationError> {
        match self.page_size {
            None => Ok(PAGE_SIZE_DEFAULT),
            Some(value) if (PAGE_SIZE_MIN..=PAGE_SIZE_MAX).contains(&value) => {
                u32::try_from(value).map_err(|_| out_of_range(value))
            }
            Some(value) => Err(out_of_range(value)),
        }
    }
}

fn out_of_range(value: i64) -> ValidationError {
    ValidationError::PageSizeOutOfRange {
        value,
        min: PAGE_SIZE_MIN,
        max: PAGE_SIZE_MAX,
    }
}
