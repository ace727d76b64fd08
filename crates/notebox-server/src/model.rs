//! JSON shapes on the wire.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use notebox_core::storage::{Note, NoteListPage};
use notebox_core::NoteId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteJson {
    pub id: NoteId,
    pub content: String,
    pub creation_date_time: String,
    pub last_updated_date_time: String,
}

impl From<Note> for NoteJson {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            content: note.content,
            creation_date_time: rfc3339(note.created_at),
            last_updated_date_time: rfc3339(note.updated_at),
        }
    }
}

/// RFC 3339 in UTC, always with microseconds so stamps sort as text.
fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListJson {
    pub page_size: u32,
    pub notes: Vec<NoteJson>,
}

impl From<NoteListPage> for NoteListJson {
    fn from(page: NoteListPage) -> Self {
        Self {
            page_size: page.page_size,
            notes: page.notes.into_iter().map(NoteJson::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedJson {
    pub id: NoteId,
}

/// Body of `POST /notes` and `PUT /notes/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentJson {
    pub content: String,
}

/// Query string of `GET /notes`.
///
/// `pageSize` stays a string here so a non-numeric value is reported with
/// the same message shape as an out-of-range one.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page_size: Option<String>,
    pub after_id: Option<String>,
}
