//! `notebox export`: every stored note as one JSON array.

use std::io::Write;

use anyhow::Context;

use notebox_core::{NoteService, NoteStore};

use crate::model::NoteJson;

/// Write all notes, in insertion order, followed by a newline.
pub fn write_notes<S, W>(service: &NoteService<S>, mut out: W, pretty: bool) -> anyhow::Result<()>
where
    S: NoteStore,
    W: Write,
{
    let notes: Vec<NoteJson> = service
        .find_all()
        .context("Failed to read notes")?
        .into_iter()
        .map(NoteJson::from)
        .collect();

    if pretty {
        serde_json::to_writer_pretty(&mut out, &notes)?;
    } else {
        serde_json::to_writer(&mut out, &notes)?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notebox_core::SqliteNoteStore;

    fn service() -> NoteService<SqliteNoteStore> {
        NoteService::new(SqliteNoteStore::open_in_memory().expect("in-memory store"))
    }

    #[test]
    fn test_empty_store_is_empty_array() {
        let mut out = Vec::new();
        write_notes(&service(), &mut out, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }

    #[test]
    fn test_notes_in_insertion_order() {
        let service = service();
        let first = service.create("first").unwrap();
        let second = service.create("second").unwrap();

        let mut out = Vec::new();
        write_notes(&service, &mut out, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let notes = value.as_array().unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0]["id"], first.to_string());
        assert_eq!(notes[0]["content"], "first");
        assert_eq!(notes[1]["id"], second.to_string());
        assert!(notes[1]["creationDateTime"].is_string());
        assert!(notes[1]["lastUpdatedDateTime"].is_string());
    }

    #[test]
    fn test_pretty_output_parses() {
        let service = service();
        service.create("indented").unwrap();

        let mut out = Vec::new();
        write_notes(&service, &mut out, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().count() > 1);

        let notes: Vec<NoteJson> = serde_json::from_str(&text).unwrap();
        assert_eq!(notes[0].content, "indented");
    }
}
