use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rusqlite::Connection;
use serde_json::Value;

use notebox_core::storage::StoreOptions;
use notebox_core::{NoteService, SqliteNoteStore};

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_notebox"))
}

/// A command isolated from the caller's config and environment overrides.
fn notebox(config_home: &Path) -> Command {
    let mut cmd = Command::new(bin());
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env_remove("NOTEBOX_CONFIG")
        .env_remove("NOTEBOX_DB")
        .env_remove("NOTEBOX_BIND")
        .env_remove("RUST_LOG");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    let output = cmd.output().expect("run notebox");
    assert!(
        output.status.success(),
        "notebox failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

#[test]
fn test_cli_init_creates_schema() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("notes.sqlite3");

    let output = run(notebox(dir.path()).arg("--db").arg(&db).arg("init"));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Initialized notebox database"));
    assert!(db.exists());

    let conn = Connection::open(&db).unwrap();
    let names: Vec<String> = conn
        .prepare("SELECT name FROM sqlite_master WHERE name LIKE 'notes%' ORDER BY name")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        names,
        vec!["notes", "notes_created_at_id", "notes_touch_updated_at"]
    );
}

#[test]
fn test_cli_runs_without_home() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("notes.sqlite3");

    let mut cmd = Command::new(bin());
    cmd.env_remove("HOME")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("NOTEBOX_CONFIG")
        .env_remove("NOTEBOX_DB")
        .arg("--db")
        .arg(&db)
        .arg("init");
    run(&mut cmd);
    assert!(db.exists());
}

#[test]
fn test_cli_export_json() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("notes.sqlite3");

    let (first, second) = {
        let service =
            NoteService::new(SqliteNoteStore::open(&db, &StoreOptions::default()).unwrap());
        let first = service.create("first").unwrap();
        let second = service.create("second").unwrap();
        (first, second)
    };

    let output = run(notebox(dir.path()).arg("--db").arg(&db).arg("export"));
    let notes: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["id"], first.to_string());
    assert_eq!(notes[0]["content"], "first");
    assert_eq!(notes[1]["id"], second.to_string());
    assert_eq!(notes[1]["content"], "second");
    for note in &notes {
        assert!(note["creationDateTime"].is_string());
        assert!(note["lastUpdatedDateTime"].is_string());
    }

    let output = run(notebox(dir.path())
        .arg("--db")
        .arg(&db)
        .args(["export", "--pretty"]));
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.lines().count() > 2);
    let pretty: Vec<Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(pretty, notes);
}

#[test]
fn test_cli_bad_config_message() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "[store\npath = ").unwrap();

    let output = notebox(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("init")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse config"), "stderr: {stderr}");
}
