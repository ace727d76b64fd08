//! # Notebox Core
//!
//! Core library for Notebox - a small HTTP service for free-text notes kept in
//! a single SQLite table.
//!
//! This crate provides the data-access and domain layers independent of the
//! HTTP interface.
//!
//! ## Architecture
//!
//! - **id**: validated random note identifiers
//! - **storage**: storage trait, value types, and the SQLite implementation
//!   (schema bootstrap, keyset pagination, immediate write transactions)
//! - **service**: validating facade with existence-checked update/delete
//! - **error**: validation, storage, and service error kinds

pub mod error;
pub mod id;
pub mod service;
pub mod storage;

pub use error::{NotesError, Result, StoreError, StoreResult, ValidationError};
pub use id::NoteId;
pub use service::NoteService;
pub use storage::{NoteStore, SqliteNoteStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
