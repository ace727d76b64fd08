//! # Notebox Server
//!
//! HTTP front end for [`notebox_core`]: JSON routes over a single SQLite
//! database, configured from the command line, the environment, and an
//! optional TOML file.

pub mod app;
pub mod cli;
pub mod config;
pub mod export;
pub mod logging;
pub mod model;
pub mod routes;

pub use app::AppState;
pub use routes::router;
