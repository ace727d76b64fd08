use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use notebox_core::VERSION;

use crate::logging::LogFormat;

/// Notebox - a small HTTP service for free-text notes
#[derive(Debug, Parser)]
#[command(name = "notebox")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "NOTEBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the SQLite database file
    #[arg(long, global = true, env = "NOTEBOX_DB")]
    pub db: Option<PathBuf>,

    /// Address to listen on (e.g., 127.0.0.1:8080)
    #[arg(short, long, global = true, env = "NOTEBOX_BIND")]
    pub bind: Option<String>,

    /// Milliseconds to wait for a locked database before failing
    #[arg(long, global = true, value_name = "MS")]
    pub busy_timeout_ms: Option<u64>,

    /// Log output format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Arguments for the `export` command
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the HTTP API (default)
    Serve,

    /// Create the database file and apply the schema
    Init,

    /// Write every note to stdout as JSON
    Export(ExportArgs),
}
