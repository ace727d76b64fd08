//! Configuration file handling and settings resolution.
//!
//! Precedence, highest first: command line / environment, config file,
//! built-in defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use notebox_core::storage::{JournalMode, StoreOptions, SyncMode};

use crate::cli::Cli;
use crate::logging::{LogFormat, LogSettings};

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_DB_PATH: &str = "notebox.sqlite3";
pub const DEFAULT_LOG_FILTER: &str = "notebox=info,notebox_server=info,tower_http=info";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NoteboxConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: Option<String>,
    pub busy_timeout_ms: Option<u64>,
    pub journal_mode: Option<JournalMode>,
    pub synchronous: Option<SyncMode>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LogSection {
    pub filter: Option<String>,
    pub format: Option<LogFormat>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: SocketAddr,
    pub db_path: PathBuf,
    pub store: StoreOptions,
    pub log: LogSettings,
}

impl Settings {
    /// Resolve settings from the command line and the config file it points to.
    ///
    /// Without `--config`, the default config path is read only if it exists.
    /// When neither `XDG_CONFIG_HOME` nor `HOME` is set there is no default
    /// path, and built-in defaults apply.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let config = match cli.config.as_deref() {
            Some(path) => Some(read_config(path)?),
            None => match default_config_path() {
                Ok(path) if path.exists() => Some(read_config(&path)?),
                _ => None,
            },
        };
        Self::resolve(cli, config.unwrap_or_default())
    }

    pub fn resolve(cli: &Cli, config: NoteboxConfig) -> anyhow::Result<Self> {
        let bind_text = cli
            .bind
            .clone()
            .or(config.server.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_text
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address {:?}: {}", bind_text, e))?;

        let db_path = cli
            .db
            .clone()
            .or_else(|| config.store.path.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let defaults = StoreOptions::default();
        let store = StoreOptions {
            busy_timeout: cli
                .busy_timeout_ms
                .or(config.store.busy_timeout_ms)
                .map(Duration::from_millis)
                .unwrap_or(defaults.busy_timeout),
            journal_mode: config.store.journal_mode.unwrap_or(defaults.journal_mode),
            synchronous: config.store.synchronous.unwrap_or(defaults.synchronous),
        };

        let log = LogSettings {
            filter: config
                .log
                .filter
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            format: cli.log_format.or(config.log.format).unwrap_or_default(),
        };

        Ok(Self {
            bind,
            db_path,
            store,
            log,
        })
    }
}

pub fn read_config(path: &Path) -> anyhow::Result<NoteboxConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("notebox"));
        }
    }
    Ok(home_dir()?.join(".config").join("notebox"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["notebox"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(&cli(&[]), NoteboxConfig::default()).unwrap();

        assert_eq!(settings.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(settings.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(settings.store, StoreOptions::default());
        assert_eq!(settings.log.filter, DEFAULT_LOG_FILTER);
        assert_eq!(settings.log.format, LogFormat::Text);
    }

    #[test]
    fn test_config_file_values() {
        let config: NoteboxConfig = toml::from_str(
            r#"
            [server]
            bind = "0.0.0.0:9000"

            [store]
            path = "/var/lib/notebox/notes.sqlite3"
            busy_timeout_ms = 250
            journal_mode = "delete"
            synchronous = "full"

            [log]
            filter = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        let settings = Settings::resolve(&cli(&[]), config).unwrap();
        assert_eq!(settings.bind.port(), 9000);
        assert_eq!(
            settings.db_path,
            PathBuf::from("/var/lib/notebox/notes.sqlite3")
        );
        assert_eq!(settings.store.busy_timeout, Duration::from_millis(250));
        assert_eq!(settings.store.journal_mode, JournalMode::Delete);
        assert_eq!(settings.store.synchronous, SyncMode::Full);
        assert_eq!(settings.log.filter, "debug");
        assert_eq!(settings.log.format, LogFormat::Json);
    }

    #[test]
    fn test_command_line_wins() {
        let config: NoteboxConfig = toml::from_str(
            r#"
            [server]
            bind = "0.0.0.0:9000"

            [store]
            path = "from-file.sqlite3"
            busy_timeout_ms = 250
            "#,
        )
        .unwrap();

        let settings = Settings::resolve(
            &cli(&[
                "--db",
                "from-cli.sqlite3",
                "--busy-timeout-ms",
                "10",
                "--bind",
                "127.0.0.1:7000",
            ]),
            config,
        )
        .unwrap();
        assert_eq!(settings.bind.port(), 7000);
        assert_eq!(settings.db_path, PathBuf::from("from-cli.sqlite3"));
        assert_eq!(settings.store.busy_timeout, Duration::from_millis(10));
    }

    #[test]
    fn test_invalid_bind_is_rejected() {
        let err = Settings::resolve(&cli(&["--bind", "not an address"]), NoteboxConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("Invalid bind address"));
    }

    #[test]
    fn test_read_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nbind = ").unwrap();

        let err = read_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
