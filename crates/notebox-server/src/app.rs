//! Shared state and the server lifecycle.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use notebox_core::{NoteService, SqliteNoteStore};

use crate::config::Settings;
use crate::routes::{self, error::ApiError};

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    notes: Arc<NoteService<SqliteNoteStore>>,
}

impl AppState {
    pub fn new(notes: NoteService<SqliteNoteStore>) -> Self {
        Self {
            notes: Arc::new(notes),
        }
    }

    /// Run a blocking service call off the async worker threads.
    pub async fn run<T, F>(&self, call: F) -> Result<T, ApiError>
    where
        F: FnOnce(&NoteService<SqliteNoteStore>) -> notebox_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let notes = Arc::clone(&self.notes);
        match tokio::task::spawn_blocking(move || call(&notes)).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(err) => {
                tracing::error!(error = %err, "note service task failed");
                Err(ApiError::Internal)
            }
        }
    }
}

/// Open (creating if needed) the database named by the settings.
pub fn open_service(settings: &Settings) -> anyhow::Result<NoteService<SqliteNoteStore>> {
    let store = SqliteNoteStore::open(&settings.db_path, &settings.store)
        .with_context(|| format!("Failed to open database {}", settings.db_path.display()))?;
    Ok(NoteService::new(store))
}

pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let service = open_service(settings)?;
    let app = routes::router(AppState::new(service));

    let listener = TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind))?;
    tracing::info!(
        addr = %settings.bind,
        db = %settings.db_path.display(),
        "notebox listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("notebox stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
