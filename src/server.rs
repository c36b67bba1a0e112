//! HTTP server initialization and runtime setup.
//!
//! Handles snapshot loading, audit worker spawning, and Axum server lifecycle.

use crate::config::Config;
use crate::domain::log_event::EventLogger;
use crate::infrastructure::audit::{EventSink, HttpSink, TracingSink, run_log_worker};
use crate::infrastructure::blob::{BlobStore, FileBlobStore, NullBlobStore};
use crate::infrastructure::persistence::MemoryUrlRepository;
use crate::routes::app_router;
use crate::state::{AppState, HttpSettings};
use crate::utils::clock::SystemClock;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

/// How long shutdown waits for queued audit events to drain.
const LOG_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the blob store backing the table snapshot.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub async fn open_blob_store(config: &Config) -> Result<Arc<dyn BlobStore>> {
    match &config.data_dir {
        Some(dir) => {
            let store = FileBlobStore::open(dir)
                .await
                .with_context(|| format!("Failed to open data directory {}", dir.display()))?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(NullBlobStore::new())),
    }
}

/// Picks the audit sink: the HTTP collector when configured, the process log otherwise.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn build_event_sink(config: &Config) -> Result<Arc<dyn EventSink>> {
    match &config.log_sink_url {
        Some(url) => {
            let sink = HttpSink::new(url.clone(), config.log_sink_token.clone())
                .context("Failed to build log sink client")?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(TracingSink)),
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Blob store and the mapping table loaded from it
/// - Audit event channel and its background worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The stored table is unreadable or corrupt
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let blob_store = open_blob_store(&config).await?;
    let repository = Arc::new(
        MemoryUrlRepository::load(blob_store)
            .await
            .context("Failed to load URL table")?,
    );

    let (logger, log_rx) = EventLogger::channel(config.log_queue_capacity);
    let sink = build_event_sink(&config)?;
    let log_worker = tokio::spawn(run_log_worker(log_rx, sink, config.log_sink_retries));

    let settings = HttpSettings {
        base_url: config.base_url.clone(),
        redirect_delay: config.redirect_delay(),
        max_batch_size: config.max_batch_size,
        default_validity_minutes: config.default_validity_minutes,
    };
    let state = AppState::new(repository, Arc::new(SystemClock), logger, settings);

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router held the last loggers; once it is gone the worker drains and exits.
    if tokio::time::timeout(LOG_DRAIN_TIMEOUT, log_worker)
        .await
        .is_err()
    {
        tracing::warn!("Audit log worker did not drain within {:?}", LOG_DRAIN_TIMEOUT);
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Terminate signal received, starting graceful shutdown");
}
