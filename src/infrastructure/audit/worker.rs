//! Background drain for the audit channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use super::service::EventSink;
use crate::domain::log_event::LogEvent;

const BACKOFF_BASE_MS: u64 = 10;
const BACKOFF_MAX: Duration = Duration::from_secs(2);

/// Drains `rx` into `sink` until every [`crate::domain::log_event::EventLogger`]
/// has been dropped.
///
/// Each event is retried up to `max_retries` times with jittered exponential
/// backoff. Events that still fail are logged and discarded, so a broken sink
/// can slow the drain but never the services producing events.
pub async fn run_log_worker(
    mut rx: mpsc::Receiver<LogEvent>,
    sink: Arc<dyn EventSink>,
    max_retries: usize,
) {
    info!("Audit log worker started, sink: {}", sink.describe());

    let mut delivered: u64 = 0;
    let mut failed: u64 = 0;

    while let Some(event) = rx.recv().await {
        let strategy = ExponentialBackoff::from_millis(BACKOFF_BASE_MS)
            .max_delay(BACKOFF_MAX)
            .map(jitter)
            .take(max_retries);

        let result = Retry::start(strategy, || {
            let sink = sink.clone();
            let event = event.clone();
            async move { sink.deliver(&event).await }
        })
        .await;

        match result {
            Ok(()) => delivered += 1,
            Err(e) => {
                failed += 1;
                warn!(
                    "Audit event '{}' dropped after {} retries: {}",
                    event.message, max_retries, e
                );
            }
        }
    }

    debug!(
        "Audit log worker stopped ({} delivered, {} failed)",
        delivered, failed
    );
}
