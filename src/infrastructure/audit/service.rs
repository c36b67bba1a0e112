//! Delivery contract for audit events.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::log_event::LogEvent;

/// Delivery failure reported by an [`EventSink`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("Sink unreachable: {0}")]
    Transport(String),

    #[error("Sink rejected event with status {status}")]
    Rejected { status: u16 },
}

/// Destination for audit events drained by the log worker.
///
/// Implementations may fail; the worker retries with backoff and then gives up.
/// Nothing in the request path ever waits on a sink.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn deliver(&self, event: &LogEvent) -> Result<(), SinkError>;

    /// Short description for startup logs.
    fn describe(&self) -> String;
}
