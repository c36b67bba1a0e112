//! Audit event model and the fire-and-forget handle used to emit events.
//!
//! Services report every store and resolver transition through an [`EventLogger`].
//! Emitting never blocks and never fails: events go into a bounded channel that a
//! background worker drains into an external sink (see
//! [`crate::infrastructure::audit::run_log_worker`]). When the channel is full or
//! the worker is gone, the event is dropped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tokio::sync::mpsc;
use tracing::debug;

/// Severity of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Success,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Success => "success",
        };
        f.write_str(name)
    }
}

/// A single audit event as delivered to the sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub context: Value,
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>, context: Value) -> Self {
        Self {
            level,
            message: message.into(),
            context,
            timestamp: Utc::now(),
        }
    }
}

/// Cloneable sending side of the audit channel.
#[derive(Debug, Clone)]
pub struct EventLogger {
    sender: mpsc::Sender<LogEvent>,
}

impl EventLogger {
    /// Creates a logger and the receiver its events arrive on.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<LogEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// A logger whose events go nowhere.
    pub fn disabled() -> Self {
        let (logger, _receiver) = Self::channel(1);
        logger
    }

    /// Emits an event without waiting. Never fails.
    pub fn log(&self, level: LogLevel, message: impl Into<String>, context: Value) {
        let event = LogEvent::new(level, message, context);

        if let Err(e) = self.sender.try_send(event) {
            debug!("Audit event dropped: {}", e);
        }
    }

    pub fn info(&self, message: impl Into<String>, context: Value) {
        self.log(LogLevel::Info, message, context);
    }

    pub fn warn(&self, message: impl Into<String>, context: Value) {
        self.log(LogLevel::Warn, message, context);
    }

    pub fn error(&self, message: impl Into<String>, context: Value) {
        self.log(LogLevel::Error, message, context);
    }

    pub fn success(&self, message: impl Into<String>, context: Value) {
        self.log(LogLevel::Success, message, context);
    }

    /// Returns true once the receiving worker has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Number of events that can still be queued without dropping.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }
}
