//! Audit event delivery.
//!
//! Services push [`crate::domain::log_event::LogEvent`]s into a bounded channel;
//! [`run_log_worker`] drains it into an [`EventSink`].
//!
//! - [`TracingSink`] - Writes events to the process log (default)
//! - [`HttpSink`] - Posts events to an external collector

pub mod http_sink;
pub mod service;
pub mod tracing_sink;
pub mod worker;

pub use http_sink::HttpSink;
pub use service::{EventSink, SinkError};
pub use tracing_sink::TracingSink;
pub use worker::run_log_worker;
