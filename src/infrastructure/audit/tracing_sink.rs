use async_trait::async_trait;

use super::service::{EventSink, SinkError};
use crate::domain::log_event::{LogEvent, LogLevel};

/// Writes audit events into the process log under the `audit` target.
///
/// Used when no external collector is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl EventSink for TracingSink {
    async fn deliver(&self, event: &LogEvent) -> Result<(), SinkError> {
        let context = event.context.to_string();

        match event.level {
            LogLevel::Info | LogLevel::Success => tracing::info!(
                target: "audit",
                level_tag = %event.level,
                context = %context,
                "{}", event.message
            ),
            LogLevel::Warn => tracing::warn!(
                target: "audit",
                context = %context,
                "{}", event.message
            ),
            LogLevel::Error => tracing::error!(
                target: "audit",
                context = %context,
                "{}", event.message
            ),
        }

        Ok(())
    }

    fn describe(&self) -> String {
        "tracing".to_string()
    }
}
