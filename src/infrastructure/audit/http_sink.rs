use std::time::Duration;

use async_trait::async_trait;

use super::service::{EventSink, SinkError};
use crate::domain::log_event::LogEvent;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts each audit event as JSON to an external collector.
///
/// When a token is configured it is sent as a bearer credential.
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpSink {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EventSink for HttpSink {
    async fn deliver(&self, event: &LogEvent) -> Result<(), SinkError> {
        let mut request = self.client.post(&self.endpoint).json(event);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                status: status.as_u16(),
            });
        }

        Ok(())
    }

    fn describe(&self) -> String {
        format!("http ({})", self.endpoint)
    }
}
