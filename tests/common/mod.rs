#![allow(dead_code)]

use axum::{
    Router,
    routing::{get, post},
};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use linkkeeper::api::handlers::{
    health_handler, redirect_handler, shorten_handler, stats_handler, stats_list_handler,
};
use linkkeeper::domain::entities::NewUrlRecord;
use linkkeeper::domain::log_event::{EventLogger, LogEvent};
use linkkeeper::domain::repositories::UrlRepository;
use linkkeeper::infrastructure::persistence::MemoryUrlRepository;
use linkkeeper::state::{AppState, HttpSettings};
use linkkeeper::utils::clock::ManualClock;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "http://s.test";

/// Everything a handler test needs to arrange state and inspect effects.
pub struct TestContext {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub repository: Arc<MemoryUrlRepository>,
    pub log_rx: mpsc::Receiver<LogEvent>,
}

impl TestContext {
    /// Drains every audit event emitted so far.
    pub fn drain_events(&mut self) -> Vec<LogEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.log_rx.try_recv() {
            events.push(event);
        }
        events
    }
}

pub fn test_settings() -> HttpSettings {
    HttpSettings {
        base_url: BASE_URL.to_string(),
        ..HttpSettings::default()
    }
}

pub fn create_test_state() -> TestContext {
    create_test_state_with(test_settings())
}

pub fn create_test_state_with(settings: HttpSettings) -> TestContext {
    let clock = Arc::new(ManualClock::default());
    let repository = Arc::new(MemoryUrlRepository::new());
    let (logger, log_rx) = EventLogger::channel(1_000);

    let state = AppState::new(repository.clone(), clock.clone(), logger, settings);

    TestContext {
        state,
        clock,
        repository,
        log_rx,
    }
}

/// Same routes as the production router, without path normalization.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .route("/api/shorten", post(shorten_handler))
        .route("/api/stats", get(stats_list_handler))
        .route("/api/stats/{code}", get(stats_handler))
        .with_state(state)
}

pub fn test_server(ctx: &TestContext) -> TestServer {
    TestServer::new(test_router(ctx.state.clone())).unwrap()
}

pub async fn create_test_record(
    repository: &MemoryUrlRepository,
    code: &str,
    url: &str,
    created_at: DateTime<Utc>,
    validity_minutes: i64,
) {
    let new = NewUrlRecord::new(
        code.to_string(),
        url.to_string(),
        created_at,
        validity_minutes,
    )
    .unwrap();

    repository.insert(new).await.unwrap();
}

pub fn temp_data_dir(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "linkkeeper-{label}-{}-{}",
        std::process::id(),
        rand::random::<u32>()
    ))
}
