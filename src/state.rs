//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{LinkService, RedirectService, StatsService};
use crate::domain::log_event::EventLogger;
use crate::infrastructure::persistence::MemoryUrlRepository;
use crate::utils::clock::Clock;
use crate::utils::code_generator::RandomCodeGenerator;

pub type AppLinkService = LinkService<MemoryUrlRepository, RandomCodeGenerator>;
pub type AppRedirectService = RedirectService<MemoryUrlRepository>;
pub type AppStatsService = StatsService<MemoryUrlRepository>;

/// Tunables the HTTP layer needs alongside the services.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub redirect_delay: Duration,
    pub max_batch_size: usize,
    pub default_validity_minutes: i64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            redirect_delay: Duration::ZERO,
            max_batch_size: 5,
            default_validity_minutes: crate::domain::entities::DEFAULT_VALIDITY_MINUTES,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<AppLinkService>,
    pub redirect_service: Arc<AppRedirectService>,
    pub stats_service: Arc<AppStatsService>,
    pub logger: EventLogger,
    pub settings: Arc<HttpSettings>,
}

impl AppState {
    /// Wires every service to the same table, clock and event logger.
    pub fn new(
        repository: Arc<MemoryUrlRepository>,
        clock: Arc<dyn Clock>,
        logger: EventLogger,
        settings: HttpSettings,
    ) -> Self {
        let link_service = LinkService::new(
            repository.clone(),
            RandomCodeGenerator,
            clock.clone(),
            logger.clone(),
        )
        .with_default_validity(settings.default_validity_minutes);

        let redirect_service = RedirectService::new(repository.clone(), clock.clone(), logger.clone());
        let stats_service = StatsService::new(repository, clock);

        Self {
            link_service: Arc::new(link_service),
            redirect_service: Arc::new(redirect_service),
            stats_service: Arc::new(stats_service),
            logger,
            settings: Arc::new(settings),
        }
    }
}
