//! Short URL creation and lookup.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::entities::{ClickEvent, DEFAULT_VALIDITY_MINUTES, NewUrlRecord, UrlRecord};
use crate::domain::log_event::EventLogger;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::clock::Clock;
use crate::utils::code_generator::{CodeGenerator, is_reserved, validate_shortcode};
use crate::utils::url_validator::validate_url;

/// Upper bound on generated candidates tried for one creation.
pub const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Mapping store operations: create, get and click accounting.
///
/// Validation happens here; uniqueness is enforced by the repository at
/// insertion time, so a generated candidate that loses a race simply counts
/// as one failed attempt.
pub struct LinkService<R: UrlRepository, G: CodeGenerator> {
    repository: Arc<R>,
    generator: G,
    clock: Arc<dyn Clock>,
    logger: EventLogger,
    default_validity: i64,
}

impl<R: UrlRepository, G: CodeGenerator> LinkService<R, G> {
    pub fn new(
        repository: Arc<R>,
        generator: G,
        clock: Arc<dyn Clock>,
        logger: EventLogger,
    ) -> Self {
        Self {
            repository,
            generator,
            clock,
            logger,
            default_validity: DEFAULT_VALIDITY_MINUTES,
        }
    }

    /// Overrides the validity applied when a request omits one.
    pub fn with_default_validity(mut self, minutes: i64) -> Self {
        self.default_validity = minutes;
        self
    }

    pub fn default_validity(&self) -> i64 {
        self.default_validity
    }

    /// Creates a short URL.
    ///
    /// `validity_minutes` falls back to the service default. A blank custom
    /// code counts as absent. The long URL is stored exactly as given once it
    /// passes validation.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    ///
    /// - [`AppError::InvalidUrl`] unless the URL is absolute http(s) with a host
    /// - [`AppError::InvalidShortcodeFormat`] for a malformed custom code
    /// - [`AppError::InvalidValidity`] for a non-positive or unrepresentable validity
    /// - [`AppError::DuplicateShortcode`] if the custom code is taken (expired or
    ///   not) or reserved for a route
    /// - [`AppError::GenerationExhausted`] after [`MAX_GENERATION_ATTEMPTS`] collisions
    pub async fn create(
        &self,
        long_url: String,
        validity_minutes: Option<i64>,
        custom_code: Option<String>,
    ) -> Result<UrlRecord, AppError> {
        self.logger.info(
            "Short URL creation requested",
            json!({
                "longUrl": long_url,
                "validity": validity_minutes,
                "shortcode": custom_code,
            }),
        );

        let result = self
            .try_create(&long_url, validity_minutes, custom_code)
            .await;

        match &result {
            Ok(record) => self.logger.success(
                "URL shortened successfully",
                json!({
                    "shortcode": record.shortcode,
                    "longUrl": record.long_url,
                    "expiresAt": record.expires_at,
                }),
            ),
            Err(e) if e.is_validation() => self.logger.warn(
                "Validation failed",
                json!({ "error": e.to_string(), "code": e.code(), "longUrl": long_url }),
            ),
            Err(e) => self.logger.error(
                "URL shortening failed",
                json!({ "error": e.to_string(), "code": e.code(), "longUrl": long_url }),
            ),
        }

        result
    }

    async fn try_create(
        &self,
        long_url: &str,
        validity_minutes: Option<i64>,
        custom_code: Option<String>,
    ) -> Result<UrlRecord, AppError> {
        if !validate_url(long_url) {
            return Err(AppError::InvalidUrl {
                url: long_url.to_string(),
            });
        }

        let custom_code = custom_code.filter(|code| !code.trim().is_empty());

        if let Some(code) = &custom_code {
            if !validate_shortcode(code) {
                return Err(AppError::InvalidShortcodeFormat { code: code.clone() });
            }
        }

        let validity = validity_minutes.unwrap_or(self.default_validity);
        let now = self.clock.now();

        // Computed once so every candidate shares the same window.
        let template = NewUrlRecord::new(String::new(), long_url.to_string(), now, validity)
            .ok_or(AppError::InvalidValidity { minutes: validity })?;

        if let Some(code) = custom_code {
            if is_reserved(&code) {
                return Err(AppError::DuplicateShortcode { code });
            }

            return self
                .repository
                .insert(NewUrlRecord {
                    shortcode: code,
                    ..template
                })
                .await;
        }

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let shortcode = self.generator.generate();
            if is_reserved(&shortcode) {
                debug!("Generated shortcode {} is reserved (attempt {})", shortcode, attempt);
                continue;
            }

            let candidate = NewUrlRecord {
                shortcode,
                ..template.clone()
            };

            match self.repository.insert(candidate).await {
                Ok(record) => return Ok(record),
                Err(AppError::DuplicateShortcode { code }) => {
                    debug!("Generated shortcode {} collided (attempt {})", code, attempt);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::GenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Plain lookup with no expiry filtering.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the shortcode is unknown.
    pub async fn get(&self, shortcode: &str) -> Result<UrlRecord, AppError> {
        self.repository
            .find_by_code(shortcode)
            .await?
            .ok_or_else(|| AppError::NotFound {
                code: shortcode.to_string(),
            })
    }

    /// Appends a click to the named record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the shortcode is unknown.
    pub async fn record_click(
        &self,
        shortcode: &str,
        event: ClickEvent,
    ) -> Result<UrlRecord, AppError> {
        self.repository.record_click(shortcode, event).await
    }
}

/// Builds the public short URL for `shortcode`.
pub fn short_url(base_url: &str, shortcode: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), shortcode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::log_event::LogLevel;
    use crate::domain::repositories::MockUrlRepository;
    use crate::infrastructure::persistence::MemoryUrlRepository;
    use crate::utils::clock::ManualClock;
    use crate::utils::code_generator::{MockCodeGenerator, RandomCodeGenerator};
    use chrono::{TimeDelta, Utc};

    fn service_with_mocks(
        repo: MockUrlRepository,
        generator: MockCodeGenerator,
    ) -> LinkService<MockUrlRepository, MockCodeGenerator> {
        LinkService::new(
            Arc::new(repo),
            generator,
            Arc::new(ManualClock::default()),
            EventLogger::disabled(),
        )
    }

    #[tokio::test]
    async fn test_create_with_generated_code() {
        let mut repo = MockUrlRepository::new();
        let mut generator = MockCodeGenerator::new();

        generator
            .expect_generate()
            .times(1)
            .returning(|| "Abc12345".to_string());
        repo.expect_insert()
            .withf(|new| new.shortcode == "Abc12345" && new.long_url == "https://example.com")
            .times(1)
            .returning(|new| Ok(UrlRecord::from_new(new)));

        let service = service_with_mocks(repo, generator);
        let record = service
            .create("https://example.com".to_string(), Some(10), None)
            .await
            .unwrap();

        assert_eq!(record.shortcode, "Abc12345");
        assert_eq!(record.expires_at - record.created_at, TimeDelta::minutes(10));
        assert_eq!(record.clicks, 0);
    }

    #[tokio::test]
    async fn test_create_keeps_url_verbatim() {
        let mut repo = MockUrlRepository::new();
        let mut generator = MockCodeGenerator::new();

        generator.expect_generate().returning(|| "code1234".to_string());
        repo.expect_insert()
            .withf(|new| new.long_url == "HTTPS://Example.com:443/a/../b?q=1#frag")
            .times(1)
            .returning(|new| Ok(UrlRecord::from_new(new)));

        let service = service_with_mocks(repo, generator);
        let record = service
            .create(
                "HTTPS://Example.com:443/a/../b?q=1#frag".to_string(),
                None,
                None,
            )
            .await
            .unwrap();

        assert_eq!(record.long_url, "HTTPS://Example.com:443/a/../b?q=1#frag");
    }

    #[tokio::test]
    async fn test_create_retries_on_collision() {
        let mut repo = MockUrlRepository::new();
        let mut generator = MockCodeGenerator::new();

        let mut seq = mockall::Sequence::new();
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| "taken123".to_string());
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| "fresh123".to_string());

        repo.expect_insert()
            .withf(|new| new.shortcode == "taken123")
            .times(1)
            .returning(|new| {
                Err(AppError::DuplicateShortcode {
                    code: new.shortcode,
                })
            });
        repo.expect_insert()
            .withf(|new| new.shortcode == "fresh123")
            .times(1)
            .returning(|new| Ok(UrlRecord::from_new(new)));

        let service = service_with_mocks(repo, generator);
        let record = service
            .create("https://example.com".to_string(), None, None)
            .await
            .unwrap();

        assert_eq!(record.shortcode, "fresh123");
    }

    #[tokio::test]
    async fn test_create_generation_exhausted() {
        let mut repo = MockUrlRepository::new();
        let mut generator = MockCodeGenerator::new();

        generator
            .expect_generate()
            .times(MAX_GENERATION_ATTEMPTS)
            .returning(|| "occupied".to_string());
        repo.expect_insert()
            .times(MAX_GENERATION_ATTEMPTS)
            .returning(|new| {
                Err(AppError::DuplicateShortcode {
                    code: new.shortcode,
                })
            });

        let service = service_with_mocks(repo, generator);
        let result = service
            .create("https://example.com".to_string(), None, None)
            .await;

        assert_eq!(
            result.unwrap_err(),
            AppError::GenerationExhausted {
                attempts: MAX_GENERATION_ATTEMPTS
            }
        );
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert().times(0);

        let service = service_with_mocks(repo, MockCodeGenerator::new());
        let result = service
            .create("ftp://example.com".to_string(), None, None)
            .await;

        assert!(matches!(result, Err(AppError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_validity() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert().times(0);

        let service = service_with_mocks(repo, MockCodeGenerator::new());

        for minutes in [0, -5, i64::MAX] {
            let result = service
                .create("https://example.com".to_string(), Some(minutes), None)
                .await;
            assert_eq!(result.unwrap_err(), AppError::InvalidValidity { minutes });
        }
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_custom_code() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert().times(0);

        let service = service_with_mocks(repo, MockCodeGenerator::new());

        for code in ["ab", "has-dash", "waytoolongcode"] {
            let result = service
                .create("https://example.com".to_string(), None, Some(code.to_string()))
                .await;
            assert!(matches!(
                result,
                Err(AppError::InvalidShortcodeFormat { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_create_blank_custom_code_generates_one() {
        let mut repo = MockUrlRepository::new();
        let mut generator = MockCodeGenerator::new();

        generator
            .expect_generate()
            .times(2)
            .returning(|| "gen12345".to_string());
        repo.expect_insert()
            .withf(|new| new.shortcode == "gen12345")
            .times(2)
            .returning(|new| Ok(UrlRecord::from_new(new)));

        let service = service_with_mocks(repo, generator);

        for blank in ["", "   "] {
            let record = service
                .create("https://example.com".to_string(), Some(30), Some(blank.into()))
                .await
                .unwrap();
            assert_eq!(record.shortcode, "gen12345");
        }
    }

    #[tokio::test]
    async fn test_create_checks_custom_code_before_validity() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert().times(0);

        let service = service_with_mocks(repo, MockCodeGenerator::new());
        let result = service
            .create("https://example.com".to_string(), Some(0), Some("a!".into()))
            .await;

        assert_eq!(
            result.unwrap_err(),
            AppError::InvalidShortcodeFormat {
                code: "a!".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_create_rejects_reserved_custom_code() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert().times(0);

        let service = service_with_mocks(repo, MockCodeGenerator::new());
        let result = service
            .create("https://example.com".to_string(), None, Some("health".into()))
            .await;

        assert_eq!(
            result.unwrap_err(),
            AppError::DuplicateShortcode {
                code: "health".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_create_skips_reserved_generated_code() {
        let mut repo = MockUrlRepository::new();
        let mut generator = MockCodeGenerator::new();

        let mut seq = mockall::Sequence::new();
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| "health".to_string());
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| "next1234".to_string());
        repo.expect_insert()
            .withf(|new| new.shortcode == "next1234")
            .times(1)
            .returning(|new| Ok(UrlRecord::from_new(new)));

        let service = service_with_mocks(repo, generator);
        let record = service
            .create("https://example.com".to_string(), None, None)
            .await
            .unwrap();

        assert_eq!(record.shortcode, "next1234");
    }

    #[tokio::test]
    async fn test_create_duplicate_custom_code() {
        let service = LinkService::new(
            Arc::new(MemoryUrlRepository::new()),
            RandomCodeGenerator,
            Arc::new(ManualClock::default()),
            EventLogger::disabled(),
        );

        service
            .create("https://a.example".to_string(), None, Some("mine1".into()))
            .await
            .unwrap();
        let result = service
            .create("https://b.example".to_string(), None, Some("mine1".into()))
            .await;

        assert_eq!(
            result.unwrap_err(),
            AppError::DuplicateShortcode {
                code: "mine1".to_string()
            }
        );
        assert_eq!(
            service.get("mine1").await.unwrap().long_url,
            "https://a.example"
        );
    }

    #[tokio::test]
    async fn test_create_then_get_matches() {
        let start = Utc::now();
        let service = LinkService::new(
            Arc::new(MemoryUrlRepository::new()),
            RandomCodeGenerator,
            Arc::new(ManualClock::new(start)),
            EventLogger::disabled(),
        )
        .with_default_validity(45);

        let created = service
            .create("https://example.com/x".to_string(), None, None)
            .await
            .unwrap();
        let fetched = service.get(&created.shortcode).await.unwrap();

        assert_eq!(fetched.long_url, "https://example.com/x");
        assert_eq!(fetched.created_at, start);
        assert_eq!(fetched.expires_at, start + TimeDelta::minutes(45));
        assert!(validate_shortcode(&fetched.shortcode));
    }

    #[tokio::test]
    async fn test_get_unknown_code() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(None));

        let service = service_with_mocks(repo, MockCodeGenerator::new());

        assert_eq!(
            service.get("nope1").await.unwrap_err(),
            AppError::NotFound {
                code: "nope1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_create_emits_entry_and_exit_events() {
        let (logger, mut rx) = EventLogger::channel(16);
        let service = LinkService::new(
            Arc::new(MemoryUrlRepository::new()),
            RandomCodeGenerator,
            Arc::new(ManualClock::default()),
            logger,
        );

        service
            .create("https://example.com".to_string(), None, Some("logme1".into()))
            .await
            .unwrap();
        service
            .create("not a url".to_string(), None, None)
            .await
            .unwrap_err();
        service
            .create("https://example.com".to_string(), None, Some("logme1".into()))
            .await
            .unwrap_err();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push((event.level, event.message, event.context));
        }

        let summary: Vec<_> = events
            .iter()
            .map(|(level, message, _)| (*level, message.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (LogLevel::Info, "Short URL creation requested"),
                (LogLevel::Success, "URL shortened successfully"),
                (LogLevel::Info, "Short URL creation requested"),
                (LogLevel::Warn, "Validation failed"),
                (LogLevel::Info, "Short URL creation requested"),
                (LogLevel::Error, "URL shortening failed"),
            ]
        );
        assert_eq!(events[1].2["shortcode"], "logme1");
        assert_eq!(events[5].2["code"], "duplicate_shortcode");
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            short_url("http://localhost:3000/", "abcd12"),
            "http://localhost:3000/abcd12"
        );
        assert_eq!(short_url("https://s.io", "x1y2"), "https://s.io/x1y2");
    }
}
