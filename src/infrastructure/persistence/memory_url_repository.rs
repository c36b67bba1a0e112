//! In-process mapping table with write-through snapshots.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::domain::entities::{ClickEvent, NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::blob::{BlobStore, NullBlobStore};

/// Fixed key the whole table is stored under.
pub const SNAPSHOT_KEY: &str = "shortenedUrls";

/// In-memory shape of the table, keyed by shortcode.
pub type Table = HashMap<String, UrlRecord>;

/// Single owned shortcode table.
///
/// All access goes through one `RwLock`: lookups share the read side, while
/// inserts and clicks take the write side for exactly one record mutation plus
/// the snapshot write. Readers clone records out, so they never observe a click
/// counter without its matching click detail.
pub struct MemoryUrlRepository {
    records: RwLock<Table>,
    blob_store: Arc<dyn BlobStore>,
}

impl MemoryUrlRepository {
    /// Creates an empty table that is never persisted.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            blob_store: Arc::new(NullBlobStore),
        }
    }

    /// Loads the table from `blob_store`, starting empty if nothing is stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the blob cannot be read or is corrupt
    /// (see [`decode_table`]).
    pub async fn load(blob_store: Arc<dyn BlobStore>) -> Result<Self, AppError> {
        let records = match blob_store
            .read(SNAPSHOT_KEY)
            .await
            .map_err(|e| AppError::internal(e.to_string()))?
        {
            Some(bytes) => decode_table(&bytes)?,
            None => HashMap::new(),
        };

        info!(
            "Loaded {} short URLs from {}",
            records.len(),
            blob_store.describe()
        );

        Ok(Self {
            records: RwLock::new(records),
            blob_store,
        })
    }

    /// Writes the full table back to the blob store.
    ///
    /// Called with the write lock held so snapshots land in mutation order.
    /// Durability is best effort: failures are logged, the in-memory change stands.
    async fn persist(&self, table: &Table) {
        let blob = match encode_table(table) {
            Ok(blob) => blob,
            Err(e) => {
                error!("Failed to serialize URL table: {}", e);
                return;
            }
        };

        if let Err(e) = self.blob_store.write(SNAPSHOT_KEY, &blob).await {
            error!("Failed to persist URL table: {}", e);
        }
    }
}

impl Default for MemoryUrlRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes the table as a JSON object keyed by shortcode.
pub fn encode_table(table: &Table) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(table)
}

/// Parses a persisted table.
///
/// Malformed data is treated as corruption rather than repaired: records with
/// missing fields, a click counter that disagrees with the click history, or a
/// key that differs from the record's shortcode are all rejected.
///
/// # Errors
///
/// Returns [`AppError::Internal`] describing the first problem found.
pub fn decode_table(bytes: &[u8]) -> Result<Table, AppError> {
    let table: Table = serde_json::from_slice(bytes)
        .map_err(|e| AppError::internal(format!("Corrupt URL table: {e}")))?;

    for (key, record) in &table {
        if key != &record.shortcode {
            return Err(AppError::internal(format!(
                "Corrupt URL table: key '{}' holds record '{}'",
                key, record.shortcode
            )));
        }

        if !record.is_consistent() {
            return Err(AppError::internal(format!(
                "Corrupt URL table: '{}' has {} clicks but {} click details",
                key,
                record.clicks,
                record.click_details.len()
            )));
        }
    }

    Ok(table)
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let mut records = self.records.write().await;

        if records.contains_key(&new_record.shortcode) {
            return Err(AppError::DuplicateShortcode {
                code: new_record.shortcode,
            });
        }

        let record = UrlRecord::from_new(new_record);
        records.insert(record.shortcode.clone(), record.clone());
        self.persist(&records).await;

        debug!("Inserted {} -> {}", record.shortcode, record.long_url);

        Ok(record)
    }

    async fn find_by_code(&self, shortcode: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.records.read().await.get(shortcode).cloned())
    }

    async fn record_click(
        &self,
        shortcode: &str,
        event: ClickEvent,
    ) -> Result<UrlRecord, AppError> {
        let mut records = self.records.write().await;

        let record = records
            .get_mut(shortcode)
            .ok_or_else(|| AppError::NotFound {
                code: shortcode.to_string(),
            })?;

        record.push_click(event);
        let updated = record.clone();
        self.persist(&records).await;

        Ok(updated)
    }

    async fn list(&self) -> Result<Vec<UrlRecord>, AppError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.records.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::blob::FileBlobStore;
    use chrono::{TimeDelta, Utc};

    fn new_record(code: &str) -> NewUrlRecord {
        NewUrlRecord::new(
            code.to_string(),
            "https://example.com".to_string(),
            Utc::now(),
            30,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = MemoryUrlRepository::new();

        let created = repo.insert(new_record("abcd12")).await.unwrap();
        assert_eq!(created.clicks, 0);

        let found = repo.find_by_code("abcd12").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(repo.find_by_code("zzzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_fails() {
        let repo = MemoryUrlRepository::new();

        repo.insert(new_record("taken1")).await.unwrap();
        let result = repo.insert(new_record("taken1")).await;

        assert_eq!(
            result.unwrap_err(),
            AppError::DuplicateShortcode {
                code: "taken1".to_string()
            }
        );
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_expired_code_stays_occupied() {
        let repo = MemoryUrlRepository::new();
        let past = Utc::now() - TimeDelta::hours(2);

        let expired = NewUrlRecord::new("old123".into(), "https://a.io".into(), past, 1).unwrap();
        repo.insert(expired).await.unwrap();

        let result = repo.insert(new_record("old123")).await;
        assert!(matches!(result, Err(AppError::DuplicateShortcode { .. })));
    }

    #[tokio::test]
    async fn test_record_click_appends_in_order() {
        let repo = MemoryUrlRepository::new();
        repo.insert(new_record("click1")).await.unwrap();

        let t0 = Utc::now();
        repo.record_click("click1", ClickEvent::new(t0, None))
            .await
            .unwrap();
        let updated = repo
            .record_click(
                "click1",
                ClickEvent::new(t0 + TimeDelta::seconds(1), Some("https://google.com")),
            )
            .await
            .unwrap();

        assert_eq!(updated.clicks, 2);
        assert_eq!(updated.click_details[0].source, "Direct");
        assert_eq!(updated.click_details[1].source, "https://google.com");
    }

    #[tokio::test]
    async fn test_record_click_unknown_code() {
        let repo = MemoryUrlRepository::new();

        let result = repo
            .record_click("nothere", ClickEvent::new(Utc::now(), None))
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_clicks_are_not_lost() {
        let repo = Arc::new(MemoryUrlRepository::new());
        repo.insert(new_record("busy12")).await.unwrap();

        let handles: Vec<_> = (0..200)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.record_click("busy12", ClickEvent::new(Utc::now(), None))
                        .await
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        let record = repo.find_by_code("busy12").await.unwrap().unwrap();
        assert_eq!(record.clicks, 200);
        assert_eq!(record.click_details.len(), 200);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_same_code_only_one_wins() {
        let repo = Arc::new(MemoryUrlRepository::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.insert(new_record("race12")).await.is_ok() })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_snapshot_survives_reload() {
        let dir = std::env::temp_dir().join(format!(
            "linkkeeper-repo-{}-{}",
            std::process::id(),
            rand::random::<u32>()
        ));
        let blob: Arc<dyn BlobStore> = Arc::new(FileBlobStore::open(&dir).await.unwrap());

        {
            let repo = MemoryUrlRepository::load(blob.clone()).await.unwrap();
            repo.insert(new_record("keep12")).await.unwrap();
            repo.record_click("keep12", ClickEvent::new(Utc::now(), None))
                .await
                .unwrap();
        }

        let reloaded = MemoryUrlRepository::load(blob).await.unwrap();
        let record = reloaded.find_by_code("keep12").await.unwrap().unwrap();
        assert_eq!(record.clicks, 1);
        assert_eq!(record.click_details.len(), 1);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[test]
    fn test_decode_rejects_counter_mismatch() {
        let json = r#"{
            "abcd12": {
                "shortcode": "abcd12",
                "longUrl": "https://example.com",
                "createdAt": "2024-01-01T00:00:00Z",
                "expiresAt": "2024-01-01T00:30:00Z",
                "clicks": 3,
                "clickDetails": []
            }
        }"#;

        let err = decode_table(json.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("3 clicks"));
    }

    #[test]
    fn test_decode_rejects_key_mismatch() {
        let json = r#"{
            "other1": {
                "shortcode": "abcd12",
                "longUrl": "https://example.com",
                "createdAt": "2024-01-01T00:00:00Z",
                "expiresAt": "2024-01-01T00:30:00Z",
                "clicks": 0,
                "clickDetails": []
            }
        }"#;

        assert!(matches!(
            decode_table(json.as_bytes()),
            Err(AppError::Internal { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_missing_click_fields() {
        let json = r#"{
            "abcd12": {
                "shortcode": "abcd12",
                "longUrl": "https://example.com",
                "createdAt": "2024-01-01T00:00:00Z",
                "expiresAt": "2024-01-01T00:30:00Z"
            }
        }"#;

        assert!(decode_table(json.as_bytes()).is_err());
    }

    #[test]
    fn test_decode_accepts_valid_table() {
        let json = r#"{
            "abcd12": {
                "shortcode": "abcd12",
                "longUrl": "https://example.com",
                "createdAt": "2024-01-01T00:00:00Z",
                "expiresAt": "2024-01-01T00:30:00Z",
                "clicks": 1,
                "clickDetails": [
                    { "timestamp": "2024-01-01T00:05:00Z", "source": "Direct", "location": "Unknown" }
                ]
            }
        }"#;

        let table = decode_table(json.as_bytes()).unwrap();
        assert_eq!(table["abcd12"].clicks, 1);
    }
}
