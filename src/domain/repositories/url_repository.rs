//! Repository trait for the shortcode mapping table.

use crate::domain::entities::{ClickEvent, NewUrlRecord, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable table from shortcode to [`UrlRecord`].
///
/// Implementations own the table and serialize every mutation: `insert` and
/// `record_click` on the same key never interleave, and readers always see a
/// record either before or after a click, never in between. Records are never
/// removed, so a shortcode stays occupied after its record expires.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - in-process table with
///   write-through snapshots
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new record with zero clicks if the shortcode is free.
    ///
    /// The existence check and the insertion happen in one critical section.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateShortcode`] if the shortcode is already taken,
    /// regardless of whether the existing record has expired.
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Looks up a record by shortcode without any expiry filtering.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backing table is unavailable.
    async fn find_by_code(&self, shortcode: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Appends `event` and increments the click counter atomically.
    ///
    /// Returns the record as it is after the click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this shortcode.
    async fn record_click(&self, shortcode: &str, event: ClickEvent)
    -> Result<UrlRecord, AppError>;

    /// Returns a consistent snapshot of every record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backing table is unavailable.
    async fn list(&self) -> Result<Vec<UrlRecord>, AppError>;

    /// Counts stored records, expired ones included.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backing table is unavailable.
    async fn count(&self) -> Result<usize, AppError>;
}
