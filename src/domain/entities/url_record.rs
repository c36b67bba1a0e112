//! URL record entity: the unit of storage in the mapping table.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::click::ClickEvent;

/// Validity applied when the caller does not choose one.
pub const DEFAULT_VALIDITY_MINUTES: i64 = 30;

/// A shortcode mapped to a long URL, with its validity window and click history.
///
/// `clicks` always equals `click_details.len()`; both are only ever changed
/// together by the store. Every field is required when decoding a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UrlRecord {
    pub shortcode: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub clicks: u64,
    pub click_details: Vec<ClickEvent>,
}

impl UrlRecord {
    /// Builds a fresh record with no clicks.
    pub fn from_new(new_record: NewUrlRecord) -> Self {
        Self {
            shortcode: new_record.shortcode,
            long_url: new_record.long_url,
            created_at: new_record.created_at,
            expires_at: new_record.expires_at,
            clicks: 0,
            click_details: Vec::new(),
        }
    }

    /// Returns true once `now` is strictly past the expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Returns true if the click counter matches the recorded click history.
    pub fn is_consistent(&self) -> bool {
        usize::try_from(self.clicks).is_ok_and(|clicks| clicks == self.click_details.len())
    }

    /// Appends a click and bumps the counter in one step.
    pub fn push_click(&mut self, event: ClickEvent) {
        self.click_details.push(event);
        self.clicks += 1;
    }
}

/// Input data for inserting a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub shortcode: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewUrlRecord {
    /// Computes `expires_at = created_at + validity_minutes`.
    ///
    /// Returns `None` when the validity is not positive or the expiry is not
    /// representable.
    pub fn new(
        shortcode: String,
        long_url: String,
        created_at: DateTime<Utc>,
        validity_minutes: i64,
    ) -> Option<Self> {
        if validity_minutes <= 0 {
            return None;
        }

        let expires_at = TimeDelta::try_minutes(validity_minutes)
            .and_then(|validity| created_at.checked_add_signed(validity))?;

        Some(Self {
            shortcode,
            long_url,
            created_at,
            expires_at,
        })
    }
}
