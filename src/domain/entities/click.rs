//! Click entity representing a single successful redirect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source recorded when the redirect request carried no referrer.
pub const DIRECT_SOURCE: &str = "Direct";

/// Location recorded for every click; there is no geolocation collaborator.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// One recorded redirect occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClickEvent {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub location: String,
}

impl ClickEvent {
    /// Creates a click event for a redirect at `timestamp`.
    ///
    /// A missing or blank referrer is recorded as [`DIRECT_SOURCE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use linkkeeper::domain::entities::ClickEvent;
    ///
    /// let click = ClickEvent::new(Utc::now(), None);
    /// assert_eq!(click.source, "Direct");
    /// assert_eq!(click.location, "Unknown");
    /// ```
    pub fn new(timestamp: DateTime<Utc>, referrer: Option<&str>) -> Self {
        let source = referrer
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DIRECT_SOURCE)
            .to_string();

        Self {
            timestamp,
            source,
            location: UNKNOWN_LOCATION.to_string(),
        }
    }
}
