//! Core domain entities.
//!
//! - [`UrlRecord`] - A shortcode mapped to a long URL, with click history
//! - [`ClickEvent`] - One successful redirect
//!
//! `NewUrlRecord` carries the input for an insertion; the store fills in the
//! click counters.

pub mod click;
pub mod url_record;

pub use click::{ClickEvent, DIRECT_SOURCE, UNKNOWN_LOCATION};
pub use url_record::{DEFAULT_VALIDITY_MINUTES, NewUrlRecord, UrlRecord};
