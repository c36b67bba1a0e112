//! Long URL validation.

use url::Url;

/// Returns true iff `input` is an absolute `http`/`https` URL with a non-empty host.
///
/// The URL is only checked, never rewritten: the stored long URL is exactly what
/// the caller submitted.
///
/// # Examples
///
/// ```
/// use linkkeeper::utils::url_validator::validate_url;
///
/// assert!(validate_url("https://example.com/x"));
/// assert!(!validate_url("ftp://x"));
/// ```
pub fn validate_url(input: &str) -> bool {
    let Ok(url) = Url::parse(input) else {
        return false;
    };

    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
}
