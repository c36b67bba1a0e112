//! Shortcode generation and validation.
//!
//! Shortcodes are 4-10 ASCII alphanumeric characters. Generated codes are drawn
//! uniformly from the base62 alphabet; uniqueness is enforced by the store at
//! insertion time, not here.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Compiled pattern every shortcode, custom or generated, must match.
static SHORTCODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{4,10}$").unwrap());

const BASE62_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of generated codes. 62^8 candidates keeps collisions negligible.
pub const GENERATED_CODE_LENGTH: usize = 8;

/// Returns true iff `code` is 4-10 ASCII letters or digits.
///
/// # Examples
///
/// ```
/// use linkkeeper::utils::code_generator::validate_shortcode;
///
/// assert!(validate_shortcode("abcd12"));
/// assert!(!validate_shortcode("ab"));
/// assert!(!validate_shortcode("with-dash"));
/// ```
pub fn validate_shortcode(code: &str) -> bool {
    SHORTCODE_REGEX.is_match(code)
}

/// Codes taken by the router's own single-segment paths.
///
/// `/{code}` never sees these, so a record under one could not redirect.
pub const RESERVED_SHORTCODES: &[&str] = &["health"];

/// Returns true if `code` collides with a fixed route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_SHORTCODES.contains(&code)
}

/// Generates a random base62 shortcode of [`GENERATED_CODE_LENGTH`] characters.
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..GENERATED_CODE_LENGTH)
        .map(|_| BASE62_ALPHABET[rng.random_range(0..BASE62_ALPHABET.len())] as char)
        .collect()
}

/// Source of candidate shortcodes.
///
/// Abstracted so the collision retry loop can be driven deterministically.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Production generator backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}
