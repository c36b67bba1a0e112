//! Utility functions for shortcode generation, URL validation and time.
//!
//! - [`code_generator`] - Shortcode generation and validation
//! - [`url_validator`] - Long URL validation
//! - [`clock`] - Injectable time source

pub mod clock;
pub mod code_generator;
pub mod url_validator;
