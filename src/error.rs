//! Application error type shared by the store, the resolver and the HTTP layer.
//!
//! Every failure a caller can observe is a variant of [`AppError`]. None of them are
//! fatal to the process: an operation either commits fully or returns one of these.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error description returned to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("Invalid URL format: {url}")]
    InvalidUrl { url: String },

    #[error("Invalid shortcode format (alphanumeric, 4-10 characters): {code}")]
    InvalidShortcodeFormat { code: String },

    #[error("Validity must be a positive number of minutes, got {minutes}")]
    InvalidValidity { minutes: i64 },

    #[error("Shortcode already exists: {code}")]
    DuplicateShortcode { code: String },

    #[error("Failed to generate a unique shortcode after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    #[error("Short URL not found: {code}")]
    NotFound { code: String },

    #[error("Short URL has expired: {code}")]
    Expired {
        code: String,
        expires_at: DateTime<Utc>,
    },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable identifier of the error kind, used in API payloads and event context.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::InvalidShortcodeFormat { .. } => "invalid_shortcode_format",
            Self::InvalidValidity { .. } => "invalid_validity",
            Self::DuplicateShortcode { .. } => "duplicate_shortcode",
            Self::GenerationExhausted { .. } => "generation_exhausted",
            Self::NotFound { .. } => "not_found",
            Self::Expired { .. } => "expired",
            Self::BadRequest { .. } => "bad_request",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidUrl { .. }
            | Self::InvalidShortcodeFormat { .. }
            | Self::InvalidValidity { .. }
            | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::DuplicateShortcode { .. } => StatusCode::CONFLICT,
            Self::GenerationExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Expired { .. } => StatusCode::GONE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns true for failures caused by caller input rather than store state.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. }
                | Self::InvalidShortcodeFormat { .. }
                | Self::InvalidValidity { .. }
                | Self::BadRequest { .. }
        )
    }

    fn details(&self) -> Value {
        match self {
            Self::InvalidUrl { url } => json!({ "url": url }),
            Self::InvalidShortcodeFormat { code }
            | Self::DuplicateShortcode { code }
            | Self::NotFound { code } => json!({ "shortcode": code }),
            Self::InvalidValidity { minutes } => json!({ "validity": minutes }),
            Self::GenerationExhausted { attempts } => json!({ "attempts": attempts }),
            Self::Expired { code, expires_at } => {
                json!({ "shortcode": code, "expiresAt": expires_at })
            }
            Self::BadRequest { .. } | Self::Internal { .. } => json!({}),
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            details: self.details(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::bad_request(format!("Request validation failed: {errors}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}
