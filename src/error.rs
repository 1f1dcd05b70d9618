//! Error types for the repository display service
//!
//! Provides unified error handling using thiserror. Each layer owns one enum:
//! the cache layer (`CacheError`), the upstream API layer (`FetchError`) and
//! the render request boundary (`DisplayError`).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Failures raised by the cache layer and its backing store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is empty or exceeds the store's key-length limit
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Value exceeds the store's size limit
    #[error("Value too large: {0}")]
    ValueTooLarge(String),

    /// Stored envelope or payload could not be decoded
    #[error("Corrupt entry: {0}")]
    Corrupt(String),

    /// Backing store read or write failed
    #[error("Backend error: {0}")]
    Backend(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_) | CacheError::ValueTooLarge(_) => StatusCode::BAD_REQUEST,
            CacheError::Corrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Backend(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Upstream Error ==
/// Unexpected upstream outcome that is neither a not-found nor a rate limit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// Non-success HTTP status
    #[error("GitHub API error: HTTP {0}")]
    Status(u16),

    /// Body was not JSON, or not the expected array/object shape
    #[error("Invalid response from GitHub API.")]
    InvalidResponse,
}

// == Fetch Error Enum ==
/// Classified failure of a single upstream request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// HTTP 404
    #[error("Resource not found.")]
    NotFound,

    /// HTTP 403 with an exhausted rate-limit quota
    #[error("GitHub API rate limit exceeded. Resets at {}.", format_reset_time(.reset_at))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    /// DNS, connect, timeout or body-read failure
    #[error("Could not reach GitHub API: {0}")]
    Transport(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Transport("request timed out".to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Formats a rate-limit reset instant for operators and end users.
pub fn format_reset_time(reset_at: &Option<DateTime<Utc>>) -> String {
    match reset_at {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "an unknown time".to_string(),
    }
}

// == Display Error Enum ==
/// Errors recovered at the render request boundary.
///
/// Every variant is turned into an inline HTML fragment; none of them is
/// allowed to abort the enclosing page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// Caller supplied missing or unusable parameters
    #[error("{0}")]
    Validation(String),

    #[error("Repository \"{owner}/{repo}\" not found.")]
    RepoNotFound { owner: String, repo: String },

    #[error("No repositories found for user \"{0}\".")]
    NoRepositories(String),

    #[error("No repositories found for user \"{0}\" with the specified filters.")]
    NoMatchingRepositories(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

// == Result Type Aliases ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result of one upstream request; `Ok` is the success classification.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
