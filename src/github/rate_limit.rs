//! Upstream API rate-limit headers.
//!
//! Reads `X-RateLimit-Remaining` / `X-RateLimit-Reset` from a GitHub response
//! so a 403 can be told apart from an exhausted quota.

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;

/// Rate-limit state reported by one response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Remaining calls in the current window, when reported.
    pub remaining: Option<u64>,
    /// Instant the window resets, when reported.
    pub reset_at: Option<DateTime<Utc>>,
}

impl RateLimitInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let remaining = header_u64(headers, "x-ratelimit-remaining");
        let reset_at = header_u64(headers, "x-ratelimit-reset")
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

        Self {
            remaining,
            reset_at,
        }
    }

    /// True unless the response reports calls left. A missing or unreadable
    /// remaining count reads as zero.
    pub fn is_exhausted(&self) -> bool {
        self.remaining.unwrap_or(0) == 0
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}
