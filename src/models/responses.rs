//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing JSON response bodies. Render endpoints
//! answer with HTML and have no DTO.

use serde::Serialize;

use crate::cache::{CacheStats, TtlPolicy};
use crate::display::ClearedCounts;

/// Response body for `POST /admin/cache/clear`
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    /// Rendered fragments removed
    pub output: usize,
    /// Raw API payloads removed
    pub apidata: usize,
    pub total: usize,
}

impl From<ClearedCounts> for ClearCacheResponse {
    fn from(counts: ClearedCounts) -> Self {
        Self {
            output: counts.output,
            apidata: counts.apidata,
            total: counts.total(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of cache writes
    pub writes: u64,
    /// Number of backing store failures
    pub errors: u64,
    /// Live rendered fragments
    pub output_entries: usize,
    /// Live upstream payloads
    pub apidata_entries: usize,
    /// Sum of both layers
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Base lifetime of new entries
    pub ttl_hours: u32,
    pub jitter_enabled: bool,
    pub jitter_percent: u32,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics and the active policy
    pub fn new(
        stats: &CacheStats,
        output_entries: usize,
        apidata_entries: usize,
        policy: &TtlPolicy,
    ) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            writes: stats.writes,
            errors: stats.errors,
            output_entries,
            apidata_entries,
            total_entries: output_entries + apidata_entries,
            hit_rate: stats.hit_rate(),
            ttl_hours: policy.base_hours,
            jitter_enabled: policy.jitter_enabled,
            jitter_percent: policy.jitter_percent.as_percent(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for JSON endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
