//! Request and Response models for the HTTP API
//!
//! This module defines the DTOs (Data Transfer Objects) used for query
//! strings and JSON response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{RepoListQuery, SingleRepoQuery, UserReposQuery};
pub use responses::{ClearCacheResponse, ErrorResponse, HealthResponse, StatsResponse};
