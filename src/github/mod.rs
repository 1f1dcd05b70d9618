//! GitHub Module
//!
//! Outbound GitHub REST API access: one request per call, status
//! classification and the raw-data cache layer.

mod auth;
mod client;
mod models;
mod query;
mod rate_limit;

pub use auth::authorization_header;
pub use client::{classify_response, Accept, GitHubClient, DEFAULT_API_BASE, REQUEST_TIMEOUT};
pub use models::{License, Owner, Release, Repository, Tag};
pub use query::{ListQuery, RepoSort, RepoType, SortDirection};
pub use rate_limit::RateLimitInfo;
