//! Repo Display - GitHub repository cards as embeddable HTML
//!
//! Fetches repository metadata from the GitHub REST API and renders it as
//! HTML fragments, behind a two-layer cache with jittered expiry.

pub mod api;
pub mod cache;
pub mod config;
pub mod display;
pub mod error;
pub mod github;
pub mod models;
pub mod render;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
