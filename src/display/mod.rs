//! Display Module
//!
//! The render request surface: validates parameters, consults the `output`
//! cache layer and turns every failure into an inline error fragment.

mod output_cache;
mod params;
mod service;

pub use output_cache::{OutputCache, Rendered};
pub use params::{
    clamp_columns, clamp_limit, parse_flag, split_names, validate_name, UserReposParams,
    DEFAULT_COLUMNS, DEFAULT_LIMIT,
};
pub use service::{ClearedCounts, DisplayService, RepoItem};
