//! Request parameter normalization.
//!
//! Numeric parameters are clamped rather than rejected and enumerated ones
//! fall back to their defaults. Only names are validated strictly, since they
//! end up in upstream request paths.

use crate::error::DisplayError;
use crate::github::{ListQuery, RepoSort, RepoType, SortDirection};
use crate::render::{MAX_COLUMNS, MIN_COLUMNS};

pub const DEFAULT_COLUMNS: u8 = 2;
pub const DEFAULT_LIMIT: u32 = 30;
pub const MAX_LIMIT: u32 = 100;

/// GitHub caps repository names at 100 characters; usernames are shorter.
const MAX_NAME_LENGTH: usize = 100;

/// Column count clamped into [1, 4]. Negative input counts by magnitude and
/// non-numeric input as zero.
pub fn clamp_columns(raw: Option<&str>) -> u8 {
    match raw {
        None => DEFAULT_COLUMNS,
        Some(raw) => {
            let value = lenient_int(raw).clamp(u64::from(MIN_COLUMNS), u64::from(MAX_COLUMNS));
            value as u8
        }
    }
}

/// Listing size clamped into [1, 100].
pub fn clamp_limit(raw: Option<&str>) -> u32 {
    match raw {
        None => DEFAULT_LIMIT,
        Some(raw) => lenient_int(raw).clamp(1, u64::from(MAX_LIMIT)) as u32,
    }
}

/// Boolean flag: `1`, `true`, `on` and `yes` (any case) are true, anything
/// else is false.
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw.map(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        )
    })
    .unwrap_or(false)
}

/// Splits a comma-separated name list, trimming entries and dropping empty
/// ones.
pub fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts a GitHub user or repository name: ASCII letters, digits, `-`,
/// `_` and `.`, but never `.` or `..` on its own.
pub fn validate_name(kind: &str, raw: &str) -> Result<String, DisplayError> {
    let name = raw.trim();
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_LENGTH
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(name.to_string())
    } else {
        Err(DisplayError::Validation(format!("Invalid {kind} \"{name}\".")))
    }
}

fn lenient_int(raw: &str) -> u64 {
    raw.trim()
        .parse::<i64>()
        .map(|value| value.unsigned_abs())
        .unwrap_or(0)
}

// == User Repos Params ==
/// Normalized options of a "render all repositories of a user" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserReposParams {
    pub columns: u8,
    pub limit: u32,
    pub sort: RepoSort,
    pub direction: SortDirection,
    pub repo_type: RepoType,
    pub exclude_forks: bool,
}

impl UserReposParams {
    /// Builds params from raw request values; missing values take defaults.
    pub fn from_raw(
        columns: Option<&str>,
        limit: Option<&str>,
        sort: Option<&str>,
        direction: Option<&str>,
        repo_type: Option<&str>,
        exclude_forks: Option<&str>,
    ) -> Self {
        Self {
            columns: clamp_columns(columns),
            limit: clamp_limit(limit),
            sort: sort.map(RepoSort::parse).unwrap_or_default(),
            direction: direction.map(SortDirection::parse).unwrap_or_default(),
            repo_type: repo_type.map(RepoType::parse).unwrap_or_default(),
            exclude_forks: parse_flag(exclude_forks),
        }
    }

    /// Upstream listing query; one page of `limit` repositories.
    pub fn list_query(&self) -> ListQuery {
        ListQuery {
            repo_type: self.repo_type,
            sort: self.sort,
            direction: self.direction,
            per_page: self.limit,
        }
    }
}

impl Default for UserReposParams {
    fn default() -> Self {
        Self::from_raw(None, None, None, None, None, None)
    }
}
