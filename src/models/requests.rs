//! Request DTOs for the HTTP API
//!
//! Query strings of the render endpoints. Every field is an optional raw
//! string; normalization (clamping, fallbacks) happens in the display layer
//! so malformed values degrade instead of failing the request.

use serde::Deserialize;

use crate::display::UserReposParams;

/// Query for `GET /repos/:username/:repo`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SingleRepoQuery {
    /// `card`, `minimal` or `badges-only`
    #[serde(default)]
    pub style: Option<String>,
    /// License shown instead of the one GitHub reports
    #[serde(default)]
    pub license: Option<String>,
}

/// Query for `GET /repos`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoListQuery {
    /// Comma-separated repository names
    #[serde(default)]
    pub names: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub columns: Option<String>,
}

/// Query for `GET /users/:username/repos`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserReposQuery {
    #[serde(default)]
    pub columns: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default, rename = "type")]
    pub repo_type: Option<String>,
    #[serde(default)]
    pub exclude_forks: Option<String>,
}

impl UserReposQuery {
    pub fn to_params(&self) -> UserReposParams {
        UserReposParams::from_raw(
            self.columns.as_deref(),
            self.limit.as_deref(),
            self.sort.as_deref(),
            self.direction.as_deref(),
            self.repo_type.as_deref(),
            self.exclude_forks.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{RepoSort, RepoType};

    #[test]
    fn test_single_repo_query_deserialize() {
        let query: SingleRepoQuery =
            serde_json::from_str(r#"{"style": "minimal", "license": "MIT"}"#).unwrap();
        assert_eq!(query.style.as_deref(), Some("minimal"));
        assert_eq!(query.license.as_deref(), Some("MIT"));

        let query: SingleRepoQuery = serde_json::from_str("{}").unwrap();
        assert!(query.style.is_none());
    }

    #[test]
    fn test_user_repos_query_type_field() {
        let query: UserReposQuery =
            serde_json::from_str(r#"{"type": "member", "sort": "pushed", "columns": "9"}"#)
                .unwrap();
        let params = query.to_params();
        assert_eq!(params.repo_type, RepoType::Member);
        assert_eq!(params.sort, RepoSort::Pushed);
        assert_eq!(params.columns, 4);
    }

    #[test]
    fn test_user_repos_query_defaults() {
        let params = UserReposQuery::default().to_params();
        assert_eq!(params, UserReposParams::default());
    }
}
