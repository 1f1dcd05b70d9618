//! Query parameters for listing a user's repositories.
//!
//! Each enum parses leniently: unknown input falls back to the GitHub default
//! for that parameter rather than failing the request.

use std::fmt;

/// `type` filter for `GET /users/{username}/repos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepoType {
    All,
    #[default]
    Owner,
    Public,
    Private,
    Member,
}

impl RepoType {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "all" => RepoType::All,
            "public" => RepoType::Public,
            "private" => RepoType::Private,
            "member" => RepoType::Member,
            _ => RepoType::Owner,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RepoType::All => "all",
            RepoType::Owner => "owner",
            RepoType::Public => "public",
            RepoType::Private => "private",
            RepoType::Member => "member",
        }
    }
}

/// `sort` order for repository listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepoSort {
    Created,
    #[default]
    Updated,
    Pushed,
    FullName,
}

impl RepoSort {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "created" => RepoSort::Created,
            "pushed" => RepoSort::Pushed,
            "full_name" => RepoSort::FullName,
            _ => RepoSort::Updated,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RepoSort::Created => "created",
            RepoSort::Updated => "updated",
            RepoSort::Pushed => "pushed",
            RepoSort::FullName => "full_name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "asc" => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(RepoType, RepoSort, SortDirection);

/// Full parameter set of one listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub repo_type: RepoType,
    pub sort: RepoSort,
    pub direction: SortDirection,
    /// Page size, within [1, 100]
    pub per_page: u32,
}

impl ListQuery {
    pub const MAX_PER_PAGE: u32 = 100;

    /// Query string appended to the listing endpoint.
    pub fn to_query_string(&self) -> String {
        format!(
            "type={}&sort={}&direction={}&per_page={}",
            self.repo_type,
            self.sort,
            self.direction,
            self.per_page.clamp(1, Self::MAX_PER_PAGE)
        )
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            repo_type: RepoType::default(),
            sort: RepoSort::default(),
            direction: SortDirection::default(),
            per_page: Self::MAX_PER_PAGE,
        }
    }
}
