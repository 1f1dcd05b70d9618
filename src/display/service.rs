//! Display Service Module
//!
//! Entry points for rendering one repository, a list of repositories or all
//! repositories of a user. Each returns HTML: failures come back as an inline
//! error fragment so the embedding page always renders.

use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::cache::{ExpiringCache, Namespace};
use crate::display::{split_names, validate_name, OutputCache, Rendered, UserReposParams};
use crate::error::{CacheError, DisplayError, FetchError};
use crate::github::{GitHubClient, Repository};
use crate::render::{DisplayStyle, Render, MAX_COLUMNS, MIN_COLUMNS};

type DisplayResult<T> = std::result::Result<T, DisplayError>;

/// Entry of a list render: a name to fetch, or data already at hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoItem {
    Name(String),
    Data(Box<Repository>),
}

/// Entries removed per cache layer by [`DisplayService::clear_cache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearedCounts {
    pub output: usize,
    pub apidata: usize,
}

impl ClearedCounts {
    pub fn total(&self) -> usize {
        self.output + self.apidata
    }
}

// == Display Service ==
#[derive(Clone)]
pub struct DisplayService {
    client: GitHubClient,
    renderer: Arc<dyn Render>,
    output: OutputCache,
    cache: ExpiringCache,
    api_cache_enabled: bool,
    default_username: String,
}

impl DisplayService {
    // == Constructor ==
    /// # Arguments
    /// * `client` - GitHub client, with or without the `apidata` layer
    /// * `renderer` - Fragment renderer
    /// * `output` - `output` cache layer
    /// * `cache` - Shared cache, used to clear the `apidata` layer
    /// * `api_cache_enabled` - Whether `clear_cache` also clears `apidata`
    /// * `default_username` - Used when a request names no user
    pub fn new(
        client: GitHubClient,
        renderer: Arc<dyn Render>,
        output: OutputCache,
        cache: ExpiringCache,
        api_cache_enabled: bool,
        default_username: impl Into<String>,
    ) -> Self {
        Self {
            client,
            renderer,
            output,
            cache,
            api_cache_enabled,
            default_username: default_username.into(),
        }
    }

    pub fn output_cache(&self) -> &OutputCache {
        &self.output
    }

    // == Render Single ==
    /// Renders one repository.
    ///
    /// Unknown styles render as a card. An empty `username` means the
    /// configured default user; an empty `license` keeps GitHub's license.
    pub async fn render_single(
        &self,
        username: &str,
        repo: &str,
        style: &str,
        license: &str,
    ) -> String {
        let result = self.try_render_single(username, repo, style, license).await;
        self.finish(result)
    }

    async fn try_render_single(
        &self,
        username: &str,
        repo: &str,
        style: &str,
        license: &str,
    ) -> DisplayResult<String> {
        if repo.trim().is_empty() {
            return Err(DisplayError::Validation(
                "Repository name is required.".to_string(),
            ));
        }
        let username = self.resolve_username(username)?;
        let repo = validate_name("repository name", repo)?;
        let style = DisplayStyle::parse(style);
        let license = license.trim();

        let signature = Namespace::Output
            .key()
            .identity(&username)
            .identity(&repo)
            .field(style.as_str())
            .field(license);

        let (username, repo) = (&username, &repo);
        self.output
            .get_or_render(&signature, move || async move {
                self.render_repository(username, repo, style, license)
                    .await
                    .map(Rendered::Complete)
            })
            .await
    }

    // == Render List ==
    /// Renders `repos` as a grid. `Name` entries are fetched as `username`'s
    /// repositories; `Data` entries render without a request.
    ///
    /// Entries that fail are replaced by an error fragment inside the grid;
    /// such a grid is returned but not cached.
    pub async fn render_list(&self, repos: &[RepoItem], username: &str, columns: u8) -> String {
        let result = self.try_render_list(repos, username, columns).await;
        self.finish(result)
    }

    /// [`DisplayService::render_list`] for a comma-separated name list.
    pub async fn render_names(&self, names: &str, username: &str, columns: u8) -> String {
        if names.trim().is_empty() {
            return self.finish(Err(DisplayError::Validation(
                "Repository names are required (comma-separated).".to_string(),
            )));
        }
        let items: Vec<RepoItem> = split_names(names).into_iter().map(RepoItem::Name).collect();
        self.render_list(&items, username, columns).await
    }

    async fn try_render_list(
        &self,
        repos: &[RepoItem],
        username: &str,
        columns: u8,
    ) -> DisplayResult<String> {
        let username = self.resolve_username(username)?;
        let columns = columns.clamp(MIN_COLUMNS, MAX_COLUMNS);

        let mut items = Vec::with_capacity(repos.len());
        for item in repos {
            match item {
                RepoItem::Name(name) if name.trim().is_empty() => {}
                RepoItem::Name(name) => {
                    items.push(RepoItem::Name(validate_name("repository name", name)?))
                }
                RepoItem::Data(data) => items.push(RepoItem::Data(data.clone())),
            }
        }
        if items.is_empty() {
            return Err(DisplayError::Validation(
                "No valid repository names provided.".to_string(),
            ));
        }

        let joined = items
            .iter()
            .map(|item| match item {
                RepoItem::Name(name) => name.clone(),
                RepoItem::Data(data) => format!("{}#{}", data.name, content_digest(data)),
            })
            .collect::<Vec<_>>()
            .join(",");
        let signature = Namespace::Output
            .key()
            .identity(&username)
            .identity(&joined)
            .field(columns);

        let (username, items) = (&username, &items);
        self.output
            .get_or_render(&signature, move || async move {
                Ok(self.render_grid(items, username, columns).await)
            })
            .await
    }

    // == Render All For User ==
    /// Renders one page of `username`'s repositories as a grid.
    pub async fn render_all_for_user(&self, username: &str, params: &UserReposParams) -> String {
        let result = self.try_render_all_for_user(username, params).await;
        self.finish(result)
    }

    async fn try_render_all_for_user(
        &self,
        username: &str,
        params: &UserReposParams,
    ) -> DisplayResult<String> {
        let username = self.resolve_username(username)?;

        let signature = Namespace::Output
            .key()
            .identity(&username)
            .field("user_repos")
            .field(params.columns)
            .field(params.limit)
            .field(params.sort)
            .field(params.direction)
            .field(params.repo_type)
            .field(if params.exclude_forks { "1" } else { "0" });

        let username = &username;
        self.output
            .get_or_render(&signature, move || async move {
                let repos = match self
                    .client
                    .user_repositories(username, &params.list_query())
                    .await
                {
                    Ok(repos) => repos,
                    Err(FetchError::NotFound) => {
                        return Err(DisplayError::NoRepositories(username.clone()))
                    }
                    Err(err) => return Err(err.into()),
                };
                if repos.is_empty() {
                    return Err(DisplayError::NoRepositories(username.clone()));
                }

                let items: Vec<RepoItem> = repos
                    .into_iter()
                    .filter(|repo| !(params.exclude_forks && repo.fork))
                    .take(params.limit as usize)
                    .map(|repo| RepoItem::Data(Box::new(repo)))
                    .collect();
                if items.is_empty() {
                    return Err(DisplayError::NoMatchingRepositories(username.clone()));
                }

                Ok(self.render_grid(&items, username, params.columns).await)
            })
            .await
    }

    // == Clear Cache ==
    /// Empties the `output` layer and, when enabled, the `apidata` layer.
    pub async fn clear_cache(&self) -> Result<ClearedCounts, CacheError> {
        let output = self.output.clear().await?;
        let apidata = if self.api_cache_enabled {
            self.cache
                .delete_by_namespace(Namespace::ApiData.as_str())
                .await?
        } else {
            0
        };

        let counts = ClearedCounts { output, apidata };
        debug!(output, apidata, "cache cleared");
        Ok(counts)
    }

    // == Helpers ==
    async fn render_repository(
        &self,
        owner: &str,
        repo: &str,
        style: DisplayStyle,
        license: &str,
    ) -> DisplayResult<String> {
        let repository = self
            .client
            .repository(owner, repo)
            .await
            .map_err(|err| match err {
                FetchError::NotFound => DisplayError::RepoNotFound {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                },
                other => other.into(),
            })?;

        let license = Some(license).filter(|l| !l.is_empty());
        Ok(self.renderer.render(&repository, style, license))
    }

    async fn render_grid(&self, items: &[RepoItem], username: &str, columns: u8) -> Rendered {
        let mut fragments = Vec::with_capacity(items.len());
        let mut complete = true;

        for item in items {
            let fragment = match item {
                RepoItem::Name(name) => {
                    match self
                        .render_repository(username, name, DisplayStyle::Card, "")
                        .await
                    {
                        Ok(html) => html,
                        Err(err) => {
                            complete = false;
                            self.report(&err);
                            self.renderer.render_error(&err.to_string())
                        }
                    }
                }
                RepoItem::Data(data) => {
                    let mut data = data.as_ref().clone();
                    let name = data.name.clone();
                    data.fill_identity(username, &name);
                    self.renderer.render(&data, DisplayStyle::Card, None)
                }
            };
            fragments.push(fragment);
        }

        let html = self.renderer.render_grid(&fragments, columns);
        if complete {
            Rendered::Complete(html)
        } else {
            Rendered::Partial(html)
        }
    }

    fn resolve_username(&self, username: &str) -> DisplayResult<String> {
        let username = if username.trim().is_empty() {
            self.default_username.as_str()
        } else {
            username
        };
        validate_name("GitHub username", username)
    }

    fn finish(&self, result: DisplayResult<String>) -> String {
        result.unwrap_or_else(|err| {
            self.report(&err);
            self.renderer.render_error(&err.to_string())
        })
    }

    fn report(&self, err: &DisplayError) {
        match err {
            DisplayError::Fetch(
                FetchError::Transport(_) | FetchError::Upstream(_) | FetchError::RateLimited { .. },
            ) => {
                warn!(error = %err, "render request failed")
            }
            _ => debug!(error = %err, "render request rejected"),
        }
    }
}

/// Short digest of pre-fetched repository data. Names cannot contain `#`, so
/// a `name#digest` entry never matches a bare name.
fn content_digest(repo: &Repository) -> String {
    let bytes = serde_json::to_vec(repo).unwrap_or_default();
    hex::encode(&Sha256::digest(&bytes)[..8])
}
