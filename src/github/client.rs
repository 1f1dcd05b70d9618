//! GitHub Client Module
//!
//! Issues single GET requests against the GitHub REST API and classifies the
//! outcome. Successful JSON payloads can be kept in the `apidata` cache layer
//! so repeated renders of the same data skip the network.

use std::time::Duration;

use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{ExpiringCache, Namespace, PolicyHandle};
use crate::error::{FetchError, FetchResult, UpstreamError};
use crate::github::{authorization_header, ListQuery, RateLimitInfo, Release, Repository, Tag};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = concat!("repo_display/", env!("CARGO_PKG_VERSION"));
const DEFAULT_BRANCH: &str = "main";

// == Accept ==
/// Representation requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    Json,
    /// Raw file contents (README and other files)
    Raw,
}

impl Accept {
    pub fn header_value(self) -> &'static str {
        match self {
            Accept::Json => "application/vnd.github.v3+json",
            Accept::Raw => "application/vnd.github.v3.raw",
        }
    }
}

#[derive(Clone)]
struct RawCache {
    cache: ExpiringCache,
    policy: PolicyHandle,
}

// == GitHub Client ==
/// Cheap to clone; clones share the connection pool and cache.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    auth_header: Option<String>,
    raw_cache: Option<RawCache>,
}

impl GitHubClient {
    // == Constructor ==
    /// Creates a client for `api_base`. An empty `token` sends anonymous
    /// requests.
    pub fn new(api_base: &str, token: &str) -> FetchResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            auth_header: authorization_header(token),
            raw_cache: None,
        })
    }

    /// Enables the `apidata` layer. Entry lifetimes are drawn from `policy`
    /// at write time.
    pub fn with_raw_cache(mut self, cache: ExpiringCache, policy: PolicyHandle) -> Self {
        self.raw_cache = Some(RawCache { cache, policy });
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    // == Fetch ==
    /// Performs one GET of `path` (relative to the API base) and returns the
    /// body of a 2xx response.
    pub async fn fetch(&self, path: &str, accept: Accept) -> FetchResult<String> {
        let url = format!("{}{}", self.api_base, path);
        let mut request = self.http.get(&url).header(ACCEPT, accept.header_value());
        if let Some(auth) = &self.auth_header {
            request = request.header(AUTHORIZATION, auth);
        }

        debug!(%url, "GitHub API request");
        let response = request.send().await.map_err(|err| {
            warn!(%url, error = %err, "GitHub API unreachable");
            FetchError::from(err)
        })?;

        if let Some(err) = classify_response(response.status(), response.headers()) {
            debug!(%url, status = response.status().as_u16(), error = %err, "GitHub API request failed");
            return Err(err);
        }

        Ok(response.text().await?)
    }

    // == User Repositories ==
    /// Lists `username`'s repositories (`GET /users/{username}/repos`).
    pub async fn user_repositories(
        &self,
        username: &str,
        query: &ListQuery,
    ) -> FetchResult<Vec<Repository>> {
        let key = Namespace::ApiData
            .key()
            .identity(username)
            .field("user_repos")
            .field(query.repo_type)
            .field(query.sort)
            .field(query.direction)
            .field(query.per_page)
            .build();

        if let Some(repos) = self.read_cached(&key, parse_array::<Repository>).await {
            return Ok(repos);
        }

        let path = format!("/users/{}/repos?{}", username, query.to_query_string());
        let body = self.fetch(&path, Accept::Json).await?;
        let repos = parse_array::<Repository>(&body)?;
        self.write_cached(&key, &body).await;
        Ok(repos)
    }

    // == Repository ==
    /// Fetches one repository, enriched with its download URL and latest
    /// release date. The enriched payload is what gets cached.
    pub async fn repository(&self, owner: &str, repo: &str) -> FetchResult<Repository> {
        let key = Namespace::ApiData.key().identity(owner).identity(repo).build();

        if let Some(repository) = self.read_cached(&key, parse_object::<Repository>).await {
            return Ok(repository);
        }

        let body = self
            .fetch(&format!("/repos/{owner}/{repo}"), Accept::Json)
            .await?;
        let mut repository = parse_object::<Repository>(&body)?;
        repository.fill_identity(owner, repo);
        self.enrich(&mut repository).await;

        match serde_json::to_string(&repository) {
            Ok(json) => self.write_cached(&key, &json).await,
            Err(err) => {
                warn!(key = %key, error = %err, "could not serialize repository for caching")
            }
        }
        Ok(repository)
    }

    // == Raw Contents ==
    pub async fn readme(&self, owner: &str, repo: &str) -> FetchResult<String> {
        self.fetch(&format!("/repos/{owner}/{repo}/readme"), Accept::Raw)
            .await
    }

    pub async fn file_contents(&self, owner: &str, repo: &str, path: &str) -> FetchResult<String> {
        let path = path.trim_start_matches('/');
        self.fetch(&format!("/repos/{owner}/{repo}/contents/{path}"), Accept::Raw)
            .await
    }

    // == Releases And Tags ==
    /// Latest published release, or `None` when the repository has none.
    pub async fn latest_release(&self, owner: &str, repo: &str) -> FetchResult<Option<Release>> {
        match self
            .fetch(&format!("/repos/{owner}/{repo}/releases/latest"), Accept::Json)
            .await
        {
            Ok(body) => parse_object::<Release>(&body).map(Some),
            Err(FetchError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Name of the most recent tag, or `None` when there is no tag.
    pub async fn latest_tag(&self, owner: &str, repo: &str) -> FetchResult<Option<String>> {
        let tags = match self
            .fetch(&format!("/repos/{owner}/{repo}/tags?per_page=1"), Accept::Json)
            .await
        {
            Ok(body) => parse_array::<Tag>(&body)?,
            Err(FetchError::NotFound) => return Ok(None),
            Err(err) => return Err(err),
        };

        Ok(tags
            .into_iter()
            .map(|tag| tag.name)
            .find(|name| !name.is_empty()))
    }

    async fn enrich(&self, repository: &mut Repository) {
        let owner = repository.owner_login().to_string();
        let name = repository.name.clone();

        let tag = self.latest_tag(&owner, &name).await.unwrap_or_else(|err| {
            debug!(repo = %repository.full_name, error = %err, "latest tag unavailable");
            None
        });
        repository.download_url = Some(archive_url(
            &owner,
            &name,
            tag.as_deref(),
            repository.default_branch.as_deref(),
        ));

        match self.latest_release(&owner, &name).await {
            Ok(Some(release)) => repository.latest_release_at = release.published_at,
            Ok(None) => {}
            Err(err) => {
                debug!(repo = %repository.full_name, error = %err, "latest release unavailable")
            }
        }
    }

    // == Raw Cache ==
    async fn read_cached<T>(&self, key: &str, parse: impl Fn(&str) -> FetchResult<T>) -> Option<T> {
        let raw = self.raw_cache.as_ref()?;
        let body = raw.cache.get_string(key).await?;
        match parse(&body) {
            Ok(value) => {
                debug!(key, "apidata cache hit");
                Some(value)
            }
            Err(_) => {
                warn!(key, "cached API payload has unexpected shape, refetching");
                None
            }
        }
    }

    async fn write_cached(&self, key: &str, body: &str) {
        let Some(raw) = &self.raw_cache else {
            return;
        };
        let ttl = raw.policy.snapshot().compute_ttl();
        if let Err(err) = raw.cache.set(key, body.as_bytes(), ttl).await {
            warn!(key, error = %err, "failed to cache API payload");
        }
    }
}

// == Classification ==
/// Maps a response status to its failure class, or `None` for 2xx.
///
/// A 403 counts as a rate limit unless the response reports calls left; a
/// missing remaining header means the quota is spent.
pub fn classify_response(status: StatusCode, headers: &HeaderMap) -> Option<FetchError> {
    if status.is_success() {
        return None;
    }
    if status == StatusCode::NOT_FOUND {
        return Some(FetchError::NotFound);
    }
    if status == StatusCode::FORBIDDEN {
        let info = RateLimitInfo::from_headers(headers);
        if info.is_exhausted() {
            return Some(FetchError::RateLimited {
                reset_at: info.reset_at,
            });
        }
    }
    Some(UpstreamError::Status(status.as_u16()).into())
}

/// Decodes a body that must be a JSON object.
fn parse_object<T: DeserializeOwned>(body: &str) -> FetchResult<T> {
    match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Object(_)) => {
            serde_json::from_value(value).map_err(|_| UpstreamError::InvalidResponse.into())
        }
        _ => Err(UpstreamError::InvalidResponse.into()),
    }
}

/// Decodes a body that must be a JSON array.
fn parse_array<T: DeserializeOwned>(body: &str) -> FetchResult<Vec<T>> {
    match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Array(_)) => {
            serde_json::from_value(value).map_err(|_| UpstreamError::InvalidResponse.into())
        }
        _ => Err(UpstreamError::InvalidResponse.into()),
    }
}

/// Zip archive of the latest tag, or of the default branch.
fn archive_url(owner: &str, repo: &str, tag: Option<&str>, default_branch: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("https://github.com/{owner}/{repo}/archive/refs/tags/{tag}.zip"),
        None => {
            let branch = default_branch
                .filter(|branch| !branch.is_empty())
                .unwrap_or(DEFAULT_BRANCH);
            format!("https://github.com/{owner}/{repo}/archive/refs/heads/{branch}.zip")
        }
    }
}
