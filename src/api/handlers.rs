//! API Handlers
//!
//! HTTP request handlers for each endpoint. Render endpoints always answer
//! `200` with an HTML fragment; failures are rendered inline.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};

use crate::cache::{Clock, ExpiringCache, MemoryStore, Namespace, PolicyHandle, SystemClock};
use crate::config::Config;
use crate::display::{clamp_columns, DisplayService, OutputCache};
use crate::error::{FetchResult, Result};
use crate::github::GitHubClient;
use crate::models::{
    ClearCacheResponse, HealthResponse, RepoListQuery, SingleRepoQuery, StatsResponse,
    UserReposQuery,
};
use crate::render::HtmlRenderer;

/// Application state shared across all handlers.
///
/// Every component is built once here and shared by `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// In-memory backing store, swept by the cleanup task
    pub store: Arc<MemoryStore>,
    /// Cache layer over `store`, shared by both namespaces
    pub cache: ExpiringCache,
    pub display: DisplayService,
}

impl AppState {
    /// Creates a new AppState from configuration on the system clock.
    pub fn from_config(config: &Config) -> FetchResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a new AppState whose cache reads time from `clock`.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> FetchResult<Self> {
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        let cache = ExpiringCache::new(store.clone(), clock);
        let policy = PolicyHandle::new(config.ttl_policy);

        let mut client = GitHubClient::new(&config.api_base, &config.github_token)?;
        if config.api_cache_enabled {
            client = client.with_raw_cache(cache.clone(), policy.clone());
        }

        let display = DisplayService::new(
            client,
            Arc::new(HtmlRenderer::new(config.badges.clone())),
            OutputCache::new(cache.clone(), policy),
            cache.clone(),
            config.api_cache_enabled,
            config.default_username.clone(),
        );

        Ok(Self {
            store,
            cache,
            display,
        })
    }
}

/// Handler for GET /repos/:username/:repo
pub async fn single_repo_handler(
    State(state): State<AppState>,
    Path((username, repo)): Path<(String, String)>,
    Query(query): Query<SingleRepoQuery>,
) -> Html<String> {
    Html(
        state
            .display
            .render_single(
                &username,
                &repo,
                query.style.as_deref().unwrap_or_default(),
                query.license.as_deref().unwrap_or_default(),
            )
            .await,
    )
}

/// Handler for GET /repos
///
/// Renders the comma-separated `names` as a grid.
pub async fn repo_list_handler(
    State(state): State<AppState>,
    Query(query): Query<RepoListQuery>,
) -> Html<String> {
    Html(
        state
            .display
            .render_names(
                query.names.as_deref().unwrap_or_default(),
                query.username.as_deref().unwrap_or_default(),
                clamp_columns(query.columns.as_deref()),
            )
            .await,
    )
}

/// Handler for GET /users/:username/repos
pub async fn user_repos_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<UserReposQuery>,
) -> Html<String> {
    Html(
        state
            .display
            .render_all_for_user(&username, &query.to_params())
            .await,
    )
}

/// Handler for POST /admin/cache/clear
pub async fn clear_cache_handler(
    State(state): State<AppState>,
) -> Result<Json<ClearCacheResponse>> {
    let counts = state.display.clear_cache().await?;
    Ok(Json(counts.into()))
}

/// Handler for GET /stats
///
/// Returns cache statistics, live entries per layer and the active lifetime
/// policy.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    let output_entries = state.store.count_live(&Namespace::Output.prefix()).await;
    let apidata_entries = state.store.count_live(&Namespace::ApiData.prefix()).await;
    let policy = state.display.output_cache().policy();

    Json(StatsResponse::new(
        &stats,
        output_entries,
        apidata_entries,
        &policy,
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
