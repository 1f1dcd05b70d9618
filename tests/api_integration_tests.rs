//! Integration Tests for API Endpoints
//!
//! Drives the full router against a wiremock stand-in for the GitHub API.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use repo_display::{cache::TtlPolicy, create_router, AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// == Helper Functions ==

async fn create_test_app(server: &MockServer) -> Router {
    create_test_app_with(server, |_| {}).await
}

async fn create_test_app_with(server: &MockServer, adjust: impl FnOnce(&mut Config)) -> Router {
    let mut config = Config {
        api_base: server.uri(),
        ttl_policy: TtlPolicy::new(6, false, 20),
        ..Config::default()
    };
    adjust(&mut config);
    create_router(AppState::from_config(&config).unwrap())
}

async fn get_html(app: &Router, uri: &str) -> String {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn post_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn repo_json(name: &str, fork: bool) -> Value {
    json!({
        "name": name,
        "full_name": format!("alice/{name}"),
        "owner": { "login": "alice" },
        "html_url": format!("https://github.com/alice/{name}"),
        "description": format!("The {name} project"),
        "stargazers_count": 42,
        "forks_count": 3,
        "fork": fork,
        "language": "Rust",
        "default_branch": "main"
    })
}

async fn mount_repo(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/repos/alice/foo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("foo", false)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// == Single Repository ==

#[tokio::test]
async fn test_badges_only_render_is_cached() {
    let server = MockServer::start().await;
    mount_repo(&server, 1).await;
    let app = create_test_app(&server).await;

    let first = get_html(&app, "/repos/alice/foo?style=badges-only").await;
    let second = get_html(&app, "/repos/alice/foo?style=badges-only").await;

    assert!(first.starts_with(r#"<div class="repo-display-badges">"#));
    assert!(first.contains("https://img.shields.io/github/stars/alice/foo"));
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_other_style_reuses_api_data() {
    let server = MockServer::start().await;
    mount_repo(&server, 1).await;
    let app = create_test_app(&server).await;

    let card = get_html(&app, "/repos/alice/foo").await;
    let minimal = get_html(&app, "/repos/Alice/Foo?style=minimal").await;

    assert!(card.contains("The foo project"));
    assert!(card.contains("https://github.com/alice/foo/archive/refs/heads/main.zip"));
    assert!(minimal.starts_with(r#"<div class="repo-display-minimal">"#));
}

#[tokio::test]
async fn test_license_override_changes_badge() {
    let server = MockServer::start().await;
    mount_repo(&server, 1).await;
    let app = create_test_app(&server).await;

    let html = get_html(&app, "/repos/alice/foo?style=badges-only&license=GPL-2.0").await;

    assert!(html.contains("https://img.shields.io/badge/license-GPL--2.0-blue"));
}

#[tokio::test]
async fn test_rate_limit_renders_reset_time_and_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/alice/foo"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1700000000")
                .set_body_json(json!({"message": "API rate limit exceeded"})),
        )
        .expect(2)
        .mount(&server)
        .await;
    let app = create_test_app(&server).await;

    let html = get_html(&app, "/repos/alice/foo").await;
    get_html(&app, "/repos/alice/foo").await;

    assert!(html.starts_with(r#"<div class="repo-display-error">"#));
    assert!(html.contains("2023-11-14 22:13:20 UTC"));
}

#[tokio::test]
async fn test_missing_repository() {
    let server = MockServer::start().await;
    let app = create_test_app(&server).await;

    let html = get_html(&app, "/repos/alice/nope").await;

    assert!(html.contains("Repository &quot;alice/nope&quot; not found."));
}

#[tokio::test]
async fn test_server_error_and_invalid_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/alice/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/alice/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let app = create_test_app(&server).await;

    let html = get_html(&app, "/repos/alice/broken").await;
    assert!(html.contains("GitHub API error: HTTP 500"));

    let html = get_html(&app, "/repos/alice/garbled").await;
    assert!(html.contains("Invalid response from GitHub API."));
}

// == Repository List ==

#[tokio::test]
async fn test_repo_list_grid() {
    let server = MockServer::start().await;
    mount_repo(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/repos/alice/bar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("bar", false)))
        .expect(1)
        .mount(&server)
        .await;
    let app = create_test_app(&server).await;

    let html = get_html(&app, "/repos?names=foo,%20bar,,&username=alice&columns=0").await;

    assert!(html.starts_with(
        r#"<div class="repo-display-grid repo-display-grid--columns-1">"#
    ));
    assert!(html.contains(r#"data-repo="alice/foo""#));
    assert!(html.contains(r#"data-repo="alice/bar""#));

    // Cached as a whole
    let again = get_html(&app, "/repos?names=foo,bar&username=alice&columns=0").await;
    assert_eq!(html, again);
}

#[tokio::test]
async fn test_repo_list_with_missing_item_is_not_cached() {
    let server = MockServer::start().await;
    mount_repo(&server, 1).await;
    let app = create_test_app(&server).await;

    let html = get_html(&app, "/repos?names=foo,ghost&username=alice").await;
    assert!(html.contains(r#"data-repo="alice/foo""#));
    assert!(html.contains("Repository &quot;alice/ghost&quot; not found."));

    let (_, cleared) = post_json(&app, "/admin/cache/clear").await;
    assert_eq!(cleared["output"], 0);
}

// == User Repositories ==

#[tokio::test]
async fn test_unknown_user_has_no_repositories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost/repos"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let app = create_test_app(&server).await;

    let html = get_html(&app, "/users/ghost/repos").await;

    assert!(html.contains("repo-display-error"));
    assert!(html.contains("No repositories found for user &quot;ghost&quot;."));
}

#[tokio::test]
async fn test_columns_are_clamped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice/repos"))
        .and(query_param("per_page", "30"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([repo_json("foo", false), repo_json("bar", false)])),
        )
        .expect(1)
        .mount(&server)
        .await;
    let app = create_test_app(&server).await;

    let wide = get_html(&app, "/users/alice/repos?columns=99").await;
    let four = get_html(&app, "/users/alice/repos?columns=4").await;
    let narrow = get_html(&app, "/users/alice/repos?columns=0").await;

    assert!(wide.contains("repo-display-grid--columns-4"));
    assert_eq!(wide, four);
    assert!(narrow.contains("repo-display-grid--columns-1"));
}

#[tokio::test]
async fn test_listing_parameters_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice/repos"))
        .and(query_param("type", "member"))
        .and(query_param("sort", "pushed"))
        .and(query_param("direction", "asc"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo_json("foo", false)])))
        .expect(1)
        .mount(&server)
        .await;
    let app = create_test_app(&server).await;

    let html = get_html(
        &app,
        "/users/alice/repos?type=member&sort=pushed&direction=asc&limit=500",
    )
    .await;

    assert!(html.contains(r#"data-repo="alice/foo""#));
}

#[tokio::test]
async fn test_exclude_forks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([repo_json("forked", true), repo_json("own", false)])),
        )
        .mount(&server)
        .await;
    let app = create_test_app(&server).await;

    let html = get_html(&app, "/users/alice/repos?exclude_forks=true").await;
    assert!(html.contains(r#"data-repo="alice/own""#));
    assert!(!html.contains(r#"data-repo="alice/forked""#));

    let html = get_html(&app, "/users/alice/repos?exclude_forks=0").await;
    assert!(html.contains(r#"data-repo="alice/forked""#));
}

#[tokio::test]
async fn test_only_forks_with_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo_json("forked", true)])))
        .mount(&server)
        .await;
    let app = create_test_app(&server).await;

    let html = get_html(&app, "/users/alice/repos?exclude_forks=1").await;

    assert!(html.contains("with the specified filters."));
}

#[tokio::test]
async fn test_empty_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let app = create_test_app(&server).await;

    let html = get_html(&app, "/users/alice/repos").await;

    assert!(html.contains("No repositories found for user &quot;alice&quot;."));
}

// == Admin, Stats, Health ==

#[tokio::test]
async fn test_cache_clear_counts_both_layers() {
    let server = MockServer::start().await;
    mount_repo(&server, 2).await;
    let app = create_test_app(&server).await;

    get_html(&app, "/repos/alice/foo").await;
    let (status, cleared) = post_json(&app, "/admin/cache/clear").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared, json!({"output": 1, "apidata": 1, "total": 2}));

    // Both layers are empty again, so the next render goes upstream
    get_html(&app, "/repos/alice/foo").await;
}

#[tokio::test]
async fn test_api_cache_can_be_disabled() {
    let server = MockServer::start().await;
    mount_repo(&server, 2).await;
    let app = create_test_app_with(&server, |config| config.api_cache_enabled = false).await;

    get_html(&app, "/repos/alice/foo").await;
    get_html(&app, "/repos/alice/foo?style=minimal").await;

    let (_, cleared) = post_json(&app, "/admin/cache/clear").await;
    assert_eq!(cleared, json!({"output": 2, "apidata": 0, "total": 2}));
}

#[tokio::test]
async fn test_stats_endpoint_reports_cache_activity() {
    let server = MockServer::start().await;
    mount_repo(&server, 1).await;
    let app = create_test_app(&server).await;

    get_html(&app, "/repos/alice/foo").await;
    get_html(&app, "/repos/alice/foo").await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let stats: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["writes"], 2);
    assert_eq!(stats["output_entries"], 1);
    assert_eq!(stats["apidata_entries"], 1);
    assert_eq!(stats["total_entries"], 2);
    assert_eq!(stats["ttl_hours"], 6);
    assert_eq!(stats["jitter_enabled"], false);
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start().await;
    let app = create_test_app(&server).await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
