//! Authorization header selection.
//!
//! Fine-grained (`github_pat_`) and `ghp_` tokens are sent with the `Bearer`
//! scheme; every other token uses the legacy `token` scheme.

const BEARER_PREFIXES: [&str; 2] = ["github_pat_", "ghp_"];

/// Returns the `Authorization` header value for `token`, or `None` when no
/// token is configured.
pub fn authorization_header(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if BEARER_PREFIXES.iter().any(|prefix| token.starts_with(prefix)) {
        Some(format!("Bearer {token}"))
    } else {
        Some(format!("token {token}"))
    }
}
