//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;

use crate::cache::{TtlPolicy, DEFAULT_TTL_HOURS};
use crate::github::DEFAULT_API_BASE;
use crate::render::BadgeSet;

pub const DEFAULT_USERNAME: &str = "octocat";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. Out-of-range values are clamped or coerced at load time.
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub user rendered when a request names none
    pub default_username: String,
    /// GitHub token; empty sends anonymous requests
    pub github_token: String,
    /// GitHub REST API base URL
    pub api_base: String,
    /// Lifetime policy for both cache layers
    pub ttl_policy: TtlPolicy,
    /// Whether raw API payloads are cached (`apidata` layer)
    pub api_cache_enabled: bool,
    /// Badges shown on cards and badge strips
    pub badges: BadgeSet,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_USERNAME` - Default GitHub user (default: octocat)
    /// - `GITHUB_TOKEN` - API token (default: none)
    /// - `GITHUB_API_BASE` - API base URL (default: https://api.github.com)
    /// - `CACHE_TTL_HOURS` - Base cache lifetime, clamped to 1..=24 (default: 6)
    /// - `CACHE_JITTER_ENABLED` - Randomize lifetimes (default: true)
    /// - `CACHE_JITTER_PERCENT` - 10, 20 or 30; anything else means 20 (default: 20)
    /// - `API_CACHE_ENABLED` - Cache raw API payloads (default: true)
    /// - `ENABLED_BADGES` - Comma-separated badge names (default: major badges)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let flag = |name: &str, default: bool| {
            text(name)
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes"))
                .unwrap_or(default)
        };

        let ttl_policy = TtlPolicy::new(
            text("CACHE_TTL_HOURS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(i64::from(DEFAULT_TTL_HOURS)),
            flag("CACHE_JITTER_ENABLED", defaults.ttl_policy.jitter_enabled),
            text("CACHE_JITTER_PERCENT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(i64::from(defaults.ttl_policy.jitter_percent.as_percent())),
        );

        Self {
            default_username: text("DEFAULT_USERNAME").unwrap_or(defaults.default_username),
            github_token: text("GITHUB_TOKEN").unwrap_or_default(),
            api_base: text("GITHUB_API_BASE").unwrap_or(defaults.api_base),
            ttl_policy,
            api_cache_enabled: flag("API_CACHE_ENABLED", defaults.api_cache_enabled),
            badges: lookup("ENABLED_BADGES")
                .map(|list| BadgeSet::parse_list(&list))
                .unwrap_or(defaults.badges),
            server_port: text("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cleanup_interval: text("CLEANUP_INTERVAL")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_username: DEFAULT_USERNAME.to_string(),
            github_token: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            ttl_policy: TtlPolicy::default(),
            api_cache_enabled: true,
            badges: BadgeSet::default(),
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}
