//! GitHub API payload models.
//!
//! Only presence is checked: every field is optional or defaulted, so a
//! sparse payload still deserializes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub login: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    #[serde(default)]
    pub spdx_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Repository as returned by `GET /repos/{owner}/{repo}` and listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub clone_url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub license: Option<License>,

    /// Archive of the latest tag, or of the default branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Publication time of the latest release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_release_at: Option<DateTime<Utc>>,
}

impl Repository {
    /// Fills identity fields the payload left out, using the request path.
    pub fn fill_identity(&mut self, owner: &str, repo: &str) {
        if self.name.is_empty() {
            self.name = repo.to_string();
        }
        if self.owner.as_ref().map_or(true, |o| o.login.is_empty()) {
            self.owner = Some(Owner {
                login: owner.to_string(),
            });
        }
        if self.full_name.is_empty() {
            self.full_name = format!("{}/{}", self.owner_login(), self.name);
        }
    }

    pub fn owner_login(&self) -> &str {
        self.owner.as_ref().map(|o| o.login.as_str()).unwrap_or("")
    }

    pub fn html_url(&self) -> String {
        self.html_url
            .clone()
            .unwrap_or_else(|| format!("https://github.com/{}/{}", self.owner_login(), self.name))
    }

    pub fn download_url(&self) -> String {
        self.download_url
            .clone()
            .or_else(|| self.clone_url.clone())
            .unwrap_or_else(|| self.html_url())
    }

    /// SPDX identifier reported by GitHub, ignoring `NOASSERTION`.
    pub fn spdx_license(&self) -> Option<&str> {
        self.license
            .as_ref()
            .and_then(|l| l.spdx_id.as_deref())
            .filter(|id| !id.is_empty() && *id != "NOASSERTION")
    }
}

/// Entry of `GET /repos/{owner}/{repo}/tags`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub name: String,
}

/// Payload of `GET /repos/{owner}/{repo}/releases/latest`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}
