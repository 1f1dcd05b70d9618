//! Shields.io badge selection and URLs.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::github::Repository;

const SHIELDS_BASE: &str = "https://img.shields.io";

/// Everything outside the RFC 3986 unreserved set.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// == Badge Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BadgeKind {
    Version,
    LastCommit,
    License,
    Stars,
    Forks,
    Issues,
    Language,
    Contributors,
    Watchers,
    OpenPrs,
    ClosedIssues,
    Downloads,
    CodeSize,
    RepoSize,
    CommitActivity,
    ReleaseDate,
}

impl BadgeKind {
    /// Every kind, in display order.
    pub const ALL: [BadgeKind; 16] = [
        BadgeKind::Version,
        BadgeKind::LastCommit,
        BadgeKind::License,
        BadgeKind::Stars,
        BadgeKind::Forks,
        BadgeKind::Issues,
        BadgeKind::Language,
        BadgeKind::Contributors,
        BadgeKind::Watchers,
        BadgeKind::OpenPrs,
        BadgeKind::ClosedIssues,
        BadgeKind::Downloads,
        BadgeKind::CodeSize,
        BadgeKind::RepoSize,
        BadgeKind::CommitActivity,
        BadgeKind::ReleaseDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BadgeKind::Version => "version",
            BadgeKind::LastCommit => "last_commit",
            BadgeKind::License => "license",
            BadgeKind::Stars => "stars",
            BadgeKind::Forks => "forks",
            BadgeKind::Issues => "issues",
            BadgeKind::Language => "language",
            BadgeKind::Contributors => "contributors",
            BadgeKind::Watchers => "watchers",
            BadgeKind::OpenPrs => "open_prs",
            BadgeKind::ClosedIssues => "closed_issues",
            BadgeKind::Downloads => "downloads",
            BadgeKind::CodeSize => "code_size",
            BadgeKind::RepoSize => "repo_size",
            BadgeKind::CommitActivity => "commit_activity",
            BadgeKind::ReleaseDate => "release_date",
        }
    }

    /// Accepts `last_commit` as well as `last-commit`, in any case.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }

    /// Major badges are shown unless configured otherwise.
    pub fn is_default(self) -> bool {
        matches!(
            self,
            BadgeKind::Version
                | BadgeKind::LastCommit
                | BadgeKind::License
                | BadgeKind::Stars
                | BadgeKind::Forks
                | BadgeKind::Issues
                | BadgeKind::Language
                | BadgeKind::Contributors
        )
    }

    /// Image alt text, e.g. `"Last commit badge"`.
    pub fn alt_text(self) -> String {
        let words = self.as_str().replace('_', " ");
        let mut chars = words.chars();
        match chars.next() {
            Some(first) => format!("{}{} badge", first.to_ascii_uppercase(), chars.as_str()),
            None => "badge".to_string(),
        }
    }
}

impl fmt::Display for BadgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Badge Set ==
/// Enabled badge kinds, always iterated in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeSet {
    kinds: Vec<BadgeKind>,
}

impl BadgeSet {
    pub fn new(kinds: impl IntoIterator<Item = BadgeKind>) -> Self {
        let mut kinds: Vec<BadgeKind> = kinds.into_iter().collect();
        kinds.sort();
        kinds.dedup();
        Self { kinds }
    }

    /// Parses a comma-separated list of badge names. Unknown names are
    /// skipped.
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(',').filter_map(BadgeKind::parse))
    }

    pub fn contains(&self, kind: BadgeKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = BadgeKind> + '_ {
        self.kinds.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for BadgeSet {
    fn default() -> Self {
        Self::new(BadgeKind::ALL.into_iter().filter(|kind| kind.is_default()))
    }
}

// == Badge URL ==
/// Image URL of `kind` for `repo`, or `None` when the badge has nothing to
/// show (a release-date badge for a repository with no known dates).
pub fn badge_url(kind: BadgeKind, repo: &Repository, license_override: Option<&str>) -> Option<String> {
    let slug = format!("{}/{}", repo.owner_login(), repo.name);
    let github = |path: &str| format!("{SHIELDS_BASE}/github/{path}/{slug}");

    let url = match kind {
        BadgeKind::Version => github("v/tag"),
        BadgeKind::LastCommit => github("last-commit"),
        BadgeKind::License => return Some(license_badge_url(repo, license_override, &slug)),
        BadgeKind::Stars => github("stars"),
        BadgeKind::Forks => github("forks"),
        BadgeKind::Issues => github("issues"),
        BadgeKind::Language => github("languages/top"),
        BadgeKind::Contributors => github("contributors"),
        BadgeKind::Watchers => github("watchers"),
        BadgeKind::OpenPrs => github("issues-pr"),
        BadgeKind::ClosedIssues => github("issues-closed"),
        BadgeKind::Downloads => format!("{}/total", github("downloads")),
        BadgeKind::CodeSize => github("languages/code-size"),
        BadgeKind::RepoSize => github("repo-size"),
        BadgeKind::CommitActivity => github("commit-activity/m"),
        BadgeKind::ReleaseDate => return release_date_badge_url(repo),
    };
    Some(url)
}

fn license_badge_url(repo: &Repository, license_override: Option<&str>, slug: &str) -> String {
    let license = license_override
        .map(str::trim)
        .filter(|license| !license.is_empty() && *license != "NOASSERTION")
        .or_else(|| repo.spdx_license());

    match license {
        Some(license) => static_badge("license", &license.replace(' ', "_")),
        None => format!("{SHIELDS_BASE}/github/license/{slug}"),
    }
}

fn release_date_badge_url(repo: &Repository) -> Option<String> {
    let (label, at) = match (repo.latest_release_at, repo.created_at) {
        (Some(at), _) => ("latest_release", at),
        (None, Some(at)) => ("created", at),
        (None, None) => return None,
    };
    Some(static_badge(label, &at.format("%Y-%m-%d").to_string()))
}

/// Shields.io static badge. A `-` inside the message must be doubled, since
/// single dashes separate the label, message and color.
fn static_badge(label: &str, message: &str) -> String {
    format!(
        "{SHIELDS_BASE}/badge/{}-{}-blue",
        encode_component(label),
        encode_component(&message.replace('-', "--"))
    )
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
