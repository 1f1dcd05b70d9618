//! HTML Renderer Module
//!
//! Default fragment markup: card, minimal and badges-only styles, list grids
//! and inline error notices. All interpolated text is HTML-escaped.

use std::fmt::Write;

use chrono::Utc;

use crate::github::Repository;
use crate::render::{badge_url, time_ago, BadgeSet, Render};

pub const MIN_COLUMNS: u8 = 1;
pub const MAX_COLUMNS: u8 = 4;

// == Display Style ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayStyle {
    #[default]
    Card,
    Minimal,
    BadgesOnly,
}

impl DisplayStyle {
    /// Unknown styles render as a card.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "minimal" => DisplayStyle::Minimal,
            "badges-only" => DisplayStyle::BadgesOnly,
            _ => DisplayStyle::Card,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayStyle::Card => "card",
            DisplayStyle::Minimal => "minimal",
            DisplayStyle::BadgesOnly => "badges-only",
        }
    }
}

// == HTML Renderer ==
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    badges: BadgeSet,
}

impl HtmlRenderer {
    pub fn new(badges: BadgeSet) -> Self {
        Self { badges }
    }

    fn badges_html(&self, repo: &Repository, license_override: Option<&str>) -> String {
        let mut html = String::new();
        for kind in self.badges.iter() {
            if let Some(url) = badge_url(kind, repo, license_override) {
                let _ = write!(
                    html,
                    r#"<img src="{}" alt="{}" class="repo-display-card__badge" loading="lazy">"#,
                    escape_html(&url),
                    escape_html(&kind.alt_text())
                );
            }
        }
        html
    }

    fn card(&self, repo: &Repository, license_override: Option<&str>) -> String {
        let html_url = escape_html(&repo.html_url());
        let title = if repo.name.is_empty() {
            "Untitled Repository"
        } else {
            repo.name.as_str()
        };

        let description = repo
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| format!(r#"<p class="repo-display-card__description">{}</p>"#, escape_html(d)))
            .unwrap_or_default();

        let updated = repo
            .updated_at
            .map(|at| {
                format!(
                    r#"<span class="repo-display-card__stat repo-display-card__stat--updated">Updated {}</span>"#,
                    escape_html(&time_ago(at, Utc::now()))
                )
            })
            .unwrap_or_default();

        format!(
            concat!(
                r#"<div class="repo-display-card" data-repo="{full_name}">"#,
                r#"<div class="repo-display-card__header">"#,
                r#"<h3 class="repo-display-card__title">{title}</h3>"#,
                r#"<a href="{html_url}" class="repo-display-card__repo-link" target="_blank" rel="noopener noreferrer">GitHub</a>"#,
                "</div>",
                "{description}",
                r#"<div class="repo-display-card__stats">"#,
                r#"<span class="repo-display-card__stat repo-display-card__stat--stars">{stars}</span>"#,
                r#"<span class="repo-display-card__stat repo-display-card__stat--forks">{forks}</span>"#,
                "{updated}",
                r#"<span class="repo-display-card__language">{language}</span>"#,
                "</div>",
                r#"<div class="repo-display-card__badges">{badges}</div>"#,
                r#"<div class="repo-display-card__actions">"#,
                r#"<a href="{html_url}" class="repo-display-card__button repo-display-card__button--primary" target="_blank" rel="noopener noreferrer">View on GitHub</a>"#,
                r#"<a href="{download_url}" class="repo-display-card__button repo-display-card__button--secondary" target="_blank" rel="noopener noreferrer">Download</a>"#,
                "</div>",
                "</div>"
            ),
            full_name = escape_html(&repo.full_name),
            title = escape_html(title),
            html_url = html_url,
            description = description,
            stars = format_count(repo.stargazers_count),
            forks = format_count(repo.forks_count),
            updated = updated,
            language = escape_html(repo.language.as_deref().unwrap_or("Unknown")),
            badges = self.badges_html(repo, license_override),
            download_url = escape_html(&repo.download_url()),
        )
    }

    fn minimal(&self, repo: &Repository) -> String {
        let description = repo
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| format!(r#"<p class="repo-display-minimal__description">{}</p>"#, escape_html(d)))
            .unwrap_or_default();

        format!(
            r#"<div class="repo-display-minimal"><h4 class="repo-display-minimal__title"><a href="{}" target="_blank" rel="noopener noreferrer">{}</a></h4>{}</div>"#,
            escape_html(&repo.html_url()),
            escape_html(&repo.name),
            description
        )
    }
}

impl Render for HtmlRenderer {
    fn render(
        &self,
        repo: &Repository,
        style: DisplayStyle,
        license_override: Option<&str>,
    ) -> String {
        match style {
            DisplayStyle::Card => self.card(repo, license_override),
            DisplayStyle::Minimal => self.minimal(repo),
            DisplayStyle::BadgesOnly => format!(
                r#"<div class="repo-display-badges">{}</div>"#,
                self.badges_html(repo, license_override)
            ),
        }
    }

    fn render_grid(&self, items: &[String], columns: u8) -> String {
        let columns = columns.clamp(MIN_COLUMNS, MAX_COLUMNS);
        let mut html = format!(
            r#"<div class="repo-display-grid repo-display-grid--columns-{columns}">"#
        );
        for item in items {
            html.push_str(item);
        }
        html.push_str("</div>");
        html
    }

    fn render_error(&self, message: &str) -> String {
        format!(
            r#"<div class="repo-display-error"><p><strong>Error:</strong> {}</p></div>"#,
            escape_html(message)
        )
    }
}

// == Helpers ==
/// Escapes text for use in element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Groups thousands: `1234567` -> `"1,234,567"`.
fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
