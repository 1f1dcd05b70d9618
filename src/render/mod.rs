//! Render Module
//!
//! Turns repository data into embeddable HTML fragments.

mod badges;
mod html;
mod relative_time;

pub use badges::{badge_url, BadgeKind, BadgeSet};
pub use html::{escape_html, DisplayStyle, HtmlRenderer, MAX_COLUMNS, MIN_COLUMNS};
pub use relative_time::time_ago;

use crate::github::Repository;

/// Fragment renderer consumed by the display service.
///
/// Implementations are pure: the same input always produces the same markup
/// (up to the relative "updated" text), and nothing here touches the network.
pub trait Render: Send + Sync {
    /// Renders one repository in `style`. A non-empty `license_override`
    /// replaces the license GitHub reports.
    fn render(&self, repo: &Repository, style: DisplayStyle, license_override: Option<&str>)
        -> String;

    /// Wraps already-rendered items in a grid of `columns` columns.
    fn render_grid(&self, items: &[String], columns: u8) -> String;

    /// Inline fragment reporting a failed request.
    fn render_error(&self, message: &str) -> String;
}
