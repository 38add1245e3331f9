//! Rendering of typed wiki outcomes into the strings handed back to the
//! caller. Nothing below this layer deals in display text.

use std::fmt;

use wikijs_client::{Page, PageHit};

/// Parses a caller-supplied page identifier. Identifiers arrive as strings
/// over the tool boundary even when they are numeric ids.
pub(crate) fn parse_page_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

pub(crate) fn search_results(hits: &[PageHit]) -> String {
    if hits.is_empty() {
        return "No results found".to_owned();
    }
    let mut lines = vec!["Search results:".to_owned()];
    for hit in hits {
        lines.push(format!(
            "- ID: {}, Title: {}, Path: {}",
            hit.id, hit.title, hit.path
        ));
        if let Some(description) = hit.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("  Description: {description}"));
        }
    }
    lines.join("\n")
}

/// Fixed-format page block. Missing fields render as explicit placeholders,
/// never silently dropped.
pub(crate) fn page_block(page: &Page) -> String {
    let updated_at = page
        .updated_at
        .map_or_else(|| "No update time".to_owned(), |at| at.to_rfc3339());
    format!(
        "Title: {}\nPath: {}\nID: {}\nLast Updated: {}\nDescription: {}\n\nContent:\n{}",
        page.title.as_deref().unwrap_or("No title"),
        page.path.as_deref().unwrap_or("No path"),
        page.id,
        updated_at,
        page.description.as_deref().unwrap_or("No description"),
        page.content.as_deref().unwrap_or("No content"),
    )
}

pub(crate) fn page_missing_by_id(id: impl fmt::Display) -> String {
    format!("No page found with ID: {id}")
}

pub(crate) fn page_missing_by_path(path: &str) -> String {
    format!("No page found with path: {path}")
}
