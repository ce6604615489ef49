//! Display formatting for catalog data.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use std::sync::LazyLock;

use regex::Regex;

/// Matches the common YouTube URL shapes and captures the video id.
static YOUTUBE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*").expect("youtube id pattern is valid")
});

/// Whether a listing costs nothing.
#[must_use]
pub fn is_free(price: f64) -> bool {
    price.abs() < f64::EPSILON
}

/// Price label for catalog cards.
#[must_use]
pub fn card_price_label(price: f64) -> String {
    if is_free(price) { "Free to Play".to_owned() } else { format!("${price}") }
}

/// Price label for the detail page.
#[must_use]
pub fn detail_price_label(price: f64) -> String {
    if is_free(price) { "Free".to_owned() } else { format!("${price}") }
}

/// Convert a YouTube watch/share URL into its embeddable form.
///
/// Embed URLs pass through; URLs without a recognizable 11-character video
/// id are returned unchanged. Blank input yields `None`.
#[must_use]
pub fn youtube_embed_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    if url.contains("/embed/") {
        return Some(url.to_owned());
    }
    let id = YOUTUBE_ID
        .captures(url)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str());
    match id {
        Some(id) if id.chars().count() == 11 => Some(format!("https://www.youtube.com/embed/{id}")),
        _ => Some(url.to_owned()),
    }
}

/// Split a comma-separated category/tag field into trimmed, non-empty items.
#[must_use]
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Date portion (`YYYY-MM-DD`) of an ISO timestamp, or `-` when absent.
#[must_use]
pub fn short_date(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.chars().take(10).collect(),
        _ => "-".to_owned(),
    }
}

/// Field value or `-` when absent or blank.
#[must_use]
pub fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_owned(),
        _ => "-".to_owned(),
    }
}
