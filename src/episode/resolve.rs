//! Field resolution for a single [`FeedEntry`].
//!
//! Feeds disagree about which optional elements they fill in, so every
//! displayed value goes through a fixed fallback chain:
//!
//! * body: first content block → description → empty
//! * thumbnail: `itunes:image` → first `media:thumbnail` → feed default
//! * audio: first link whose relation is `enclosure`, or nothing

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate};
use regex::Regex;

use super::{FeedEntry, Link, QueryError};

/// Offset the date-range view is pinned to (UTC+9).
const JST_OFFSET_SECS: i32 = 9 * 3600;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static RULE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{3,}").expect("valid rule regex"));

/// The fixed UTC+9 offset used for date ranges and "today".
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

/// Parse the entry's publish timestamp, keeping its own offset.
///
/// RSS `pubDate` is RFC 2822; Atom-derived entries carry RFC 3339, which is
/// accepted as a fallback.  A weekday that disagrees with the date is
/// ignored, since feeds get it wrong often enough.
pub fn resolve_published(entry: &FeedEntry) -> Result<DateTime<FixedOffset>, QueryError> {
    let raw = entry.published.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|e| match raw.split_once(',') {
            // The weekday is optional in RFC 2822, so retry without it.
            Some((_, rest)) => DateTime::parse_from_rfc2822(rest.trim_start()),
            None => Err(e),
        })
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map_err(|_| QueryError::MissingField {
            field: "published",
            title: entry.title.clone(),
        })
}

/// Calendar date of the publish timestamp in the timestamp's own offset.
pub fn resolve_date(entry: &FeedEntry) -> Result<NaiveDate, QueryError> {
    resolve_published(entry).map(|published| published.date_naive())
}

/// 1-based episode number for the entry at `position` (0 = newest) in a
/// feed of `total` entries: the newest entry gets `total`, the oldest gets 1.
pub fn episode_index(total: usize, position: usize) -> usize {
    debug_assert!(position < total, "position {position} outside feed of {total}");
    total.saturating_sub(position)
}

/// `"{index}: {YYYY-MM-DD} {title}"`, dated in the entry's own offset.
pub fn compose_title_line(index: usize, entry: &FeedEntry) -> Result<String, QueryError> {
    let date = resolve_date(entry)?;
    Ok(format!("{index}: {} {}", date.format("%Y-%m-%d"), entry.title))
}

/// Strip markup from feed text for display.
///
/// Removes anything between `<` and `>`, any stray angle bracket left over
/// from unbalanced markup, and runs of three or more dashes (decorative
/// separators).
pub fn clean_markup(raw: &str) -> String {
    let without_tags = TAG_RE.replace_all(raw, "");
    let without_brackets: String = without_tags
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .collect();
    RULE_RE.replace_all(&without_brackets, "").into_owned()
}

/// Display body: first content block, else description, cleaned.
pub fn resolve_body(entry: &FeedEntry) -> String {
    entry
        .first_content()
        .or(entry.description.as_deref())
        .map(clean_markup)
        .unwrap_or_default()
}

/// The entry's audio enclosure, if it has one.
pub fn resolve_audio(entry: &FeedEntry) -> Option<&Link> {
    entry.links.iter().find(|link| link.rel == "enclosure")
}

pub fn resolve_thumbnail<'a>(entry: &'a FeedEntry, default_image: &'a str) -> &'a str {
    entry
        .image
        .as_deref()
        .or_else(|| entry.media_thumbnails.first().map(String::as_str))
        .unwrap_or(default_image)
}
