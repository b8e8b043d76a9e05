//! Episode query engine.
//!
//! Everything in here is a pure function over a [`Feed`] snapshot that a
//! [`crate::source::FeedSource`] has already fetched.  Nothing does I/O and
//! nothing keeps state between calls, so the UI and the CLI can call into it
//! freely.
//!
//! * **`duration`**: `H:MM:SS` / `M:SS` strings to seconds and back.
//! * **`resolve`**: field fallbacks for a single entry (date, title line,
//!   body, audio enclosure, thumbnail).
//! * **`aggregate`**: total listening time over an inclusive date range.
//! * **`search`**: keyword matching over title lines and raw markup.
//! * **`listing`**: the "episodes N through M" view.

mod aggregate;
mod duration;
mod entry;
mod listing;
mod resolve;
mod search;

pub use aggregate::{aggregate, AggregationResult, DateRange};
pub use duration::{format_hms, parse_duration};
pub use entry::{Feed, FeedEntry, Link};
pub use listing::{list_episodes, EpisodeWindow, ListedEpisode};
pub use resolve::{
    clean_markup, compose_title_line, episode_index, jst, resolve_audio, resolve_body,
    resolve_date, resolve_published, resolve_thumbnail,
};
pub use search::{match_entry, search, MatchResult, SearchHit};

use thiserror::Error;

/// Failures of the query engine.
///
/// A missing audio enclosure is not an error: [`resolve_audio`] returns
/// `None` for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A duration did not split into two or three integer fields.  Holds the
    /// offending input (empty when the entry had no duration at all).
    #[error("invalid duration format: {0:?}")]
    InvalidFormat(String),

    /// A field required to place the entry (its publish date) is absent or
    /// cannot be parsed.
    #[error("missing or unparsable {field} on entry {title:?}")]
    MissingField { field: &'static str, title: String },
}
