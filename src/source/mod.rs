//! Feed source abstraction.
//!
//! A [`FeedSource`] turns some remote feed into a [`Feed`] snapshot for the
//! query engine.  Only RSS is implemented ([`rss`]); the engine itself never
//! does I/O, so anything that can produce a `Feed` can be plugged in here.
//!
//! ## Adding a source
//!
//! 1. Create a file in this directory (e.g. `atom.rs`).
//! 2. Implement [`FeedSource`] for a struct holding its configuration.
//! 3. Re-export it below and construct it in `main.rs`.

mod rss;

pub use rss::RssSource;

use anyhow::Result;

use crate::episode::Feed;

/// Something that can fetch a podcast feed.
///
/// The loader calls [`fetch()`](FeedSource::fetch) on a background thread,
/// so implementations must be [`Send`].
pub trait FeedSource: Send {
    /// Label shown in the header and in log lines.
    fn name(&self) -> &str;

    /// Fetch and parse the whole feed, newest entry first.
    fn fetch(&self) -> Result<Feed>;
}
