//! "Episodes N through M" listing.

use super::resolve::{compose_title_line, episode_index};
use super::{Feed, FeedEntry};

/// How many episodes the default window shows.
const DEFAULT_WINDOW: usize = 10;

/// Inclusive range of episode numbers, `newest >= oldest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeWindow {
    pub newest: usize,
    pub oldest: usize,
}

impl EpisodeWindow {
    pub fn new(newest: usize, oldest: usize) -> Self {
        Self { newest, oldest }
    }

    /// The latest ten episodes of a feed with `total` entries.
    pub fn latest(total: usize) -> Self {
        Self {
            newest: total,
            oldest: total.saturating_sub(DEFAULT_WINDOW - 1).max(1),
        }
    }

    /// Clamp both ends into `1..=total` with `oldest <= newest`.
    pub fn clamped(self, total: usize) -> Self {
        if total == 0 {
            return Self { newest: 0, oldest: 0 };
        }
        let newest = self.newest.clamp(1, total);
        let oldest = self.oldest.clamp(1, newest);
        Self { newest, oldest }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.oldest <= index && index <= self.newest
    }
}

/// An entry selected by [`list_episodes`].
#[derive(Debug, Clone)]
pub struct ListedEpisode<'a> {
    pub index: usize,
    pub entry: &'a FeedEntry,
    pub title_line: String,
}

/// Entries whose episode number falls in `window`, newest first.
///
/// The window is clamped to the feed first.  Entries whose publish date
/// cannot be read are skipped.
pub fn list_episodes(feed: &Feed, window: EpisodeWindow) -> Vec<ListedEpisode<'_>> {
    let total = feed.len();
    let window = window.clamped(total);

    feed.entries
        .iter()
        .enumerate()
        .map(|(position, entry)| (episode_index(total, position), entry))
        .filter(|(index, _)| window.contains(*index))
        .filter_map(|(index, entry)| match compose_title_line(index, entry) {
            Ok(title_line) => Some(ListedEpisode { index, entry, title_line }),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping entry in listing");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    /// `n` entries, newest first, one day apart.
    fn feed_of(n: usize) -> Feed {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let entries = (0..n)
            .rev()
            .map(|i| FeedEntry {
                published: (base + Duration::days(i as i64)).to_rfc2822(),
                title: format!("Episode {}", i + 1),
                ..FeedEntry::default()
            })
            .collect();
        Feed { entries, ..Feed::default() }
    }

    #[test]
    fn latest_window_covers_ten_episodes() {
        assert_eq!(EpisodeWindow::latest(25), EpisodeWindow::new(25, 16));
        assert_eq!(EpisodeWindow::latest(4), EpisodeWindow::new(4, 1));
    }

    #[test]
    fn clamps_to_feed_bounds() {
        assert_eq!(EpisodeWindow::new(99, 0).clamped(5), EpisodeWindow::new(5, 1));
        // oldest above newest collapses onto newest
        assert_eq!(EpisodeWindow::new(3, 4).clamped(5), EpisodeWindow::new(3, 3));
    }

    #[test]
    fn ten_entry_feed_numbers_oldest_as_one() {
        let feed = feed_of(10);
        let listed = list_episodes(&feed, EpisodeWindow::new(10, 1));
        assert_eq!(listed.len(), 10);
        assert_eq!(listed[0].index, 10);
        assert_eq!(listed[0].entry.title, "Episode 10");
        assert_eq!(listed[9].index, 1);
        assert_eq!(listed[9].title_line, "1: 2024-01-01 Episode 1");
    }

    #[test]
    fn lists_only_the_window() {
        let feed = feed_of(20);
        let listed = list_episodes(&feed, EpisodeWindow::new(12, 10));
        let indexes: Vec<usize> = listed.iter().map(|l| l.index).collect();
        assert_eq!(indexes, vec![12, 11, 10]);
    }

    #[test]
    fn empty_feed_lists_nothing() {
        let empty = Feed::default();
        let listed = list_episodes(&empty, EpisodeWindow::latest(0));
        assert!(listed.is_empty());
    }
}
