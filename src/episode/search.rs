//! Keyword search over episodes.

use super::resolve::{compose_title_line, episode_index, resolve_body};
use super::{Feed, FeedEntry, QueryError};

/// Outcome of matching one entry against a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: bool,
    pub title_line: String,
    /// Cleaned body, only filled in for a match when detail was requested.
    pub body: Option<String>,
}

/// A matching entry found by [`search`].
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    /// 1-based episode number.
    pub index: usize,
    pub entry: &'a FeedEntry,
    pub result: MatchResult,
}

/// Match `entry` (episode number `index`) against `keyword`.
///
/// The keyword is a case-sensitive literal substring of the title line, the
/// raw first content block, or the raw description.  Raw means markup is
/// searched too, so a keyword inside an attribute value still matches.
///
/// An empty keyword never matches, and never fails: the title line is left
/// empty when the entry's date cannot be read.
pub fn match_entry(
    index: usize,
    entry: &FeedEntry,
    keyword: &str,
    detail: bool,
) -> Result<MatchResult, QueryError> {
    if keyword.is_empty() {
        return Ok(MatchResult {
            matched: false,
            title_line: compose_title_line(index, entry).unwrap_or_default(),
            body: None,
        });
    }

    let title_line = compose_title_line(index, entry)?;

    let matched = (title_line.contains(keyword)
            || entry.first_content().is_some_and(|c| c.contains(keyword))
            || entry.description.as_deref().is_some_and(|d| d.contains(keyword)));

    let body = (matched && detail).then(|| resolve_body(entry));

    Ok(MatchResult {
        matched,
        title_line,
        body,
    })
}

/// Every entry of `feed` that matches `keyword`, newest first.
///
/// Entries whose publish date cannot be read are skipped.
pub fn search<'a>(feed: &'a Feed, keyword: &str, detail: bool) -> Vec<SearchHit<'a>> {
    if keyword.is_empty() {
        return Vec::new();
    }

    let total = feed.len();
    feed.entries
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            let index = episode_index(total, position);
            match match_entry(index, entry, keyword, detail) {
                Ok(result) if result.matched => Some(SearchHit { index, entry, result }),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping entry during search");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, content: Option<&str>, description: Option<&str>) -> FeedEntry {
        FeedEntry {
            published: "Tue, 02 Jan 2024 12:00:00 +0900".into(),
            title: title.into(),
            content: content.map(String::from).into_iter().collect(),
            description: description.map(String::from),
            ..FeedEntry::default()
        }
    }

    #[test]
    fn empty_keyword_never_matches() {
        let e = entry("Everything", Some("everything"), Some("everything"));
        let result = match_entry(1, &e, "", true).unwrap();
        assert!(!result.matched);
        assert!(result.body.is_none());
        assert_eq!(result.title_line, "1: 2024-01-02 Everything");
    }

    #[test]
    fn empty_keyword_with_unreadable_date_is_still_no_match() {
        let mut e = entry("t", Some("t"), None);
        e.published = "garbage".into();
        let result = match_entry(1, &e, "", false).unwrap();
        assert!(!result.matched);
        assert_eq!(result.title_line, "");
    }

    #[test]
    fn matches_title_line_including_index_and_date() {
        let e = entry("Rust talk", None, None);
        assert!(match_entry(3, &e, "Rust", false).unwrap().matched);
        assert!(match_entry(3, &e, "2024-01-02", false).unwrap().matched);
        assert!(match_entry(3, &e, "3: ", false).unwrap().matched);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let e = entry("Rust talk", None, None);
        assert!(!match_entry(1, &e, "rust", false).unwrap().matched);
    }

    #[test]
    fn matches_raw_content_and_description() {
        let e = entry("t", Some("<p>about compilers</p>"), None);
        assert!(match_entry(1, &e, "compilers", false).unwrap().matched);

        let e = entry("t", None, Some("guests: alice"));
        assert!(match_entry(1, &e, "alice", false).unwrap().matched);
    }

    #[test]
    fn keyword_inside_markup_attribute_still_matches() {
        let e = entry("t", Some(r#"<a href="https://example.com/secret">link</a>"#), None);
        let result = match_entry(1, &e, "secret", true).unwrap();
        assert!(result.matched);
        // The cleaned body no longer contains the attribute.
        assert_eq!(result.body.as_deref(), Some("link"));
    }

    #[test]
    fn only_first_content_block_is_searched() {
        let mut e = entry("t", Some("first"), None);
        e.content.push("second".into());
        assert!(!match_entry(1, &e, "second", false).unwrap().matched);
    }

    #[test]
    fn body_only_returned_with_detail() {
        let e = entry("t", None, Some("<i>notes</i> ---- more"));
        let plain = match_entry(1, &e, "notes", false).unwrap();
        assert!(plain.matched);
        assert!(plain.body.is_none());

        let detailed = match_entry(1, &e, "notes", true).unwrap();
        assert_eq!(detailed.body.as_deref(), Some("notes  more"));
    }

    #[test]
    fn bad_date_is_an_error_for_a_single_entry() {
        let mut e = entry("t", None, None);
        e.published = "??".into();
        assert!(match_entry(1, &e, "t", false).is_err());
    }

    #[test]
    fn search_numbers_hits_from_feed_length_and_skips_bad_dates() {
        let mut broken = entry("keyword broken", None, None);
        broken.published = "??".into();
        let feed = Feed {
            entries: vec![
                entry("keyword newest", None, None),
                entry("other", None, None),
                broken,
                entry("keyword oldest", None, None),
            ],
            ..Feed::default()
        };

        let hits = search(&feed, "keyword", false);
        let indexes: Vec<usize> = hits.iter().map(|h| h.index).collect();
        assert_eq!(indexes, vec![4, 1]);
        assert_eq!(hits[1].result.title_line, "1: 2024-01-02 keyword oldest");
    }

    #[test]
    fn search_with_empty_keyword_is_empty() {
        let feed = Feed {
            entries: vec![entry("anything", None, None)],
            ..Feed::default()
        };
        assert!(search(&feed, "", false).is_empty());
    }
}
