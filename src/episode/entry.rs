//! The feed snapshot the query engine reads.
//!
//! Sources convert their native format into these types; the engine never
//! mutates them.  Attributes that a feed may or may not carry are explicit
//! `Option`/`Vec` fields, and the fallback order between them lives in
//! [`super::resolve`].

/// A link record attached to an entry (`<link>`, `<enclosure>`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    /// Relation, e.g. `"alternate"` or `"enclosure"`.
    pub rel: String,
    pub href: String,
    /// MIME type, e.g. `"audio/mpeg"`.
    pub mime_type: Option<String>,
}

/// A single episode as published in the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    /// Raw publish timestamp (RFC 2822 for RSS, RFC 3339 for Atom).
    pub published: String,

    pub title: String,

    /// Content blocks (`content:encoded`).  Only the first one is read.
    pub content: Vec<String>,

    /// Plain description / summary.  Both this and `content` may carry HTML.
    pub description: Option<String>,

    /// Raw `itunes:duration` text.
    pub duration: Option<String>,

    pub links: Vec<Link>,

    /// Per-episode artwork (`itunes:image@href`).
    pub image: Option<String>,

    /// `media:thumbnail@url` values, in document order.
    pub media_thumbnails: Vec<String>,
}

impl FeedEntry {
    /// The first content block, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.content.first().map(String::as_str)
    }
}

/// An already-fetched feed, newest entry first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    pub title: String,
    pub entries: Vec<FeedEntry>,
    /// Channel-level artwork used when an entry has none of its own.
    pub default_image: Option<String>,
}

impl Feed {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Default thumbnail as a plain string (empty when the channel has none).
    pub fn default_image(&self) -> &str {
        self.default_image.as_deref().unwrap_or("")
    }
}
