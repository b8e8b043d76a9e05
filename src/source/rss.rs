//! RSS podcast feeds via the [`rss`] crate.
//!
//! Mapping from RSS elements to [`FeedEntry`] fields:
//!
//! | RSS                    | field              |
//! |------------------------|--------------------|
//! | `pubDate`              | `published`        |
//! | `content:encoded`      | `content[0]`       |
//! | `description`          | `description`      |
//! | `itunes:duration`      | `duration`         |
//! | `link`                 | `links` (alternate)|
//! | `enclosure`            | `links` (enclosure)|
//! | `itunes:image@href`    | `image`            |
//! | `media:thumbnail@url`  | `media_thumbnails` |

use anyhow::{Context, Result};

use super::FeedSource;
use crate::episode::{Feed, FeedEntry, Link};

/// A podcast published as RSS 2.0.
pub struct RssSource {
    pub url: String,
    pub label: String,
}

impl RssSource {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }

    /// Convert an already-fetched channel.  Pure, so tests can feed it
    /// inline XML.
    pub fn parse_channel(channel: &rss::Channel) -> Feed {
        let default_image = channel
            .itunes_ext()
            .and_then(|ext| ext.image())
            .or_else(|| channel.image().map(|image| image.url()))
            .map(String::from);

        Feed {
            title: channel.title().to_string(),
            entries: channel.items().iter().map(parse_item).collect(),
            default_image,
        }
    }
}

fn parse_item(item: &rss::Item) -> FeedEntry {
    let mut links = Vec::new();
    if let Some(link) = item.link() {
        links.push(Link {
            rel: "alternate".into(),
            href: link.to_string(),
            mime_type: None,
        });
    }
    if let Some(enclosure) = item.enclosure() {
        links.push(Link {
            rel: "enclosure".into(),
            href: enclosure.url().to_string(),
            mime_type: Some(enclosure.mime_type().to_string()).filter(|m| !m.is_empty()),
        });
    }

    let media_thumbnails = item
        .extensions()
        .get("media")
        .and_then(|media| media.get("thumbnail"))
        .map(|thumbnails| {
            thumbnails
                .iter()
                .filter_map(|ext| ext.attrs().get("url").cloned())
                .collect()
        })
        .unwrap_or_default();

    let itunes = item.itunes_ext();

    FeedEntry {
        published: item.pub_date().unwrap_or_default().to_string(),
        title: item.title().unwrap_or("(untitled)").to_string(),
        content: item.content().map(String::from).into_iter().collect(),
        description: item.description().map(String::from),
        duration: itunes.and_then(|ext| ext.duration()).map(String::from),
        links,
        image: itunes.and_then(|ext| ext.image()).map(String::from),
        media_thumbnails,
    }
}

impl FeedSource for RssSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> Result<Feed> {
        tracing::info!(source = %self.label, url = %self.url, "fetching feed");
        let body = reqwest::blocking::get(&self.url)
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("failed to fetch {}", self.url))?
            .bytes()
            .with_context(|| format!("failed to read body of {}", self.url))?;
        let channel = rss::Channel::read_from(body.as_ref())
            .with_context(|| format!("{} is not a valid RSS feed", self.url))?;

        let feed = Self::parse_channel(&channel);
        tracing::info!(source = %self.label, entries = feed.len(), "feed parsed");
        Ok(feed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episode::{resolve_audio, resolve_thumbnail};

    const PODCAST_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
     xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd"
     xmlns:content="http://purl.org/rss/1.0/modules/content/"
     xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Test Cast</title>
    <link>https://example.com</link>
    <description>A test podcast</description>
    <itunes:image href="https://example.com/cover.jpg"/>
    <item>
      <title>Second Episode</title>
      <link>https://example.com/2</link>
      <pubDate>Tue, 02 Jan 2024 12:00:00 +0900</pubDate>
      <description>Short summary</description>
      <content:encoded><![CDATA[<p>Full notes</p>]]></content:encoded>
      <itunes:duration>1:02:03</itunes:duration>
      <itunes:image href="https://example.com/2.jpg"/>
      <enclosure url="https://example.com/2.mp3" length="123" type="audio/mpeg"/>
    </item>
    <item>
      <title>First Episode</title>
      <pubDate>Mon, 01 Jan 2024 12:00:00 +0900</pubDate>
      <itunes:duration>45:00</itunes:duration>
      <media:thumbnail url="https://example.com/1-thumb.jpg"/>
    </item>
  </channel>
</rss>"#;

    fn parsed() -> Feed {
        let channel = rss::Channel::read_from(PODCAST_XML.as_bytes()).unwrap();
        RssSource::parse_channel(&channel)
    }

    #[test]
    fn parse_channel_keeps_feed_order_and_fields() {
        let feed = parsed();
        assert_eq!(feed.title, "Test Cast");
        assert_eq!(feed.len(), 2);

        let newest = &feed.entries[0];
        assert_eq!(newest.title, "Second Episode");
        assert_eq!(newest.published, "Tue, 02 Jan 2024 12:00:00 +0900");
        assert_eq!(newest.first_content(), Some("<p>Full notes</p>"));
        assert_eq!(newest.description.as_deref(), Some("Short summary"));
        assert_eq!(newest.duration.as_deref(), Some("1:02:03"));

        assert_eq!(feed.entries[1].duration.as_deref(), Some("45:00"));
        assert!(feed.entries[1].content.is_empty());
    }

    #[test]
    fn enclosure_becomes_audio_link() {
        let feed = parsed();
        let audio = resolve_audio(&feed.entries[0]).expect("enclosure");
        assert_eq!(audio.href, "https://example.com/2.mp3");
        assert_eq!(audio.mime_type.as_deref(), Some("audio/mpeg"));
        assert!(resolve_audio(&feed.entries[1]).is_none());
    }

    #[test]
    fn thumbnails_resolve_through_fallbacks() {
        let feed = parsed();
        assert_eq!(feed.default_image(), "https://example.com/cover.jpg");
        assert_eq!(
            resolve_thumbnail(&feed.entries[0], feed.default_image()),
            "https://example.com/2.jpg"
        );
        assert_eq!(
            resolve_thumbnail(&feed.entries[1], feed.default_image()),
            "https://example.com/1-thumb.jpg"
        );
    }

    #[test]
    fn handles_missing_title_and_date() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test</title>
    <link>https://example.com</link>
    <description>d</description>
    <item>
      <guid>g1</guid>
    </item>
  </channel>
</rss>"#;

        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let feed = RssSource::parse_channel(&channel);

        assert_eq!(feed.entries[0].title, "(untitled)");
        assert_eq!(feed.entries[0].published, "");
        assert!(feed.default_image.is_none());
    }

    #[test]
    fn name_returns_label() {
        let src = RssSource::new("http://example.com/feed", "My Feed");
        assert_eq!(src.name(), "My Feed");
    }
}
