//! Podcast registry configuration (`~/.config/podcast-grep/config.toml`).
//!
//! The file is optional: a missing or empty file, or one that lists no
//! podcasts, falls back to the built-in registry.
//!
//! ```toml
//! default_podcast = "Rebuild"
//!
//! [[podcasts]]
//! name = "Rebuild"
//! url = "https://feeds.rebuild.fm/rebuildfm"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A named feed the user can pick.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Podcast {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the podcast selected at startup.
    pub default_podcast: Option<String>,
    pub podcasts: Vec<Podcast>,
}

const BUILTIN_PODCASTS: &[(&str, &str)] = &[
    ("ゆとりっ娘たちのたわごと", "https://anchor.fm/s/6e491dbc/podcast/rss"),
    ("ドングリFM", "https://anchor.fm/s/76a89c80/podcast/rss"),
    ("上京ボーイズ", "https://anchor.fm/s/11f7ff38/podcast/rss"),
    ("忘れてみたい夜だから", "https://radiotalk.jp/rss/3710302b24c7e88c"),
    ("まめまめキャスト", "https://anchor.fm/s/8bec512c/podcast/rss"),
    ("Rebuild", "https://feeds.rebuild.fm/rebuildfm"),
    ("でこぽんFM", "https://anchor.fm/s/8f913194/podcast/rss"),
    ("Ossan.fm", "https://ossan.fm/feed.xml"),
    ("いなみまも", "https://anchor.fm/s/3af273dc/podcast/rss"),
    ("Sounds by monolith", "https://anchor.fm/s/1b32dd5c/podcast/rss"),
];

impl Config {
    /// `$HOME/.config/podcast-grep/config.toml`, if `HOME` is set.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("podcast-grep")
                .join("config.toml")
        })
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing or empty file → built-in registry
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    /// - Podcast with an empty name or URL → `Err(ConfigError::Invalid)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file found, using built-in podcasts");
                return Ok(Self::builtin());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::builtin());
        }

        let mut config: Config = toml::from_str(content)?;
        if let Some(bad) = config
            .podcasts
            .iter()
            .find(|p| p.name.trim().is_empty() || p.url.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "podcast entries need both a name and a url (got name {:?}, url {:?})",
                bad.name, bad.url
            )));
        }
        if config.podcasts.is_empty() {
            tracing::debug!("config lists no podcasts, using built-in podcasts");
            config.podcasts = Self::builtin().podcasts;
        }
        Ok(config)
    }

    /// The registry used when no config file provides one.
    pub fn builtin() -> Self {
        Self {
            default_podcast: None,
            podcasts: BUILTIN_PODCASTS
                .iter()
                .map(|(name, url)| Podcast {
                    name: (*name).to_string(),
                    url: (*url).to_string(),
                })
                .collect(),
        }
    }

    /// Position of the podcast called `name` in the registry.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.podcasts.iter().position(|p| p.name == name)
    }

    /// Position of the podcast selected at startup (the configured default,
    /// else the first entry).
    pub fn initial_index(&self) -> usize {
        self.default_podcast
            .as_deref()
            .and_then(|name| self.position(name))
            .unwrap_or(0)
    }
}
