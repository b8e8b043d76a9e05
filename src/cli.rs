//! Command-line arguments and the non-interactive commands.
//!
//! Each command writes plain text to any [`Write`] so the output can be
//! piped (and tested) without a terminal.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::episode::{aggregate, list_episodes, resolve_audio, search, DateRange, EpisodeWindow, Feed, FeedEntry};

#[derive(Parser, Debug)]
#[command(
    name = "podcast-grep",
    about = "Browse a podcast feed: list episodes, grep them, total their listening time"
)]
pub struct Args {
    /// Config file (default: ~/.config/podcast-grep/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Podcast to open, by its configured name
    #[arg(long, conflicts_with = "url")]
    pub podcast: Option<String>,

    /// Open an RSS feed URL that is not in the config
    #[arg(long)]
    pub url: Option<String>,

    /// Run one query and print the result instead of starting the UI
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print episodes by number (default: the latest ten)
    List {
        /// Newest episode number to print
        #[arg(long)]
        newest: Option<usize>,
        /// Oldest episode number to print
        #[arg(long)]
        oldest: Option<usize>,
    },
    /// Print episodes whose title, content, or description contains KEYWORD
    Search {
        keyword: String,
        /// Also print each match's episode notes
        #[arg(long)]
        detail: bool,
    },
    /// Print total listening time of episodes published between two dates
    Duration {
        /// First day, YYYY-MM-DD (UTC+9; default: today)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day, YYYY-MM-DD (UTC+9; default: today)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Print the configured podcasts
    Podcasts,
}

impl Command {
    pub fn needs_feed(&self) -> bool {
        !matches!(self, Command::Podcasts)
    }
}

/// Run a feed command against an already-fetched feed.
pub fn run(command: &Command, feed: &Feed, today: NaiveDate, out: &mut impl Write) -> Result<()> {
    match command {
        Command::List { newest, oldest } => {
            let defaults = EpisodeWindow::latest(feed.len());
            let window = EpisodeWindow::new(
                newest.unwrap_or(defaults.newest),
                oldest.unwrap_or(defaults.oldest),
            );
            for listed in list_episodes(feed, window) {
                writeln!(out, "{}", listed.title_line)?;
                write_audio(listed.entry, out)?;
            }
        }
        Command::Search { keyword, detail } => {
            for hit in search(feed, keyword, *detail) {
                writeln!(out, "{}", hit.result.title_line)?;
                if let Some(body) = &hit.result.body {
                    for line in body.lines().filter(|l| !l.trim().is_empty()) {
                        writeln!(out, "    {}", line.trim())?;
                    }
                }
                write_audio(hit.entry, out)?;
            }
        }
        Command::Duration { from, to } => {
            let range = DateRange::new(from.unwrap_or(today), to.unwrap_or(today));
            let result = aggregate(&feed.entries, range)?;
            writeln!(out, "{} ({})", result.total_hms(), result.episodes_label())?;
            writeln!(out, "(x1.3: {})", result.adjusted_hms())?;
        }
        Command::Podcasts => {}
    }
    Ok(())
}

pub fn write_podcasts(config: &Config, out: &mut impl Write) -> Result<()> {
    for podcast in &config.podcasts {
        writeln!(out, "{}\t{}", podcast.name, podcast.url)?;
    }
    Ok(())
}

fn write_audio(entry: &FeedEntry, out: &mut impl Write) -> std::io::Result<()> {
    match resolve_audio(entry) {
        Some(audio) => match &audio.mime_type {
            Some(mime) => writeln!(out, "    {} ({mime})", audio.href),
            None => writeln!(out, "    {}", audio.href),
        },
        None => writeln!(out, "    (no audio)"),
    }
}
