//! podcast-grep: browse a podcast's RSS feed from the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐  LoadMsg   ┌──────────┐  draw()  ┌──────────┐
//! │ loader.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (thread)  │  (channel) │ (state)  │          │ (render) │
//! └───────────┘            └──────────┘          └──────────┘
//!       ▲                       ▲  │ episode::* (queries)
//!       │ Action::Reload        │  ▼
//!       └──────────────── ┌──────────┐
//!                         │ input.rs │
//!                         └──────────┘
//! ```
//!
//! * **`episode/`**: the query engine: duration parsing, field fallbacks,
//!   date-range totals, keyword search.  Pure functions over a `Feed`.
//! * **`source/`**: the `FeedSource` trait and the RSS implementation.
//! * **`loader`**: fetches feeds on background threads.
//! * **`config`**: the podcast registry (`config.toml`).
//! * **`cli`**: arguments and the non-interactive commands.
//! * **`app`** / **`ui`** / **`input`**: the terminal interface.

use std::io;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use podcast_grep::app::{self, Action, App};
use podcast_grep::cli::{self, Args};
use podcast_grep::config::{Config, Podcast};
use podcast_grep::input;
use podcast_grep::loader::{LoadMsg, Loader};
use podcast_grep::source::{FeedSource, RssSource};
use podcast_grep::ui;

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before printing a panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn load_config(args: &Args) -> Result<Config> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => match Config::default_path() {
            Some(path) => path,
            None => return Ok(Config::builtin()),
        },
    };
    Config::load(&path).with_context(|| format!("failed to load config from {}", path.display()))
}

/// The registry to show and the position selected at startup, honouring
/// `--podcast` and `--url`.
fn podcast_choices(args: &Args, config: &Config) -> Result<(Vec<Podcast>, usize)> {
    let mut podcasts = config.podcasts.clone();

    if let Some(url) = &args.url {
        podcasts.insert(
            0,
            Podcast {
                name: url.clone(),
                url: url.clone(),
            },
        );
        return Ok((podcasts, 0));
    }

    if let Some(name) = &args.podcast {
        let Some(index) = config.position(name) else {
            bail!("unknown podcast {name:?} (see `podcast-grep podcasts`)");
        };
        return Ok((podcasts, index));
    }

    Ok((podcasts, config.initial_index()))
}

fn source_for(podcast: &Podcast) -> Box<dyn FeedSource> {
    Box::new(RssSource::new(&podcast.url, &podcast.name))
}

/// Hand an episode's audio to the system player.  Only http(s) URLs are
/// passed on.
fn open_audio(href: &str) -> Result<()> {
    let url = url::Url::parse(href).with_context(|| format!("invalid audio URL {href:?}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("refusing to open non-http audio URL {href:?}");
    }
    open::that(url.as_str()).with_context(|| format!("failed to open {href}"))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let (podcasts, selected) = podcast_choices(&args, &config)?;

    match &args.command {
        Some(command) if !command.needs_feed() => cli::write_podcasts(&config, &mut io::stdout().lock()),
        Some(command) => {
            let Some(podcast) = podcasts.get(selected) else {
                bail!("no podcasts configured");
            };
            let feed = source_for(podcast)
                .fetch()
                .with_context(|| format!("failed to load {}", podcast.name))?;
            cli::run(command, &feed, app::today_in_jst(), &mut io::stdout().lock())
        }
        None => run_tui(App::new(podcasts, selected)),
    }
}

fn run_tui(mut app: App) -> Result<()> {
    install_panic_hook();

    let loader = Loader::new();
    if let Some((podcast, generation)) = app.begin_load() {
        loader.request(source_for(&podcast), generation);
    }

    let mut guard = TerminalGuard::new()?;

    // ~10 fps: drain loader results, render, then wait up to one tick for input.
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Some(msg) = loader.try_recv() {
            match msg {
                LoadMsg::Loaded { generation, feed } => app.on_loaded(generation, feed),
                LoadMsg::Failed { generation, error } => app.on_failed(generation, error),
            }
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                match input::handle_key_event(&mut app, key) {
                    Action::None => {}
                    Action::Reload => {
                        if let Some((podcast, generation)) = app.begin_load() {
                            loader.request(source_for(&podcast), generation);
                        }
                    }
                    Action::OpenAudio(href) => {
                        app.status = match open_audio(&href) {
                            Ok(()) => format!("Opened {href}"),
                            Err(e) => format!("Error: {e:#}"),
                        };
                    }
                }
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("podcast-grep").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn default_choice_is_configured_default() {
        let mut config = Config::builtin();
        config.default_podcast = Some("Rebuild".into());
        let (podcasts, selected) = podcast_choices(&args(&[]), &config).unwrap();
        assert_eq!(podcasts[selected].name, "Rebuild");
    }

    #[test]
    fn url_argument_is_prepended_and_selected() {
        let config = Config::builtin();
        let (podcasts, selected) =
            podcast_choices(&args(&["--url", "https://example.com/rss"]), &config).unwrap();
        assert_eq!(selected, 0);
        assert_eq!(podcasts[0].url, "https://example.com/rss");
        assert_eq!(podcasts.len(), config.podcasts.len() + 1);
    }

    #[test]
    fn podcast_argument_selects_by_name() {
        let config = Config::builtin();
        let (podcasts, selected) = podcast_choices(&args(&["--podcast", "Ossan.fm"]), &config).unwrap();
        assert_eq!(podcasts[selected].url, "https://ossan.fm/feed.xml");
    }

    #[test]
    fn unknown_podcast_name_is_an_error() {
        let err = podcast_choices(&args(&["--podcast", "Nope"]), &Config::builtin()).unwrap_err();
        assert!(err.to_string().contains("unknown podcast"));
    }

    #[test]
    fn open_audio_rejects_non_http_urls() {
        assert!(open_audio("file:///etc/passwd").is_err());
        assert!(open_audio("not a url").is_err());
    }
}
