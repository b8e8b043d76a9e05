use chrono::{NaiveDate, Utc};
use ratatui::widgets::ListState;

use crate::config::Podcast;
use crate::episode::{
    aggregate, jst, list_episodes, resolve_audio, resolve_thumbnail, search, AggregationResult,
    DateRange, EpisodeWindow, Feed, FeedEntry, Link,
};

/// Which view the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Episodes N through M.
    List,
    /// Keyword search.
    Search,
    /// Total listening time between two dates.
    Duration,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::List, Mode::Search, Mode::Duration];

    pub fn next(self) -> Self {
        match self {
            Mode::List => Mode::Search,
            Mode::Search => Mode::Duration,
            Mode::Duration => Mode::List,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::List => "List",
            Mode::Search => "Search",
            Mode::Duration => "Duration",
        }
    }

    /// Labels of the editable fields, in edit order.
    pub fn field_labels(self) -> &'static [&'static str] {
        match self {
            Mode::List => &["from episode", "to episode"],
            Mode::Search => &["keyword"],
            Mode::Duration => &["from date", "to date"],
        }
    }
}

/// What the main loop must do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// (Re)fetch the current podcast.
    Reload,
    /// Hand this audio URL to the system player.
    OpenAudio(String),
}

/// Text typed into the mode fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    pub newest: String,
    pub oldest: String,
    pub keyword: String,
    pub from_date: String,
    pub to_date: String,
}

impl Inputs {
    pub fn field(&self, mode: Mode, i: usize) -> &str {
        match (mode, i) {
            (Mode::List, 0) => &self.newest,
            (Mode::List, _) => &self.oldest,
            (Mode::Search, _) => &self.keyword,
            (Mode::Duration, 0) => &self.from_date,
            (Mode::Duration, _) => &self.to_date,
        }
    }

    fn field_mut(&mut self, mode: Mode, i: usize) -> &mut String {
        match (mode, i) {
            (Mode::List, 0) => &mut self.newest,
            (Mode::List, _) => &mut self.oldest,
            (Mode::Search, _) => &mut self.keyword,
            (Mode::Duration, 0) => &mut self.from_date,
            (Mode::Duration, _) => &mut self.to_date,
        }
    }
}

/// One line of the results list, with what the detail pane needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub title_line: String,
    pub audio: Option<Link>,
    pub thumbnail: String,
    /// Cleaned body, present for search hits when detail is on.
    pub body: Option<String>,
}

impl Row {
    fn new(title_line: String, entry: &FeedEntry, feed: &Feed, body: Option<String>) -> Self {
        Self {
            title_line,
            audio: resolve_audio(entry).cloned(),
            thumbnail: resolve_thumbnail(entry, feed.default_image()).to_string(),
            body,
        }
    }
}

pub struct App {
    pub podcasts: Vec<Podcast>,
    pub selected_podcast: usize,
    pub feed: Option<Feed>,
    pub loading: bool,
    /// Bumped on every load request; stale results are dropped.
    generation: u64,
    pub mode: Mode,
    pub inputs: Inputs,
    /// Field being edited, with the inputs as they were before editing.
    pub editing: Option<usize>,
    saved_inputs: Option<Inputs>,
    /// Show episode bodies for search hits.
    pub detail: bool,
    pub rows: Vec<Row>,
    pub summary: Option<AggregationResult>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
}

impl App {
    pub fn new(podcasts: Vec<Podcast>, selected_podcast: usize) -> Self {
        let today = today_in_jst().format("%Y-%m-%d").to_string();
        Self {
            selected_podcast: selected_podcast.min(podcasts.len().saturating_sub(1)),
            podcasts,
            feed: None,
            loading: false,
            generation: 0,
            mode: Mode::List,
            inputs: Inputs {
                from_date: today.clone(),
                to_date: today,
                ..Inputs::default()
            },
            editing: None,
            saved_inputs: None,
            detail: false,
            rows: Vec::new(),
            summary: None,
            list_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
        }
    }

    pub fn current_podcast(&self) -> Option<&Podcast> {
        self.podcasts.get(self.selected_podcast)
    }

    // -- loading -------------------------------------------------------------

    /// Start loading the current podcast.  Returns the podcast to fetch and
    /// the generation its result must carry.
    pub fn begin_load(&mut self) -> Option<(Podcast, u64)> {
        let podcast = self.current_podcast()?.clone();
        self.generation += 1;
        self.loading = true;
        self.feed = None;
        self.rows.clear();
        self.summary = None;
        self.list_state.select(None);
        self.status = format!("Loading {}…", podcast.name);
        Some((podcast, self.generation))
    }

    pub fn on_loaded(&mut self, generation: u64, feed: Feed) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "dropping stale feed");
            return;
        }
        let window = EpisodeWindow::latest(feed.len());
        self.inputs.newest = window.newest.to_string();
        self.inputs.oldest = window.oldest.to_string();
        self.status = format!("Fetched {} episodes", feed.len());
        self.loading = false;
        self.feed = Some(feed);
        self.recompute();
    }

    pub fn on_failed(&mut self, generation: u64, error: String) {
        if generation != self.generation {
            return;
        }
        self.loading = false;
        self.status = format!("Error: {error}");
    }

    pub fn next_podcast(&mut self) -> Action {
        if self.podcasts.is_empty() {
            return Action::None;
        }
        self.selected_podcast = (self.selected_podcast + 1) % self.podcasts.len();
        Action::Reload
    }

    pub fn previous_podcast(&mut self) -> Action {
        if self.podcasts.is_empty() {
            return Action::None;
        }
        self.selected_podcast = self
            .selected_podcast
            .checked_sub(1)
            .unwrap_or(self.podcasts.len() - 1);
        Action::Reload
    }

    // -- modes and editing ---------------------------------------------------

    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
        self.recompute();
    }

    pub fn toggle_detail(&mut self) {
        self.detail = !self.detail;
        if self.mode == Mode::Search {
            self.recompute();
        }
    }

    pub fn start_editing(&mut self) {
        self.saved_inputs = Some(self.inputs.clone());
        self.editing = Some(0);
    }

    pub fn next_field(&mut self) {
        if let Some(i) = self.editing {
            self.editing = Some((i + 1) % self.mode.field_labels().len());
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(i) = self.editing {
            self.inputs.field_mut(self.mode, i).push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(i) = self.editing {
            self.inputs.field_mut(self.mode, i).pop();
        }
    }

    pub fn apply_edit(&mut self) {
        self.editing = None;
        self.saved_inputs = None;
        self.recompute();
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        if let Some(saved) = self.saved_inputs.take() {
            self.inputs = saved;
        }
    }

    // -- results -------------------------------------------------------------

    /// Rebuild `rows` / `summary` for the current mode from the loaded feed.
    pub fn recompute(&mut self) {
        self.rows.clear();
        self.summary = None;
        self.list_state.select(None);

        let Some(feed) = self.feed.as_ref() else {
            return;
        };

        match self.mode {
            Mode::List => {
                let window = match parse_window(&self.inputs, feed.len()) {
                    Ok(window) => window,
                    Err(e) => {
                        self.status = format!("Error: {e}");
                        return;
                    }
                };
                self.rows = list_episodes(feed, window)
                    .into_iter()
                    .map(|listed| Row::new(listed.title_line, listed.entry, feed, None))
                    .collect();
                self.status = format!("{} episodes listed", self.rows.len());
            }
            Mode::Search => {
                self.rows = search(feed, &self.inputs.keyword, self.detail)
                    .into_iter()
                    .map(|hit| Row::new(hit.result.title_line, hit.entry, feed, hit.result.body))
                    .collect();
                self.status = if self.inputs.keyword.is_empty() {
                    "Enter a keyword (e)".into()
                } else {
                    format!("{} matches for {:?}", self.rows.len(), self.inputs.keyword)
                };
            }
            Mode::Duration => {
                let range = match parse_range(&self.inputs) {
                    Ok(range) => range,
                    Err(e) => {
                        self.status = format!("Error: {e}");
                        return;
                    }
                };
                match aggregate(&feed.entries, range) {
                    Ok(result) => {
                        self.status = format!(
                            "{} episodes between {} and {}",
                            result.episode_count, range.from, range.to
                        );
                        self.summary = Some(result);
                    }
                    Err(e) => self.status = format!("Error: {e}"),
                }
            }
        }

        if !self.rows.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.list_state.selected().and_then(|i| self.rows.get(i))
    }

    pub fn open_selected_audio(&self) -> Action {
        self.selected_row()
            .and_then(|row| row.audio.as_ref())
            .map_or(Action::None, |audio| Action::OpenAudio(audio.href.clone()))
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.rows.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.rows.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.rows.is_empty() {
            self.list_state.select(Some(self.rows.len() - 1));
        }
    }
}

pub fn today_in_jst() -> NaiveDate {
    Utc::now().with_timezone(&jst()).date_naive()
}

/// Episode window from the List fields.  Blank fields take the defaults.
fn parse_window(inputs: &Inputs, total: usize) -> Result<EpisodeWindow, String> {
    let defaults = EpisodeWindow::latest(total);
    let parse = |raw: &str, default: usize| -> Result<usize, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(default);
        }
        raw.parse()
            .map_err(|_| format!("episode number must be a positive integer, got {raw:?}"))
    };
    Ok(EpisodeWindow::new(
        parse(&inputs.newest, defaults.newest)?,
        parse(&inputs.oldest, defaults.oldest)?,
    ))
}

fn parse_range(inputs: &Inputs) -> Result<DateRange, String> {
    let parse = |raw: &str| {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| format!("dates must look like YYYY-MM-DD, got {raw:?}"))
    };
    Ok(DateRange::new(parse(&inputs.from_date)?, parse(&inputs.to_date)?))
}
