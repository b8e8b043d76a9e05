//! Total listening time over a date range.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime};

use super::duration::{format_hms, parse_duration};
use super::resolve::{jst, resolve_published};
use super::{FeedEntry, QueryError};

/// Playback speed the adjusted total assumes, as a ratio (1.3 = 13 / 10).
const SPEED_NUM: u64 = 13;
const SPEED_DEN: u64 = 10;

/// Inclusive calendar-date range, interpreted in UTC+9.
///
/// `from` expands to `00:00:00` and `to` to `23:59:59` of that offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Whether `instant` lies within `[from 00:00:00, to 23:59:59]` (UTC+9).
    pub fn contains(&self, instant: &DateTime<FixedOffset>) -> bool {
        let local = instant.with_timezone(&jst()).naive_local();
        let start = self.from.and_time(NaiveTime::MIN);
        let end = self.to.and_time(NaiveTime::MIN) + Duration::seconds(86_399);
        start <= local && local <= end
    }
}

/// Outcome of [`aggregate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationResult {
    pub total_seconds: u64,
    pub episode_count: usize,
    /// `floor(total_seconds / 1.3)`.
    pub adjusted_seconds: u64,
}

impl AggregationResult {
    fn from_total(total_seconds: u64, episode_count: usize) -> Self {
        Self {
            total_seconds,
            episode_count,
            // floor(total * DEN / NUM), split so the multiplication cannot overflow.
            adjusted_seconds: total_seconds / SPEED_NUM * SPEED_DEN
                + total_seconds % SPEED_NUM * SPEED_DEN / SPEED_NUM,
        }
    }

    /// Total as `HH:MM:SS`.
    pub fn total_hms(&self) -> String {
        format_hms(self.total_seconds)
    }

    /// Speed-adjusted total as `HH:MM:SS`.
    pub fn adjusted_hms(&self) -> String {
        format_hms(self.adjusted_seconds)
    }

    /// `"1 episode"`, `"3 episodes"`.
    pub fn episodes_label(&self) -> String {
        match self.episode_count {
            1 => "1 episode".to_string(),
            n => format!("{n} episodes"),
        }
    }
}

/// Sum the durations of every entry published within `range`.
///
/// Entries are walked oldest to newest (feeds are newest-first).  Any
/// included entry without a parsable duration fails the whole call with
/// [`QueryError::InvalidFormat`], and an entry whose publish date cannot be
/// read fails it with [`QueryError::MissingField`]: there are no partial sums.
pub fn aggregate(entries: &[FeedEntry], range: DateRange) -> Result<AggregationResult, QueryError> {
    let mut total: u64 = 0;
    let mut count = 0;

    for entry in entries.iter().rev() {
        let published = resolve_published(entry)?;
        if !range.contains(&published) {
            continue;
        }

        let seconds = match entry.duration.as_deref() {
            Some(raw) => parse_duration(raw)?,
            None => return Err(QueryError::InvalidFormat(String::new())),
        };
        total = total
            .checked_add(seconds)
            .ok_or_else(|| QueryError::InvalidFormat(entry.duration.clone().unwrap_or_default()))?;
        count += 1;
    }

    let result = AggregationResult::from_total(total, count);
    tracing::debug!(
        from = %range.from,
        to = %range.to,
        episodes = result.episode_count,
        total_seconds = result.total_seconds,
        "aggregated durations"
    );
    Ok(result)
}
