//! Business availability: recurring weekly windows plus blackout dates.
//!
//! A business either has an [`Availability`] record or it does not. The two
//! cases resolve differently:
//!
//! - no record at all: every day gets the fallback window (08:00–18:00);
//! - a record whose weekday list is empty: that weekday is closed, even though
//!   a fallback exists.
//!
//! Blackout dates close a calendar date outright, whatever the weekly windows
//! say.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SchedulerError};
use crate::time::{parse_minutes_of_day, try_parse_minutes_of_day, MINUTES_PER_DAY};

/// Opening time of a window added from scratch and of the default week.
pub const DEFAULT_OPEN: &str = "09:00";
/// Closing time of a window added from scratch and of the default week.
pub const DEFAULT_CLOSE: &str = "17:00";

const FALLBACK_OPEN: &str = "08:00";
const FALLBACK_CLOSE: &str = "18:00";

/// One open interval within a day, as `"HH:mm"` 24-hour local times.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DailyWindow {
    pub start: String,
    pub end: String,
}

impl DailyWindow {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// The window used when a business has configured nothing.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_OPEN, FALLBACK_CLOSE)
    }

    /// Start and end as minutes since midnight.
    ///
    /// # Errors
    /// `SchedulerError::InvalidTime` if either side does not parse,
    /// `SchedulerError::InvalidWindow` if the window is empty or inverted.
    pub fn bounds(&self) -> Result<(u32, u32)> {
        let start = try_parse_minutes_of_day(&self.start)?;
        let end = parse_window_end(&self.end)?;
        if start >= end {
            return Err(SchedulerError::InvalidWindow {
                start: self.start.clone(),
                end: self.end.clone(),
            });
        }
        Ok((start, end))
    }

    /// Start and end with unparseable values read as midnight. No ordering
    /// check: an inverted window simply yields nothing downstream.
    pub fn lenient_bounds(&self) -> (u32, u32) {
        let end = parse_window_end(&self.end).unwrap_or_else(|_| parse_minutes_of_day(&self.end));
        (parse_minutes_of_day(&self.start), end)
    }
}

/// A window may close at `"24:00"`, the end of the day.
fn parse_window_end(text: &str) -> Result<u32> {
    if text.trim() == "24:00" {
        return Ok(MINUTES_PER_DAY);
    }
    try_parse_minutes_of_day(text)
}

/// Weekday index used in stored records: 0 = Sunday … 6 = Saturday.
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

/// Weekday → windows. Keys are [`weekday_index`] values; in JSON they appear
/// as `"0"` … `"6"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyAvailability(BTreeMap<u8, Vec<DailyWindow>>);

impl WeeklyAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Windows declared for `weekday`, in declaration order. `None` means the
    /// weekday was never configured; `Some(&[])` means it is closed.
    pub fn get(&self, weekday: Weekday) -> Option<&[DailyWindow]> {
        self.0.get(&weekday_index(weekday)).map(Vec::as_slice)
    }

    pub fn set(&mut self, weekday: Weekday, windows: Vec<DailyWindow>) {
        self.0.insert(weekday_index(weekday), windows);
    }

    fn day_mut(&mut self, weekday: Weekday) -> &mut Vec<DailyWindow> {
        self.0.entry(weekday_index(weekday)).or_default()
    }

    fn existing_day_mut(&mut self, weekday: Weekday) -> Option<&mut Vec<DailyWindow>> {
        self.0.get_mut(&weekday_index(weekday))
    }

    /// Iterate configured weekdays from Sunday to Saturday.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[DailyWindow])> {
        self.0.iter().filter_map(|(idx, windows)| {
            weekday_from_index(*idx).map(|day| (day, windows.as_slice()))
        })
    }
}

impl FromIterator<(Weekday, Vec<DailyWindow>)> for WeeklyAvailability {
    fn from_iter<I: IntoIterator<Item = (Weekday, Vec<DailyWindow>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(day, windows)| (weekday_index(day), windows))
                .collect(),
        )
    }
}

fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// An invalid window found by [`Availability::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowIssue {
    pub weekday: Weekday,
    pub index: usize,
    pub error: SchedulerError,
}

/// A business's bookable hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    /// A record written before any hours were set has no `weekly` at all;
    /// every weekday then falls back.
    #[serde(default)]
    pub weekly: WeeklyAvailability,
    #[serde(default)]
    pub blackout_dates: BTreeSet<NaiveDate>,
}

impl Default for Availability {
    /// Monday to Friday 09:00–17:00, weekends closed, no blackout dates.
    fn default() -> Self {
        let weekly = [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ]
        .into_iter()
        .map(|day| {
            let windows = match day {
                Weekday::Sat | Weekday::Sun => Vec::new(),
                _ => vec![DailyWindow::new(DEFAULT_OPEN, DEFAULT_CLOSE)],
            };
            (day, windows)
        })
        .collect();

        Self {
            weekly,
            blackout_dates: BTreeSet::new(),
        }
    }
}

impl Availability {
    pub fn is_blackout(&self, date: NaiveDate) -> bool {
        self.blackout_dates.contains(&date)
    }

    /// Append a 09:00–17:00 window to `weekday`.
    pub fn add_window(&mut self, weekday: Weekday) {
        self.weekly
            .day_mut(weekday)
            .push(DailyWindow::new(DEFAULT_OPEN, DEFAULT_CLOSE));
    }

    /// Remove the window at `index`, returning it. Out-of-range is a no-op.
    pub fn remove_window(&mut self, weekday: Weekday, index: usize) -> Option<DailyWindow> {
        let windows = self.weekly.existing_day_mut(weekday)?;
        (index < windows.len()).then(|| windows.remove(index))
    }

    /// Replace the window at `index`, returning the previous value.
    pub fn update_window(
        &mut self,
        weekday: Weekday,
        index: usize,
        window: DailyWindow,
    ) -> Option<DailyWindow> {
        self.weekly
            .existing_day_mut(weekday)?
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, window))
    }

    /// Returns `false` if the date was already blacked out.
    pub fn add_blackout(&mut self, date: NaiveDate) -> bool {
        self.blackout_dates.insert(date)
    }

    pub fn remove_blackout(&mut self, date: NaiveDate) -> bool {
        self.blackout_dates.remove(&date)
    }

    /// Blackout dates in calendar order.
    pub fn blackouts(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.blackout_dates.iter().copied()
    }

    /// Every window that cannot produce slots, in weekday then declaration
    /// order. An empty result means the record is clean.
    pub fn validate(&self) -> Vec<WindowIssue> {
        self.weekly
            .iter()
            .flat_map(|(weekday, windows)| {
                windows.iter().enumerate().filter_map(move |(index, window)| {
                    window.bounds().err().map(|error| WindowIssue {
                        weekday,
                        index,
                        error,
                    })
                })
            })
            .collect()
    }
}

/// Windows that apply on `date`, using the standard 08:00–18:00 fallback when
/// no availability is configured.
pub fn windows_for(availability: Option<&Availability>, date: NaiveDate) -> Vec<DailyWindow> {
    resolve_windows(availability, date, &DailyWindow::fallback())
}

/// [`windows_for`] with a caller-chosen fallback window.
pub fn resolve_windows(
    availability: Option<&Availability>,
    date: NaiveDate,
    fallback: &DailyWindow,
) -> Vec<DailyWindow> {
    let Some(availability) = availability else {
        return vec![fallback.clone()];
    };

    if availability.is_blackout(date) {
        debug!(%date, "blackout date, no windows");
        return Vec::new();
    }

    match availability.weekly.get(date.weekday()) {
        Some(windows) => windows.to_vec(),
        None => vec![fallback.clone()],
    }
}
