//! Booking conflict detection.
//!
//! Intervals are half-open: `[start, end)`. Two intervals conflict when
//! `a.start < b.end && b.start < a.end`. That single inequality covers a
//! candidate starting inside a booking, ending inside it, and swallowing it
//! whole. Adjacent intervals (one ends exactly when the next starts) are NOT
//! conflicts.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::time::clock_serde;

/// A half-open span of local time on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn from_start(start: NaiveDateTime, duration_minutes: u32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(i64::from(duration_minutes)),
        }
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Minutes shared with `other`; zero when they do not overlap.
    pub fn overlap_minutes(&self, other: &Interval) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end - start).num_minutes()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// An existing appointment on the target date, as read from storage.
///
/// In JSON the start is `time` (either clock style) and the length is
/// `duration`, which may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedInterval {
    #[serde(rename = "time", with = "clock_serde")]
    pub start: NaiveTime,
    #[serde(
        rename = "duration",
        alias = "durationMinutes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_minutes: Option<u32>,
}

impl BookedInterval {
    pub fn new(start: NaiveTime, duration_minutes: Option<u32>) -> Self {
        Self {
            start,
            duration_minutes,
        }
    }

    /// Length in minutes. A missing or zero duration falls back to
    /// `default_minutes`.
    pub fn effective_duration(&self, default_minutes: u32) -> u32 {
        match self.duration_minutes {
            Some(minutes) if minutes > 0 => minutes,
            _ => default_minutes,
        }
    }

    /// Place this booking on `date`.
    pub fn anchor(&self, date: NaiveDate, default_minutes: u32) -> Interval {
        Interval::from_start(date.and_time(self.start), self.effective_duration(default_minutes))
    }
}

/// Anchor every booking on `date`.
pub fn anchor_all(booked: &[BookedInterval], date: NaiveDate, default_minutes: u32) -> Vec<Interval> {
    booked
        .iter()
        .map(|b| b.anchor(date, default_minutes))
        .collect()
}

/// Does `[candidate_start, candidate_end)` intersect any booked interval?
pub fn overlaps(
    candidate_start: NaiveDateTime,
    candidate_end: NaiveDateTime,
    booked: &[Interval],
) -> bool {
    let candidate = Interval::new(candidate_start, candidate_end);
    booked.iter().any(|b| candidate.overlaps(b))
}

/// A detected conflict between two intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub interval_a: Interval,
    pub interval_b: Interval,
    pub overlap_minutes: i64,
}

/// Find all pairwise conflicts between two interval lists.
///
/// The overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_conflicts(intervals_a: &[Interval], intervals_b: &[Interval]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for a in intervals_a {
        for b in intervals_b {
            if a.overlaps(b) {
                conflicts.push(Conflict {
                    interval_a: *a,
                    interval_b: *b,
                    overlap_minutes: a.overlap_minutes(b),
                });
            }
        }
    }

    conflicts
}
