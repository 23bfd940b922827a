//! Bookable start times for one service on one date.
//!
//! For each window that applies on the date, candidates are walked from the
//! window start (or from "now" rounded up to the step, when the date is today)
//! in fixed steps. A candidate is offered when the whole service fits inside
//! the window and it does not intersect any booked interval.
//!
//! The walk keeps the window's own phase: a window opening at 08:10 offers
//! 08:10, 08:25, … rather than snapping to the quarter hour.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, warn};

use crate::availability::{resolve_windows, Availability, DailyWindow};
use crate::config::{MalformedTimePolicy, SchedulerConfig, SlotOrder};
use crate::conflict::{anchor_all, overlaps, BookedInterval, Interval};
use crate::time::{at_minutes, format_time_label, round_up_to_interval, same_local_day};

/// A start time the caller may offer. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CandidateSlot {
    pub start: NaiveDateTime,
    pub duration_minutes: u32,
}

impl CandidateSlot {
    pub fn end(&self) -> NaiveDateTime {
        self.interval().end
    }

    pub fn interval(&self) -> Interval {
        Interval::from_start(self.start, self.duration_minutes)
    }

    /// `"h:mm AM/PM"`, the form shown to customers and stored on bookings.
    pub fn label(&self) -> String {
        format_time_label(&self.start)
    }
}

/// Slot generation with a fixed [`SchedulerConfig`].
///
/// Generation is a pure function of its arguments: no clock reads, no I/O,
/// no shared state. Callers pass a fresh snapshot of bookings on every call.
#[derive(Debug, Clone, Default)]
pub struct SlotGenerator {
    config: SchedulerConfig,
}

impl SlotGenerator {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Candidate slots for a service of `duration_minutes` on `date`.
    ///
    /// `availability` of `None` means the business has configured nothing and
    /// the fallback window applies. Malformed windows contribute nothing; the
    /// remaining windows are still walked. A zero duration or step yields no
    /// slots.
    pub fn generate(
        &self,
        date: NaiveDate,
        duration_minutes: u32,
        availability: Option<&Availability>,
        booked: &[BookedInterval],
        now: NaiveDateTime,
    ) -> Vec<CandidateSlot> {
        let step_minutes = self.config.step_minutes;
        if duration_minutes == 0 || step_minutes == 0 {
            debug!(duration_minutes, step_minutes, "nothing to generate");
            return Vec::new();
        }

        let windows = resolve_windows(availability, date, &self.config.fallback_window);
        let busy = anchor_all(booked, date, self.config.default_booked_duration_minutes);

        let is_today = same_local_day(&date, &now);
        let earliest = is_today.then(|| round_up_to_interval(now, step_minutes));
        let duration = Duration::minutes(i64::from(duration_minutes));
        let step = Duration::minutes(i64::from(step_minutes));

        let mut slots = Vec::new();
        for window in &windows {
            let Some((open, close)) = self.window_bounds(window) else {
                continue;
            };
            let window_start = at_minutes(date, open);
            let window_end = at_minutes(date, close);

            let mut cursor = match earliest {
                Some(earliest) => window_start.max(earliest),
                None => window_start,
            };

            while cursor < window_end {
                // No partial slots at the tail.
                let Some(slot_end) = cursor.checked_add_signed(duration).filter(|end| *end <= window_end)
                else {
                    break;
                };

                let already_over = is_today && slot_end < now;
                if !already_over && !overlaps(cursor, slot_end, &busy) {
                    slots.push(CandidateSlot {
                        start: cursor,
                        duration_minutes,
                    });
                }

                match cursor.checked_add_signed(step) {
                    Some(next) => cursor = next,
                    None => break,
                }
            }
        }

        if self.config.slot_order == SlotOrder::Chronological {
            slots.sort();
            slots.dedup();
        }

        debug!(
            %date,
            duration_minutes,
            windows = windows.len(),
            booked = busy.len(),
            slots = slots.len(),
            "generated slots"
        );
        slots
    }

    /// [`SlotGenerator::generate`] rendered as `"h:mm AM/PM"` labels.
    pub fn labels(
        &self,
        date: NaiveDate,
        duration_minutes: u32,
        availability: Option<&Availability>,
        booked: &[BookedInterval],
        now: NaiveDateTime,
    ) -> Vec<String> {
        self.generate(date, duration_minutes, availability, booked, now)
            .iter()
            .map(CandidateSlot::label)
            .collect()
    }

    fn window_bounds(&self, window: &DailyWindow) -> Option<(u32, u32)> {
        match self.config.malformed_times {
            MalformedTimePolicy::TreatAsMidnight => Some(window.lenient_bounds()),
            MalformedTimePolicy::SkipWindow => match window.bounds() {
                Ok(bounds) => Some(bounds),
                Err(e) => {
                    warn!(start = %window.start, end = %window.end, error = %e, "skipping window");
                    None
                }
            },
        }
    }
}

/// Bookable start times as `"h:mm AM/PM"` labels, using default settings and
/// the given step.
///
/// ```rust
/// use chrono::NaiveDate;
/// use slot_engine::generate_slots;
///
/// let monday = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
/// let now = monday.and_hms_opt(7, 0, 0).unwrap();
/// let slots = generate_slots(monday, 60, None, &[], now, 15);
/// // Fallback hours are 08:00–18:00.
/// assert_eq!(slots.first().map(String::as_str), Some("8:00 AM"));
/// assert_eq!(slots.last().map(String::as_str), Some("5:00 PM"));
/// ```
pub fn generate_slots(
    date: NaiveDate,
    service_duration_minutes: u32,
    availability: Option<&Availability>,
    booked: &[BookedInterval],
    now: NaiveDateTime,
    step_minutes: u32,
) -> Vec<String> {
    let generator = SlotGenerator::new(SchedulerConfig {
        step_minutes,
        ..SchedulerConfig::default()
    });
    generator.labels(date, service_duration_minutes, availability, booked, now)
}
