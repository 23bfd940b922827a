//! Local wall-clock helpers: minute-of-day parsing and formatting, calendar
//! date formatting, and rounding up to a step boundary.
//!
//! Everything here works on naive (zone-less) local values. Dates are never
//! routed through UTC, so a booking made at 23:50 stays on its own day.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{Result, SchedulerError};

/// Minutes in one day. Valid minute-of-day values are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

const NANOS_PER_MINUTE: i64 = 60 * 1_000_000_000;

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

/// Parse `"HH:mm"` (24-hour) or `"h:mm AM"` / `"h:mm PM"` into minutes since
/// local midnight.
///
/// The meridiem is case-insensitive and may be separated from the clock by any
/// amount of whitespace, including none. `12:xx AM` is just after midnight and
/// `12:xx PM` is just after noon.
///
/// # Errors
/// Returns `SchedulerError::InvalidTime` for anything else, including
/// out-of-range hours or minutes.
pub fn try_parse_minutes_of_day(text: &str) -> Result<u32> {
    let invalid = || SchedulerError::InvalidTime(text.to_string());

    let upper = text.trim().to_ascii_uppercase();
    let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
        (rest.trim_end(), Some(Meridiem::Am))
    } else if let Some(rest) = upper.strip_suffix("PM") {
        (rest.trim_end(), Some(Meridiem::Pm))
    } else {
        (upper.as_str(), None)
    };

    let (hour_text, minute_text) = clock.split_once(':').ok_or_else(invalid)?;
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(hour_text) || hour_text.len() > 2 || !is_digits(minute_text) || minute_text.len() != 2 {
        return Err(invalid());
    }

    let hour: u32 = hour_text.parse().map_err(|_| invalid())?;
    let minute: u32 = minute_text.parse().map_err(|_| invalid())?;
    if minute >= 60 {
        return Err(invalid());
    }

    let hour = match meridiem {
        None if hour < 24 => hour,
        Some(Meridiem::Am) if (1..=12).contains(&hour) => hour % 12,
        Some(Meridiem::Pm) if (1..=12).contains(&hour) => hour % 12 + 12,
        _ => return Err(invalid()),
    };

    Ok(hour * 60 + minute)
}

/// Lenient form of [`try_parse_minutes_of_day`]: unparseable input yields 0.
///
/// Kept for records written by older clients, where a bad time string was
/// read as midnight. New code paths should prefer the strict variant.
pub fn parse_minutes_of_day(text: &str) -> u32 {
    try_parse_minutes_of_day(text).unwrap_or(0)
}

/// Format minutes since midnight as zero-padded `"HH:mm"`.
///
/// Values past the end of the day wrap around.
pub fn format_minutes_of_day(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Convert minutes since midnight into a `NaiveTime`, or `None` if the value
/// is not inside a single day.
pub fn time_from_minutes(minutes: u32) -> Option<NaiveTime> {
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Human-readable 12-hour label, e.g. `"9:00 AM"` or `"12:45 PM"`.
pub fn format_time_label<T: Timelike>(time: &T) -> String {
    let (is_pm, hour) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        time.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// Round `instant` up to the next multiple of `step_minutes` counted from
/// local midnight of the same day.
///
/// An instant already on a boundary is returned unchanged (ceiling, not
/// strictly-greater). Seconds and sub-seconds count: 14:30:01 rounds to 14:45
/// with a 15-minute step. A step of zero returns the instant as-is.
///
/// A step of a day or longer has no boundary left today, so anything after
/// midnight rounds to the following midnight.
pub fn round_up_to_interval(instant: NaiveDateTime, step_minutes: u32) -> NaiveDateTime {
    if step_minutes == 0 {
        return instant;
    }
    let elapsed_nanos =
        i64::from(instant.num_seconds_from_midnight()) * 1_000_000_000 + i64::from(instant.nanosecond());

    if step_minutes >= MINUTES_PER_DAY {
        if elapsed_nanos == 0 {
            return instant;
        }
        return instant
            .date()
            .succ_opt()
            .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN));
    }

    let step_nanos = i64::from(step_minutes) * NANOS_PER_MINUTE;
    let remainder = elapsed_nanos % step_nanos;
    if remainder == 0 {
        instant
    } else {
        instant + Duration::nanoseconds(step_nanos - remainder)
    }
}

/// Local calendar date as zero-padded `"YYYY-MM-DD"`.
pub fn format_local_date<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a `"YYYY-MM-DD"` calendar date.
///
/// # Errors
/// Returns `SchedulerError::InvalidDate` if the text is not a real date.
pub fn parse_local_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| SchedulerError::InvalidDate(text.to_string()))
}

/// Year/month/day equality, ignoring the time of day.
pub fn same_local_day<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Anchor a minute-of-day on `date`.
///
/// Minute values of a full day or more spill into the following day.
pub fn at_minutes(date: NaiveDate, minutes: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minutes))
}

/// Serde adapter for a `NaiveTime` written as a clock string.
///
/// Serializes as `"h:mm AM/PM"`; deserializes from either clock style and
/// rejects anything [`try_parse_minutes_of_day`] rejects.
pub mod clock_serde {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{format_time_label, time_from_minutes, try_parse_minutes_of_day};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_time_label(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        let minutes = try_parse_minutes_of_day(&text).map_err(de::Error::custom)?;
        time_from_minutes(minutes).ok_or_else(|| de::Error::custom(format!("time out of range: {text}")))
    }
}
