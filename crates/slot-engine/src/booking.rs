//! Appointment records and the checks around writing one.
//!
//! Persistence is not done here. These helpers turn stored appointments into
//! the booked-interval snapshot the generator needs, split a customer's list
//! into upcoming and past, and vet a booking request before the caller writes
//! it.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::availability::Availability;
use crate::conflict::BookedInterval;
use crate::error::{Result, SchedulerError};
use crate::service::{find_service, Service};
use crate::slots::SlotGenerator;
use crate::time::{
    at_minutes, format_time_label, parse_minutes_of_day, time_from_minutes, try_parse_minutes_of_day,
};

/// A stored appointment as the client reads it back.
///
/// `time` is kept as written (`"h:mm AM/PM"` for new records, `"HH:mm"` on
/// some older ones).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub service: String,
    #[serde(rename = "duration", default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Appointment {
    /// Local start. An unreadable `time` is read as midnight, matching how
    /// legacy records were always ordered.
    pub fn starts_at(&self) -> NaiveDateTime {
        at_minutes(self.date, parse_minutes_of_day(&self.time))
    }

    pub fn is_completed(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("completed"))
    }

    /// Records without an `active` flag count as active.
    pub fn is_active(&self) -> bool {
        self.active != Some(false)
    }

    pub fn booked_interval(&self) -> BookedInterval {
        let start = time_from_minutes(parse_minutes_of_day(&self.time)).unwrap_or(NaiveTime::MIN);
        BookedInterval::new(start, self.duration_minutes)
    }
}

/// Booked intervals on `date`, skipping the appointment being edited so it
/// can keep its own time.
pub fn booked_intervals_for(
    appointments: &[Appointment],
    date: NaiveDate,
    editing_id: Option<&str>,
) -> Vec<BookedInterval> {
    appointments
        .iter()
        .filter(|a| a.date == date)
        .filter(|a| editing_id.is_none() || a.id.as_deref() != editing_id)
        .map(Appointment::booked_interval)
        .collect()
}

/// A customer's appointments split around "now".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentPartition {
    /// Soonest first.
    pub upcoming: Vec<Appointment>,
    /// Most recent first.
    pub past: Vec<Appointment>,
}

/// Split appointments into upcoming and past.
///
/// Past means it started before `now`, was deactivated, or is marked
/// completed. Everything else is upcoming; no record lands in both lists,
/// so a completed appointment dated in the future shows only under past.
pub fn partition_appointments(appointments: &[Appointment], now: NaiveDateTime) -> AppointmentPartition {
    let (mut past, mut upcoming): (Vec<Appointment>, Vec<Appointment>) = appointments
        .iter()
        .cloned()
        .partition(|a| a.starts_at() < now || !a.is_active() || a.is_completed());

    upcoming.sort_by_key(Appointment::starts_at);
    past.sort_by_key(|a| std::cmp::Reverse(a.starts_at()));

    AppointmentPartition { upcoming, past }
}

/// What a customer (or staff member) submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingRequest {
    pub service: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub note: Option<String>,
}

/// Vet a booking request against the catalog and the current snapshot.
///
/// The requested time must be one the generator would offer right now: inside
/// a window, not in the past, and clear of `booked`. On success the returned
/// appointment is ready to persist, with its time normalized to
/// `"h:mm AM/PM"`.
///
/// This is a courtesy check. Two callers can both pass it for the same slot;
/// the store must refuse the second write (see [`crate::ledger`]).
///
/// # Errors
/// `MissingField` for an absent service, date or time; `UnknownService`;
/// `InvalidTime` for an unreadable time; `SlotUnavailable` when the time is
/// not offered.
pub fn validate_booking(
    request: &BookingRequest,
    services: &[Service],
    availability: Option<&Availability>,
    booked: &[BookedInterval],
    now: NaiveDateTime,
    generator: &SlotGenerator,
) -> Result<Appointment> {
    let service_name = request
        .service
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(SchedulerError::MissingField("service"))?;
    let date = request.date.ok_or(SchedulerError::MissingField("date"))?;
    let time = request
        .time
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(SchedulerError::MissingField("time"))?;

    let service = find_service(services, service_name)
        .ok_or_else(|| SchedulerError::UnknownService(service_name.to_string()))?;

    let start = at_minutes(date, try_parse_minutes_of_day(time)?);
    let label = format_time_label(&start);

    let offered = generator
        .generate(date, service.duration_minutes, availability, booked, now)
        .iter()
        .any(|slot| slot.start == start);
    if !offered {
        debug!(%date, time = %label, service = %service.name, "requested time not offered");
        return Err(SchedulerError::SlotUnavailable { date, time: label });
    }

    Ok(Appointment {
        id: None,
        service: service.name.clone(),
        duration_minutes: Some(service.duration_minutes),
        date,
        time: label,
        note: request
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        active: None,
        status: None,
    })
}
