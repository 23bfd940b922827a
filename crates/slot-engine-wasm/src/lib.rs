//! WASM bindings for slot-engine.
//!
//! Exposes slot generation, window resolution, the booking overlap check and
//! booking validation to the web client via `wasm-bindgen`. Everything crosses
//! the boundary as JSON strings; errors come back as string `JsValue`s.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use slot_engine::conflict::anchor_all;
use slot_engine::time::{format_local_date, format_time_label, parse_local_date};
use slot_engine::{
    Availability, BookedInterval, BookingRequest, CandidateSlot, DailyWindow, SchedulerConfig,
    Service, SlotGenerator,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotDto {
    time: String,
    start: String,
    end: String,
    duration_minutes: u32,
}

impl From<&CandidateSlot> for SlotDto {
    fn from(slot: &CandidateSlot) -> Self {
        Self {
            time: slot.label(),
            start: slot.start.format(ISO_LOCAL).to_string(),
            end: slot.end().format(ISO_LOCAL).to_string(),
            duration_minutes: slot.duration_minutes,
        }
    }
}

/// Input for `generateSlots`.
///
/// Either `durationMinutes` or `service` (looked up in `services`) must be
/// given. `availability` may be `null` for a business that has configured
/// nothing.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateInput {
    date: String,
    #[serde(default)]
    duration_minutes: Option<u32>,
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    services: Vec<Service>,
    #[serde(default)]
    availability: Option<Availability>,
    #[serde(default)]
    booked: Vec<BookedInterval>,
    now: String,
    #[serde(default)]
    config: Option<SchedulerConfig>,
}

/// Input for `validateBooking`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateInput {
    request: BookingRequest,
    services: Vec<Service>,
    #[serde(default)]
    availability: Option<Availability>,
    #[serde(default)]
    booked: Vec<BookedInterval>,
    now: String,
    #[serde(default)]
    config: Option<SchedulerConfig>,
}

const ISO_LOCAL: &str = "%Y-%m-%dT%H:%M:%S";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse the caller's "now".
///
/// Accepts RFC 3339 (the offset is dropped and the wall-clock reading kept,
/// since slots are computed in the business's local time) and naive local
/// datetimes such as "2026-03-16T14:32:00".
fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    s.parse::<NaiveDateTime>()
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    parse_local_date(s).map_err(|e| e.to_string())
}

fn generator_for(config: Option<SchedulerConfig>) -> Result<SlotGenerator, String> {
    let config = config.unwrap_or_default();
    config.validate().map_err(|e| e.to_string())?;
    Ok(SlotGenerator::new(config))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Boundary-free implementations
// ---------------------------------------------------------------------------

fn generate_slots_impl(request_json: &str) -> Result<String, String> {
    let input: GenerateInput = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid request JSON: {}", e))?;

    let date = parse_date(&input.date)?;
    let now = parse_now(&input.now)?;
    let duration = match (input.duration_minutes, input.service.as_deref()) {
        (Some(minutes), _) => minutes,
        (None, Some(name)) => slot_engine::service::find_service(&input.services, name)
            .map(|s| s.duration_minutes)
            .ok_or_else(|| slot_engine::SchedulerError::UnknownService(name.to_string()).to_string())?,
        (None, None) => {
            return Err(slot_engine::SchedulerError::MissingField("durationMinutes").to_string())
        }
    };

    let generator = generator_for(input.config)?;
    let slots = generator.generate(date, duration, input.availability.as_ref(), &input.booked, now);

    let dtos: Vec<SlotDto> = slots.iter().map(SlotDto::from).collect();
    to_json(&dtos)
}

fn windows_for_impl(availability_json: &str, date: &str) -> Result<String, String> {
    let availability: Option<Availability> = serde_json::from_str(availability_json)
        .map_err(|e| format!("Invalid availability JSON: {}", e))?;
    let date = parse_date(date)?;

    let windows: Vec<DailyWindow> = slot_engine::windows_for(availability.as_ref(), date);
    to_json(&windows)
}

fn overlaps_impl(candidate_json: &str, booked_json: &str, date: &str) -> Result<bool, String> {
    let candidate: BookedInterval = serde_json::from_str(candidate_json)
        .map_err(|e| format!("Invalid candidate JSON: {}", e))?;
    let booked: Vec<BookedInterval> = serde_json::from_str(booked_json)
        .map_err(|e| format!("Invalid booked JSON: {}", e))?;
    let date = parse_date(date)?;

    let default_minutes = SchedulerConfig::default().default_booked_duration_minutes;
    let candidate = candidate.anchor(date, default_minutes);
    let busy = anchor_all(&booked, date, default_minutes);
    Ok(slot_engine::overlaps(candidate.start, candidate.end, &busy))
}

fn validate_booking_impl(request_json: &str) -> Result<String, String> {
    let input: ValidateInput = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid request JSON: {}", e))?;
    let now = parse_now(&input.now)?;
    let generator = generator_for(input.config)?;

    let appointment = slot_engine::validate_booking(
        &input.request,
        &input.services,
        input.availability.as_ref(),
        &input.booked,
        now,
        &generator,
    )
    .map_err(|e| e.to_string())?;

    to_json(&appointment)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Bookable slots for one service on one date.
///
/// `request_json` is an object with `date` ("YYYY-MM-DD"), `now` (ISO 8601),
/// either `durationMinutes` or `service` + `services`, and optionally
/// `availability`, `booked` and `config`. Returns a JSON array of
/// `{time, start, end, durationMinutes}` objects, where `time` is the
/// "h:mm AM/PM" label.
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots(request_json: &str) -> Result<String, JsValue> {
    generate_slots_impl(request_json).map_err(|e| JsValue::from_str(&e))
}

/// Windows that apply on `date` ("YYYY-MM-DD").
///
/// `availability_json` is an availability record or `null`. Returns a JSON
/// array of `{start, end}` objects; empty for blackout or closed days.
#[wasm_bindgen(js_name = "windowsFor")]
pub fn windows_for(availability_json: &str, date: &str) -> Result<String, JsValue> {
    windows_for_impl(availability_json, date).map_err(|e| JsValue::from_str(&e))
}

/// Does the candidate `{time, duration}` intersect any of the booked
/// `[{time, duration}]` on `date`?
#[wasm_bindgen(js_name = "overlaps")]
pub fn overlaps(candidate_json: &str, booked_json: &str, date: &str) -> Result<bool, JsValue> {
    overlaps_impl(candidate_json, booked_json, date).map_err(|e| JsValue::from_str(&e))
}

/// Check a booking request and return the appointment to persist.
///
/// `request_json` carries `request` (`{service, date, time, note}`),
/// `services`, `now`, and optionally `availability`, `booked` and `config`.
#[wasm_bindgen(js_name = "validateBooking")]
pub fn validate_booking(request_json: &str) -> Result<String, JsValue> {
    validate_booking_impl(request_json).map_err(|e| JsValue::from_str(&e))
}

/// Format a date the way stored records key them.
#[wasm_bindgen(js_name = "formatLocalDate")]
pub fn format_date(date: &str) -> Result<String, JsValue> {
    parse_date(date)
        .map(|d| format_local_date(&d))
        .map_err(|e| JsValue::from_str(&e))
}

/// Normalize a clock string ("14:30" or "2:30 PM") to "h:mm AM/PM".
#[wasm_bindgen(js_name = "formatTimeLabel")]
pub fn format_label(time: &str) -> Result<String, JsValue> {
    slot_engine::time::try_parse_minutes_of_day(time)
        .ok()
        .and_then(slot_engine::time::time_from_minutes)
        .map(|t: NaiveTime| format_time_label(&t))
        .ok_or_else(|| JsValue::from_str(&format!("Invalid time '{}'", time)))
}
