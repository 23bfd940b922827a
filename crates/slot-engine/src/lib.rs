//! # slot-engine
//!
//! Deterministic appointment slot generation and booking conflict detection.
//!
//! A business publishes weekly opening windows, blackout dates and a service
//! catalog. Given a service, a date, the bookings already on that date and the
//! current time, the engine lists every start time a customer may book: the
//! whole service must fit inside an open window, must not intersect an
//! existing booking, and must not already be in the past.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use slot_engine::{generate_slots, Availability};
//!
//! let availability = Availability::default(); // Mon–Fri 09:00–17:00
//! let monday = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
//! let now = NaiveDate::from_ymd_opt(2026, 3, 13).unwrap().and_hms_opt(12, 0, 0).unwrap();
//!
//! let slots = generate_slots(monday, 60, Some(&availability), &[], now, 15);
//! assert_eq!(slots.len(), 29);
//! assert_eq!(slots[0], "9:00 AM");
//! assert_eq!(slots[28], "4:00 PM");
//! ```
//!
//! ## Modules
//!
//! - [`time`] — minute-of-day parsing, labels, date formatting, rounding
//! - [`availability`] — weekly windows, blackout dates, window resolution
//! - [`slots`] — the slot generator
//! - [`conflict`] — half-open interval overlap and conflict reporting
//! - [`service`] — service catalog entries
//! - [`booking`] — appointment records, upcoming/past split, booking checks
//! - [`ledger`] — in-memory store with atomic check-then-insert
//! - [`config`] — scheduler tunables
//! - [`error`] — Error types

pub mod availability;
pub mod booking;
pub mod config;
pub mod conflict;
pub mod error;
pub mod ledger;
pub mod service;
pub mod slots;
pub mod time;

pub use availability::{windows_for, Availability, DailyWindow, WeeklyAvailability};
pub use booking::{partition_appointments, validate_booking, Appointment, BookingRequest};
pub use config::SchedulerConfig;
pub use conflict::{find_conflicts, overlaps, BookedInterval, Interval};
pub use error::SchedulerError;
pub use ledger::InMemoryLedger;
pub use service::Service;
pub use slots::{generate_slots, CandidateSlot, SlotGenerator};
