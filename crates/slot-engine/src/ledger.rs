//! In-memory booking store with an atomic check-then-insert.
//!
//! Reading a snapshot, generating slots and then writing is racy: two
//! customers can see the same free slot. The ledger closes that gap by
//! re-checking for overlap under the write lock, so the second of two
//! overlapping writes fails with `SchedulerError::SlotTaken`. A persistent
//! store should enforce the same rule (a uniqueness constraint or a
//! transactional check keyed on business + date).

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{NaiveDate, NaiveTime};

use crate::config::DEFAULT_BOOKED_DURATION_MINUTES;
use crate::conflict::{anchor_all, BookedInterval};
use crate::error::{Result, SchedulerError};
use crate::time::format_time_label;

type DayKey = (String, NaiveDate);

/// Bookings per business per date.
#[derive(Debug)]
pub struct InMemoryLedger {
    default_duration_minutes: u32,
    days: RwLock<HashMap<DayKey, Vec<BookedInterval>>>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(DEFAULT_BOOKED_DURATION_MINUTES)
    }
}

impl InMemoryLedger {
    /// `default_duration_minutes` is the length assumed for bookings stored
    /// without one.
    pub fn new(default_duration_minutes: u32) -> Self {
        Self {
            default_duration_minutes,
            days: RwLock::new(HashMap::new()),
        }
    }

    /// Current bookings for `business` on `date`, in insertion order.
    pub fn snapshot(&self, business: &str, date: NaiveDate) -> Vec<BookedInterval> {
        let days = self.days.read().unwrap_or_else(PoisonError::into_inner);
        days.get(&(business.to_string(), date))
            .cloned()
            .unwrap_or_default()
    }

    /// Record `booking` unless it overlaps something already on the books.
    ///
    /// # Errors
    /// `SchedulerError::SlotTaken` when an overlapping booking exists.
    pub fn try_book(&self, business: &str, date: NaiveDate, booking: BookedInterval) -> Result<()> {
        let mut days = self.days.write().unwrap_or_else(PoisonError::into_inner);
        let day = days.entry((business.to_string(), date)).or_default();

        let candidate = booking.anchor(date, self.default_duration_minutes);
        let taken = anchor_all(day, date, self.default_duration_minutes)
            .iter()
            .any(|existing| existing.overlaps(&candidate));
        if taken {
            return Err(SchedulerError::SlotTaken {
                date,
                time: format_time_label(&booking.start),
            });
        }

        day.push(booking);
        Ok(())
    }

    /// Remove the booking starting at `start`. Returns `false` if none did.
    pub fn cancel(&self, business: &str, date: NaiveDate, start: NaiveTime) -> bool {
        let mut days = self.days.write().unwrap_or_else(PoisonError::into_inner);
        let Some(day) = days.get_mut(&(business.to_string(), date)) else {
            return false;
        };
        let before = day.len();
        day.retain(|b| b.start != start);
        day.len() != before
    }
}
