//! Scheduler tunables.
//!
//! Every field has a default, so a config document only needs to name the
//! values it changes:
//!
//! ```rust
//! use slot_engine::config::{SchedulerConfig, SlotOrder};
//!
//! let config = SchedulerConfig::from_json(r#"{"slotOrder":"chronological"}"#).unwrap();
//! assert_eq!(config.step_minutes, 15);
//! assert_eq!(config.slot_order, SlotOrder::Chronological);
//! ```

use serde::{Deserialize, Serialize};

use crate::availability::DailyWindow;
use crate::error::{Result, SchedulerError};
use crate::time::MINUTES_PER_DAY;

/// Granularity at which candidate start times are tried.
pub const DEFAULT_STEP_MINUTES: u32 = 15;

/// Length assumed for a booked appointment whose record carries no duration.
pub const DEFAULT_BOOKED_DURATION_MINUTES: u32 = 30;

/// Order of the generated slot list when a day has several windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotOrder {
    /// Window by window, in the order the business declared them.
    #[default]
    Declaration,
    /// Sorted by start time, with duplicates from overlapping windows removed.
    Chronological,
}

/// What to do with a window whose start or end time does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedTimePolicy {
    /// Offer nothing from that window; other windows are unaffected.
    #[default]
    SkipWindow,
    /// Read the bad value as midnight, the way legacy clients did.
    TreatAsMidnight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    pub step_minutes: u32,
    pub default_booked_duration_minutes: u32,
    /// Window used when a business has no availability configured at all.
    pub fallback_window: DailyWindow,
    pub slot_order: SlotOrder,
    pub malformed_times: MalformedTimePolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            step_minutes: DEFAULT_STEP_MINUTES,
            default_booked_duration_minutes: DEFAULT_BOOKED_DURATION_MINUTES,
            fallback_window: DailyWindow::fallback(),
            slot_order: SlotOrder::default(),
            malformed_times: MalformedTimePolicy::default(),
        }
    }
}

impl SchedulerConfig {
    /// Parse a JSON config document and validate it.
    ///
    /// # Errors
    /// Returns `SchedulerError::Config` for malformed JSON, and the specific
    /// validation error for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SchedulerConfig =
            serde_json::from_str(json).map_err(|e| SchedulerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values can drive slot generation.
    pub fn validate(&self) -> Result<()> {
        if self.step_minutes == 0 || self.step_minutes > MINUTES_PER_DAY {
            return Err(SchedulerError::InvalidStep(self.step_minutes));
        }
        if self.default_booked_duration_minutes == 0 {
            return Err(SchedulerError::InvalidDuration(
                self.default_booked_duration_minutes,
            ));
        }
        self.fallback_window.bounds()?;
        Ok(())
    }
}
