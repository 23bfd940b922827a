//! Error types for slot-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Invalid time: {0:?}")]
    InvalidTime(String),

    #[error("Invalid window: {start}-{end} (start must be before end)")]
    InvalidWindow { start: String, end: String },

    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    #[error("Invalid duration: {0} minutes")]
    InvalidDuration(u32),

    #[error("Invalid step: {0} minutes")]
    InvalidStep(u32),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The requested start time is not among the slots offered for that date.
    #[error("{time} on {date} is not available")]
    SlotUnavailable { date: NaiveDate, time: String },

    /// A write lost the race against an overlapping booking.
    #[error("{time} on {date} overlaps an existing booking")]
    SlotTaken { date: NaiveDate, time: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
