//! History record and timestamp handling

use crate::error::{Result, SleepError};
use crate::model::PredictionInput;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;

/// Minute-resolution local timestamp, e.g. `2024-03-09 22:15`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Source of the current time
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// One persisted submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    /// Formatted with [`TIMESTAMP_FORMAT`]
    pub timestamp: String,
    pub input: PredictionInput,
    pub score: f64,
}

impl HistoryRecord {
    /// Record for `input` and `score`, stamped with `clock`
    pub fn stamped(input: &PredictionInput, score: f64, clock: &dyn Clock) -> Self {
        Self {
            timestamp: format_timestamp(&clock.now()),
            input: *input,
            score,
        }
    }
}

pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Strict parse of a [`TIMESTAMP_FORMAT`] string
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|e| SleepError::Format {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
