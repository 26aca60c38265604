//! Prediction history
//!
//! Two owners for the same records:
//! - [`HistoryRecorder`] appends every submission to a durable CSV file
//! - [`SessionHistory`] keeps the current session's `{timestamp, score}`
//!   pairs in memory for charting; it is never reloaded from disk

mod record;
mod recorder;
mod session;

pub use record::{
    format_timestamp, parse_timestamp, Clock, FixedClock, HistoryRecord, SystemClock,
    TIMESTAMP_FORMAT,
};
pub use recorder::{load_history, HistoryRecorder, HISTORY_HEADER};
pub use session::{SeriesPoint, SessionEntry, SessionHistory};

#[cfg(test)]
mod tests;
