//! In-memory history for the current session

use super::record::{parse_timestamp, HistoryRecord};
use chrono::NaiveDateTime;

/// A `{timestamp, score}` pair as it was submitted
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEntry {
    pub timestamp: String,
    pub score: f64,
}

/// A chartable point with a parsed timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub score: f64,
}

/// Scores submitted during one session, in insertion order
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    entries: Vec<SessionEntry>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: &HistoryRecord) {
        self.entries.push(SessionEntry {
            timestamp: record.timestamp.clone(),
            score: record.score,
        });
    }

    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Points sorted by timestamp, ascending
    ///
    /// Entries whose timestamp does not parse are skipped with a warning.
    /// Equal timestamps keep their insertion order.
    pub fn render_series(&self) -> Vec<SeriesPoint> {
        let mut points: Vec<SeriesPoint> = self
            .entries
            .iter()
            .filter_map(|entry| match parse_timestamp(&entry.timestamp) {
                Ok(timestamp) => Some(SeriesPoint {
                    timestamp,
                    score: entry.score,
                }),
                Err(e) => {
                    tracing::warn!("Skipping history entry: {}", e);
                    None
                }
            })
            .collect();

        points.sort_by_key(|p| p.timestamp);
        points
    }
}
