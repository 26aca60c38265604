//! Append-only CSV history file

use super::record::{Clock, HistoryRecord};
use crate::error::{Result, SleepError};
use crate::model::PredictionInput;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Header written when the history file is created
pub const HISTORY_HEADER: [&str; 6] = [
    "Tanggal",
    "Durasi_Tidur",
    "Tingkat_Stres",
    "Kafein",
    "Olahraga",
    "Skor_Kualitas",
];

/// Appends submissions to the history CSV
///
/// Appends from one recorder are serialized, so a recorder shared between
/// threads never interleaves rows. Separate processes writing the same file
/// are not coordinated.
#[derive(Debug)]
pub struct HistoryRecorder {
    path: PathBuf,
    lock: Mutex<()>,
}

impl HistoryRecorder {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stamp a submission with `clock` and append it to the file
    ///
    /// The header is written only when the file is missing or empty.
    pub fn record(
        &self,
        input: &PredictionInput,
        score: f64,
        clock: &dyn Clock,
    ) -> Result<HistoryRecord> {
        let record = HistoryRecord::stamped(input, score, clock);
        self.append(&record)?;
        Ok(record)
    }

    /// Append an already stamped record
    pub fn append(&self, record: &HistoryRecord) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| SleepError::Persistence("history lock poisoned".to_string()))?;

        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.persistence_error(e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer
                .write_record(HISTORY_HEADER)
                .map_err(|e| self.persistence_error(e))?;
        }

        writer
            .write_record(&[
                record.timestamp.clone(),
                record.input.sleep_duration_hours().to_string(),
                record.input.stress_level().to_string(),
                record.input.caffeine_units().to_string(),
                record.input.exercise_frequency().to_string(),
                record.score.to_string(),
            ])
            .map_err(|e| self.persistence_error(e))?;
        writer.flush().map_err(|e| self.persistence_error(e))?;

        tracing::debug!(
            path = %self.path.display(),
            timestamp = %record.timestamp,
            "appended history record"
        );
        Ok(())
    }

    fn persistence_error(&self, e: impl std::fmt::Display) -> SleepError {
        SleepError::Persistence(format!("{}: {}", self.path.display(), e))
    }
}

/// Read every record back from a history file
///
/// A missing file is an empty history.
pub fn load_history<P: AsRef<Path>>(path: P) -> Result<Vec<HistoryRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let read_error =
        |e: &dyn std::fmt::Display| SleepError::Persistence(format!("{}: {}", path.display(), e));

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| read_error(&e))?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let row = result.map_err(|e| read_error(&e))?;
        if row.len() != HISTORY_HEADER.len() {
            return Err(read_error(&format!(
                "line {}: expected {} fields, got {}",
                line,
                HISTORY_HEADER.len(),
                row.len()
            )));
        }

        let int = |idx: usize| -> Result<i64> {
            row[idx]
                .parse::<i64>()
                .map_err(|e| read_error(&format!("line {}: {}: {}", line, HISTORY_HEADER[idx], e)))
        };
        let input = PredictionInput::new(int(1)?, int(2)?, int(3)?, int(4)?)?;
        let score = row[5]
            .parse::<f64>()
            .map_err(|e| read_error(&format!("line {}: {}: {}", line, HISTORY_HEADER[5], e)))?;

        records.push(HistoryRecord {
            timestamp: row[0].to_string(),
            input,
            score,
        });
    }

    Ok(records)
}
