//! Training dataset loader
//!
//! Reads the fixed-schema sleep dataset. Columns are located by header name,
//! so column order is free and extra columns are ignored. A single malformed
//! row rejects the whole load.

use crate::error::{Result, SleepError};
use std::path::Path;

/// Feature columns, in the order the model is trained and queried
pub const FEATURE_COLUMNS: [&str; 4] = ["Durasi_Tidur", "Tingkat_Stres", "Kafein", "Olahraga"];

/// Label column
pub const LABEL_COLUMN: &str = "Kualitas_Tidur";

/// One labeled observation from the training file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingRow {
    pub sleep_duration_hours: f64,
    pub stress_level: i64,
    pub caffeine_units: i64,
    pub exercise_frequency: i64,
    pub sleep_quality: f64,
}

impl TrainingRow {
    /// Feature vector in training order
    pub fn features(&self) -> [f64; 4] {
        [
            self.sleep_duration_hours,
            self.stress_level as f64,
            self.caffeine_units as f64,
            self.exercise_frequency as f64,
        ]
    }
}

/// Load the training dataset from a CSV file
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<TrainingRow>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SleepError::DataLoad(format!(
            "dataset file not found: {}",
            path.display()
        )));
    }

    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| SleepError::DataLoad(format!("{}: {}", path.display(), e)))?;

    let rows = read_rows(reader)?;
    tracing::debug!(rows = rows.len(), path = %path.display(), "loaded dataset");
    Ok(rows)
}

/// Load the training dataset from an in-memory CSV string
pub fn load_dataset_from_str(content: &str) -> Result<Vec<TrainingRow>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    read_rows(reader)
}

fn read_rows<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<TrainingRow>> {
    let headers = reader
        .headers()
        .map_err(|e| SleepError::DataLoad(format!("cannot read header: {}", e)))?
        .clone();

    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| SleepError::DataLoad(format!("missing required column '{}'", name)))
    };

    let duration_idx = column(FEATURE_COLUMNS[0])?;
    let stress_idx = column(FEATURE_COLUMNS[1])?;
    let caffeine_idx = column(FEATURE_COLUMNS[2])?;
    let exercise_idx = column(FEATURE_COLUMNS[3])?;
    let label_idx = column(LABEL_COLUMN)?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        // Header is line 1
        let line = i + 2;
        let record =
            result.map_err(|e| SleepError::DataLoad(format!("line {}: {}", line, e)))?;

        rows.push(TrainingRow {
            sleep_duration_hours: parse_float(&record, duration_idx, line)?,
            stress_level: parse_int(&record, stress_idx, line)?,
            caffeine_units: parse_int(&record, caffeine_idx, line)?,
            exercise_frequency: parse_int(&record, exercise_idx, line)?,
            sleep_quality: parse_float(&record, label_idx, line)?,
        });
    }

    Ok(rows)
}

fn field<'a>(record: &'a csv::StringRecord, idx: usize, line: usize) -> Result<&'a str> {
    record
        .get(idx)
        .ok_or_else(|| SleepError::DataLoad(format!("line {}: missing field {}", line, idx + 1)))
}

fn parse_float(record: &csv::StringRecord, idx: usize, line: usize) -> Result<f64> {
    let raw = field(record, idx, line)?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SleepError::DataLoad(format!(
            "line {}: '{}' is not a finite number",
            line, raw
        ))),
    }
}

fn parse_int(record: &csv::StringRecord, idx: usize, line: usize) -> Result<i64> {
    let raw = field(record, idx, line)?;
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }
    // Spreadsheet exports write integers as "3.0"
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
        _ => Err(SleepError::DataLoad(format!(
            "line {}: '{}' is not an integer",
            line, raw
        ))),
    }
}
