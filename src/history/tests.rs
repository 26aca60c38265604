// Tests for the history recorder and session aggregator

use super::*;
use crate::error::SleepError;
use crate::model::PredictionInput;
use chrono::NaiveDate;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn at(day: u32, hour: u32, minute: u32) -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap(),
    )
}

fn record(timestamp: &str, score: f64) -> HistoryRecord {
    HistoryRecord {
        timestamp: timestamp.to_string(),
        input: PredictionInput::default(),
        score,
    }
}

// ============================================================================
// Recorder
// ============================================================================

#[test]
fn test_record_creates_file_with_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("riwayat_tidur.csv");
    let recorder = HistoryRecorder::new(&path);

    let input = PredictionInput::new(8, 3, 1, 4).unwrap();
    let rec = recorder.record(&input, 7.25, &at(9, 22, 15)).unwrap();
    assert_eq!(rec.timestamp, "2024-03-09 22:15");

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "Tanggal,Durasi_Tidur,Tingkat_Stres,Kafein,Olahraga,Skor_Kualitas\n\
         2024-03-09 22:15,8,3,1,4,7.25\n"
    );
}

#[test]
fn test_header_written_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    let recorder = HistoryRecorder::new(&path);

    for minute in 0..3 {
        recorder
            .record(&PredictionInput::default(), 6.5, &at(1, 8, minute))
            .unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("Tanggal").count(), 1);
    assert_eq!(content.lines().count(), 4);
}

#[test]
fn test_existing_file_appended_without_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");

    HistoryRecorder::new(&path)
        .record(&PredictionInput::default(), 5.0, &at(1, 8, 0))
        .unwrap();
    // A second recorder, as after a process restart
    HistoryRecorder::new(&path)
        .record(&PredictionInput::default(), 6.0, &at(2, 8, 0))
        .unwrap();

    let records = load_history(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].score, 6.0);
}

#[test]
fn test_empty_file_gets_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    fs::write(&path, "").unwrap();

    HistoryRecorder::new(&path)
        .record(&PredictionInput::default(), 5.0, &at(1, 8, 0))
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("Tanggal,"));
}

#[test]
fn test_roundtrip_n_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    let recorder = HistoryRecorder::new(&path);

    let mut written = Vec::new();
    for i in 0..10 {
        let input = PredictionInput::new(4 + i % 7, 1 + i % 10, i % 6, i % 8).unwrap();
        let score = 3.0 + i as f64 * 0.37;
        let rec = recorder
            .record(&input, (score * 100.0).round() / 100.0, &at(5, 10, i as u32))
            .unwrap();
        written.push(rec);
    }

    let loaded = load_history(&path).unwrap();
    assert_eq!(loaded, written);
}

#[test]
fn test_unwritable_path_is_persistence_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing-dir").join("history.csv");
    let recorder = HistoryRecorder::new(&path);

    let err = recorder
        .record(&PredictionInput::default(), 5.0, &at(1, 8, 0))
        .unwrap_err();
    assert!(matches!(err, SleepError::Persistence(_)));
}

#[test]
fn test_load_missing_history_is_empty() {
    let dir = TempDir::new().unwrap();
    assert!(load_history(dir.path().join("none.csv")).unwrap().is_empty());
}

#[test]
fn test_load_rejects_short_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    fs::write(
        &path,
        "Tanggal,Durasi_Tidur,Tingkat_Stres,Kafein,Olahraga,Skor_Kualitas\n2024-01-01 10:00,7,5\n",
    )
    .unwrap();
    assert!(load_history(&path).is_err());
}

#[test]
fn test_concurrent_appends_do_not_interleave() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    let recorder = Arc::new(HistoryRecorder::new(&path));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let recorder = Arc::clone(&recorder);
            thread::spawn(move || {
                for i in 0..25 {
                    recorder
                        .record(&PredictionInput::default(), 5.0, &at(1 + t, 10, i))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let records = load_history(&path).unwrap();
    assert_eq!(records.len(), 200);
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("Tanggal").count(), 1);
}

// ============================================================================
// Timestamps
// ============================================================================

#[test]
fn test_parse_timestamp() {
    let parsed = parse_timestamp("2024-03-09 22:15").unwrap();
    assert_eq!(format_timestamp(&parsed), "2024-03-09 22:15");
}

#[test]
fn test_parse_timestamp_rejects_garbage() {
    let err = parse_timestamp("last tuesday").unwrap_err();
    assert!(matches!(err, SleepError::Format { .. }));
    assert!(parse_timestamp("2024-13-01 10:00").is_err());
}

#[test]
fn test_stamped_record_matches_recorder() {
    let dir = TempDir::new().unwrap();
    let recorder = HistoryRecorder::new(dir.path().join("history.csv"));
    let input = PredictionInput::new(6, 4, 1, 2).unwrap();

    let stamped = HistoryRecord::stamped(&input, 6.85, &at(3, 7, 5));
    assert_eq!(stamped.timestamp, "2024-03-03 07:05");
    assert_eq!(stamped.input, input);
    assert_eq!(stamped.score, 6.85);

    let recorded = recorder.record(&input, 6.85, &at(3, 7, 5)).unwrap();
    assert_eq!(recorded, stamped);
}

// ============================================================================
// Session
// ============================================================================

#[test]
fn test_session_keeps_insertion_order() {
    let mut session = SessionHistory::new();
    session.append(&record("2024-03-02 10:00", 6.0));
    session.append(&record("2024-03-01 10:00", 5.0));

    assert_eq!(session.len(), 2);
    assert_eq!(session.entries()[0].timestamp, "2024-03-02 10:00");
}

#[test]
fn test_render_series_sorted_ascending() {
    let mut session = SessionHistory::new();
    session.append(&record("2024-03-02 10:00", 6.0));
    session.append(&record("2024-03-01 23:59", 5.0));
    session.append(&record("2024-03-02 09:30", 7.5));

    let series = session.render_series();
    let scores: Vec<f64> = series.iter().map(|p| p.score).collect();
    assert_eq!(scores, vec![5.0, 7.5, 6.0]);
    assert!(series.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_render_series_skips_malformed() {
    let mut session = SessionHistory::new();
    session.append(&record("2024-03-02 10:00", 6.0));
    session.append(&record("not a time", 1.0));

    let series = session.render_series();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].score, 6.0);
    // The raw entry is still kept
    assert_eq!(session.len(), 2);
}

#[test]
fn test_render_series_equal_timestamps_stable() {
    let mut session = SessionHistory::new();
    session.append(&record("2024-03-02 10:00", 6.0));
    session.append(&record("2024-03-02 10:00", 4.0));

    let scores: Vec<f64> = session.render_series().iter().map(|p| p.score).collect();
    assert_eq!(scores, vec![6.0, 4.0]);
}

#[test]
fn test_empty_session() {
    let session = SessionHistory::new();
    assert!(session.is_empty());
    assert!(session.render_series().is_empty());
}
