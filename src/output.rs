//! Text and JSON rendering of results, models and history
//!
//! The text renderer draws a score line, a progress bar, the tier with its
//! recommendation and an ASCII line chart of the session. JSON output keeps
//! the same fields for machine consumers.

use crate::dataset::FEATURE_COLUMNS;
use crate::history::{format_timestamp, HistoryRecord, SeriesPoint, HISTORY_HEADER};
use crate::model::{SleepModel, Tier, GENERAL_TIP};
use crate::scoring::Submission;
use serde::Serialize;

/// Scores are out of ten
pub const SCORE_MAX: f64 = 10.0;

const BAR_WIDTH: usize = 20;
const CHART_HEIGHT: usize = 10;

/// One submission, for `--format json`
#[derive(Debug, Clone, Serialize)]
pub struct JsonSubmission {
    pub timestamp: String,
    pub score: f64,
    pub tier: Tier,
    pub label: &'static str,
    pub advisory: &'static str,
    pub color: &'static str,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<&Submission> for JsonSubmission {
    fn from(submission: &Submission) -> Self {
        let tier = submission.result.tier;
        Self {
            timestamp: submission.record.timestamp.clone(),
            score: submission.result.score,
            tier,
            label: tier.label(),
            advisory: tier.advisory(),
            color: tier.color(),
            persisted: submission.persisted(),
            warning: submission.warning.clone(),
        }
    }
}

/// A chart point, for `--format json`
#[derive(Debug, Clone, Serialize)]
pub struct JsonSeriesPoint {
    pub timestamp: String,
    pub score: f64,
}

impl From<&SeriesPoint> for JsonSeriesPoint {
    fn from(point: &SeriesPoint) -> Self {
        Self {
            timestamp: format_timestamp(&point.timestamp),
            score: point.score,
        }
    }
}

/// A whole session: every submission plus the chart series
#[derive(Debug, Clone, Serialize)]
pub struct JsonSession {
    pub submissions: Vec<JsonSubmission>,
    pub series: Vec<JsonSeriesPoint>,
}

impl JsonSession {
    pub fn new(submissions: &[Submission], series: &[SeriesPoint]) -> Self {
        Self {
            submissions: submissions.iter().map(JsonSubmission::from).collect(),
            series: series.iter().map(JsonSeriesPoint::from).collect(),
        }
    }
}

/// Weight of a single feature, for `--format json`
#[derive(Debug, Clone, Serialize)]
pub struct JsonWeight {
    pub feature: &'static str,
    pub weight: f64,
}

/// Trained model summary, for `--format json`
#[derive(Debug, Clone, Serialize)]
pub struct JsonModel {
    pub intercept: f64,
    pub weights: Vec<JsonWeight>,
    pub training_samples: usize,
}

impl From<&SleepModel> for JsonModel {
    fn from(model: &SleepModel) -> Self {
        Self {
            intercept: model.intercept,
            weights: FEATURE_COLUMNS
                .iter()
                .zip(model.weights.iter())
                .map(|(feature, weight)| JsonWeight {
                    feature: *feature,
                    weight: *weight,
                })
                .collect(),
            training_samples: model.training_samples,
        }
    }
}

/// Serialize any output value as pretty JSON
pub fn to_json<T: Serialize>(value: &T) -> String {
    // Output types contain only strings and numbers
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

/// Progress bar for a score out of ten
pub fn progress_bar(score: f64) -> String {
    let ratio = if score.is_finite() {
        (score / SCORE_MAX).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Human-readable result block for one submission
pub fn format_submission(submission: &Submission) -> String {
    let score = submission.result.score;
    let tier = submission.result.tier;

    let mut out = String::new();
    out.push_str(&format!("Sleep quality score: {:.2}/10\n", score));
    out.push_str(&format!("{}\n", progress_bar(score)));
    out.push_str(&format!("Tier: {}\n", tier));
    out.push('\n');
    out.push_str("Personal recommendation\n");
    out.push_str(&format!("  {}\n", tier.advisory()));
    out.push_str(&format!("Tip: {}\n", GENERAL_TIP));
    out
}

/// ASCII line chart of the session series, oldest on the left
pub fn format_chart(series: &[SeriesPoint]) -> String {
    if series.is_empty() {
        return String::new();
    }

    let levels: Vec<usize> = series
        .iter()
        .map(|p| {
            let clamped = if p.score.is_finite() {
                p.score.clamp(0.0, SCORE_MAX)
            } else {
                0.0
            };
            (clamped / SCORE_MAX * CHART_HEIGHT as f64).round() as usize
        })
        .collect();

    let mut out = String::from("Prediction history\n");
    for level in (0..=CHART_HEIGHT).rev() {
        let axis = level as f64 * SCORE_MAX / CHART_HEIGHT as f64;
        out.push_str(&format!("{:>5.1} |", axis));
        for (i, &point_level) in levels.iter().enumerate() {
            let cell = if point_level == level {
                " * "
            } else if i > 0 && spans(levels[i - 1], point_level, level) {
                " : "
            } else {
                "   "
            };
            out.push_str(cell);
        }
        out.push('\n');
    }
    out.push_str(&format!("      +{}\n", "---".repeat(levels.len())));

    for (i, point) in series.iter().enumerate() {
        out.push_str(&format!(
            "  {:>3}  {}  {:.2}\n",
            i + 1,
            format_timestamp(&point.timestamp),
            point.score
        ));
    }
    out
}

/// True when `level` lies strictly between two consecutive points
fn spans(previous: usize, current: usize, level: usize) -> bool {
    let (low, high) = if previous < current {
        (previous, current)
    } else {
        (current, previous)
    };
    level > low && level < high
}

/// Trained model as text
pub fn format_model(model: &SleepModel) -> String {
    let mut out = String::from("Sleep quality model (OLS)\n");
    out.push_str(&format!("  samples:   {}\n", model.training_samples));
    out.push_str(&format!("  intercept: {:+.4}\n", model.intercept));
    for (feature, weight) in FEATURE_COLUMNS.iter().zip(model.weights.iter()) {
        out.push_str(&format!("  {:<14} {:+.4}\n", feature, weight));
    }
    out
}

/// Persisted history as an aligned table
pub fn format_history(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return "No predictions recorded yet\n".to_string();
    }

    let mut out = format!(
        "{:<16}  {:>12}  {:>13}  {:>6}  {:>8}  {:>13}\n",
        HISTORY_HEADER[0],
        HISTORY_HEADER[1],
        HISTORY_HEADER[2],
        HISTORY_HEADER[3],
        HISTORY_HEADER[4],
        HISTORY_HEADER[5]
    );
    for record in records {
        out.push_str(&format!(
            "{:<16}  {:>12}  {:>13}  {:>6}  {:>8}  {:>13.2}\n",
            record.timestamp,
            record.input.sleep_duration_hours(),
            record.input.stress_level(),
            record.input.caffeine_units(),
            record.input.exercise_frequency(),
            record.score
        ));
    }
    out
}
