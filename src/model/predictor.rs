// Prediction: validated inputs → rounded score → tier

use super::tier::{classify, Tier};
use super::{SleepModel, NUM_FEATURES};
use crate::error::{Result, SleepError};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Hours of sleep
pub const DURATION_RANGE: RangeInclusive<i64> = 4..=10;
/// Stress level
pub const STRESS_RANGE: RangeInclusive<i64> = 1..=10;
/// Caffeine units per day
pub const CAFFEINE_RANGE: RangeInclusive<i64> = 0..=5;
/// Exercise sessions per week
pub const EXERCISE_RANGE: RangeInclusive<i64> = 0..=7;

/// What to do with an input outside its range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPolicy {
    /// Fail with `SleepError::InputOutOfRange`
    #[default]
    Reject,
    /// Clamp to the nearest bound
    Clamp,
}

/// The four lifestyle inputs of one submission, always within range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictionInput {
    sleep_duration_hours: i64,
    stress_level: i64,
    caffeine_units: i64,
    exercise_frequency: i64,
}

impl Default for PredictionInput {
    fn default() -> Self {
        Self {
            sleep_duration_hours: 7,
            stress_level: 5,
            caffeine_units: 2,
            exercise_frequency: 3,
        }
    }
}

impl PredictionInput {
    /// Create an input, rejecting out-of-range values
    pub fn new(duration: i64, stress: i64, caffeine: i64, exercise: i64) -> Result<Self> {
        Self::with_policy(duration, stress, caffeine, exercise, InputPolicy::Reject)
    }

    /// Create an input, applying `policy` to out-of-range values
    pub fn with_policy(
        duration: i64,
        stress: i64,
        caffeine: i64,
        exercise: i64,
        policy: InputPolicy,
    ) -> Result<Self> {
        Ok(Self {
            sleep_duration_hours: bounded("sleep_duration_hours", duration, DURATION_RANGE, policy)?,
            stress_level: bounded("stress_level", stress, STRESS_RANGE, policy)?,
            caffeine_units: bounded("caffeine_units", caffeine, CAFFEINE_RANGE, policy)?,
            exercise_frequency: bounded("exercise_frequency", exercise, EXERCISE_RANGE, policy)?,
        })
    }

    pub fn sleep_duration_hours(&self) -> i64 {
        self.sleep_duration_hours
    }

    pub fn stress_level(&self) -> i64 {
        self.stress_level
    }

    pub fn caffeine_units(&self) -> i64 {
        self.caffeine_units
    }

    pub fn exercise_frequency(&self) -> i64 {
        self.exercise_frequency
    }

    /// Feature vector in training order
    pub fn features(&self) -> [f64; NUM_FEATURES] {
        [
            self.sleep_duration_hours as f64,
            self.stress_level as f64,
            self.caffeine_units as f64,
            self.exercise_frequency as f64,
        ]
    }
}

fn bounded(
    field: &'static str,
    value: i64,
    range: RangeInclusive<i64>,
    policy: InputPolicy,
) -> Result<i64> {
    if range.contains(&value) {
        return Ok(value);
    }
    let (min, max) = (*range.start(), *range.end());
    match policy {
        InputPolicy::Reject => Err(SleepError::InputOutOfRange {
            field,
            value,
            min,
            max,
        }),
        InputPolicy::Clamp => {
            let clamped = value.clamp(min, max);
            tracing::warn!(field, value, clamped, "input out of range, clamped");
            Ok(clamped)
        }
    }
}

/// Score with its tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub score: f64,
    pub tier: Tier,
}

/// Round half away from zero to two decimals
pub fn round_score(raw: f64) -> f64 {
    (raw * 100.0).round() / 100.0
}

/// Predict the sleep quality score for one input
pub fn predict(model: &SleepModel, input: &PredictionInput) -> f64 {
    round_score(model.raw_score(&input.features()))
}

/// Predict and classify in one step
pub fn evaluate(model: &SleepModel, input: &PredictionInput) -> PredictionResult {
    let score = predict(model, input);
    PredictionResult {
        score,
        tier: classify(score),
    }
}
