// Sleep quality model: OLS fit, scoring and tier classification
//
// The model is fitted once at startup and is immutable afterwards. Every
// prediction goes through the same fixed feature order:
// duration, stress, caffeine, exercise.
//
// Implementation:
// - Uses aprender's LinearRegression (closed-form OLS with intercept) for the fit
// - Uses trueno::Vector variance to drop constant features before solving
// - Scores are rounded half away from zero to two decimals

mod predictor;
mod tier;
mod trainer;

pub use predictor::{
    evaluate, predict, round_score, InputPolicy, PredictionInput, PredictionResult,
    CAFFEINE_RANGE, DURATION_RANGE, EXERCISE_RANGE, STRESS_RANGE,
};
pub use tier::{classify, Tier, GENERAL_TIP};
pub use trainer::{train, MIN_TRAINING_ROWS};

use crate::error::{Result, SleepError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of input features
pub const NUM_FEATURES: usize = 4;

/// Trained linear model: `score = intercept + Σ weights[i] * x[i]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepModel {
    /// Intercept term
    pub intercept: f64,
    /// Weights for duration, stress, caffeine, exercise (in that order)
    pub weights: [f64; NUM_FEATURES],
    /// Number of rows the model was fitted on (0 for hand-built models)
    #[serde(default)]
    pub training_samples: usize,
}

impl SleepModel {
    /// Build a model from known coefficients
    pub fn new(intercept: f64, weights: [f64; NUM_FEATURES]) -> Self {
        Self {
            intercept,
            weights,
            training_samples: 0,
        }
    }

    /// Unrounded linear response for a feature vector in training order
    pub fn raw_score(&self, features: &[f64; NUM_FEATURES]) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(features.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }

    /// Save the model as pretty-printed JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SleepError::Persistence(format!("cannot encode model: {}", e)))?;
        fs::write(path, json)
            .map_err(|e| SleepError::Persistence(format!("{}: {}", path.display(), e)))
    }

    /// Load a model previously written by [`SleepModel::save_json`]
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SleepError::DataLoad(format!("{}: {}", path.display(), e)))?;
        let model: SleepModel = serde_json::from_str(&content)
            .map_err(|e| SleepError::DataLoad(format!("{}: invalid model: {}", path.display(), e)))?;

        if !model.intercept.is_finite() || model.weights.iter().any(|w| !w.is_finite()) {
            return Err(SleepError::DataLoad(format!(
                "{}: model coefficients must be finite",
                path.display()
            )));
        }
        Ok(model)
    }
}
