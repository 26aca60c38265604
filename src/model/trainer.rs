// OLS training using aprender
//
// Features with zero variance cannot be separated from the intercept, so they
// are excluded from the solve and keep weight 0. With every feature constant
// the least-squares answer is the label mean.

use super::{SleepModel, NUM_FEATURES};
use crate::dataset::TrainingRow;
use crate::error::{Result, SleepError};
use aprender::linear_model::LinearRegression;
use aprender::primitives::{Matrix, Vector};
use aprender::traits::Estimator;

/// Minimum number of rows for a determined fit (features + intercept)
pub const MIN_TRAINING_ROWS: usize = NUM_FEATURES + 1;

/// Variance below which a feature column is treated as constant
const MIN_FEATURE_VARIANCE: f32 = 1e-6;

/// Fit an OLS model with intercept over the training rows
///
/// Deterministic for a fixed dataset.
///
/// # Errors
/// `SleepError::Training` when fewer than [`MIN_TRAINING_ROWS`] rows are
/// supplied or the normal equations are singular (collinear features).
pub fn train(rows: &[TrainingRow]) -> Result<SleepModel> {
    if rows.len() < MIN_TRAINING_ROWS {
        return Err(SleepError::Training(format!(
            "need at least {} rows, got {}",
            MIN_TRAINING_ROWS,
            rows.len()
        )));
    }

    let n = rows.len();
    let columns: Vec<Vec<f32>> = (0..NUM_FEATURES)
        .map(|j| rows.iter().map(|r| r.features()[j] as f32).collect())
        .collect();
    let labels: Vec<f32> = rows.iter().map(|r| r.sleep_quality as f32).collect();

    let mut active = Vec::with_capacity(NUM_FEATURES);
    for (j, column) in columns.iter().enumerate() {
        let variance = trueno::Vector::from_slice(column)
            .variance()
            .map_err(|e| SleepError::Training(format!("variance of feature {}: {}", j, e)))?;
        if variance > MIN_FEATURE_VARIANCE {
            active.push(j);
        } else {
            tracing::debug!(feature = j, "constant feature excluded from fit");
        }
    }

    let mut weights = [0.0; NUM_FEATURES];

    if active.is_empty() {
        let mean = rows.iter().map(|r| r.sleep_quality).sum::<f64>() / n as f64;
        tracing::info!(samples = n, intercept = mean, "all features constant, using label mean");
        return Ok(SleepModel {
            intercept: mean,
            weights,
            training_samples: n,
        });
    }

    // Row-major design matrix over the active features only
    let mut data = Vec::with_capacity(n * active.len());
    for i in 0..n {
        for &j in &active {
            data.push(columns[j][i]);
        }
    }
    let x = Matrix::from_vec(n, active.len(), data)
        .map_err(|e| SleepError::Training(format!("design matrix: {}", e)))?;
    let y = Vector::from_slice(&labels);

    let mut regression = LinearRegression::new();
    regression
        .fit(&x, &y)
        .map_err(|e| SleepError::Training(format!("least-squares solve failed: {}", e)))?;

    let coefficients: Vec<f64> = regression
        .coefficients()
        .as_slice()
        .iter()
        .map(|&w| w as f64)
        .collect();
    if coefficients.len() != active.len() {
        return Err(SleepError::Training(format!(
            "expected {} coefficients, got {}",
            active.len(),
            coefficients.len()
        )));
    }
    for (&j, &w) in active.iter().zip(coefficients.iter()) {
        weights[j] = w;
    }
    let intercept = regression.intercept() as f64;

    if !intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
        return Err(SleepError::Training(
            "solve produced non-finite coefficients".to_string(),
        ));
    }

    tracing::info!(
        samples = n,
        intercept,
        r_squared = regression.score(&x, &y),
        "trained sleep quality model"
    );

    Ok(SleepModel {
        intercept,
        weights,
        training_samples: n,
    })
}
