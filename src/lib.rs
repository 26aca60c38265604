//! sleepscore - sleep quality scoring with a linear regression model
//!
//! This library fits an OLS model over a small lifestyle dataset, scores
//! new inputs, buckets the score into tiers with a recommendation, and keeps
//! both a durable CSV history and an in-memory session series for charting.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod history;
pub mod model;
pub mod output;
pub mod scoring;

pub use error::{Result, SleepError};
