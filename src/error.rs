//! Error taxonomy for the scoring pipeline
//!
//! Startup errors (`Config`, `DataLoad`, `Training`) are fatal for the binary.
//! Per-submission errors (`Persistence`, `Format`, `InputOutOfRange`) are
//! reported without discarding an already computed prediction.

use thiserror::Error;

/// Errors raised by the sleepscore library
#[derive(Error, Debug)]
pub enum SleepError {
    #[error("Failed to load dataset: {0}")]
    DataLoad(String),

    #[error("Failed to train model: {0}")]
    Training(String),

    #[error("Failed to persist history: {0}")]
    Persistence(String),

    #[error("Malformed timestamp '{value}': {reason}")]
    Format { value: String, reason: String },

    #[error("{field} must be in [{min}, {max}], got {value}")]
    InputOutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SleepError {
    /// True for errors that abort startup rather than a single submission
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SleepError::DataLoad(_) | SleepError::Training(_) | SleepError::Config(_)
        )
    }
}

/// Result type for sleepscore operations
pub type Result<T> = std::result::Result<T, SleepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_errors_are_fatal() {
        assert!(SleepError::DataLoad("missing".into()).is_fatal());
        assert!(SleepError::Training("singular".into()).is_fatal());
        assert!(SleepError::Config("bad".into()).is_fatal());
    }

    #[test]
    fn test_submission_errors_are_not_fatal() {
        assert!(!SleepError::Persistence("denied".into()).is_fatal());
        let err = SleepError::Format {
            value: "yesterday".into(),
            reason: "input contains invalid characters".into(),
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_input_out_of_range_message() {
        let err = SleepError::InputOutOfRange {
            field: "stress_level",
            value: 11,
            min: 1,
            max: 10,
        };
        assert_eq!(err.to_string(), "stress_level must be in [1, 10], got 11");
    }
}
