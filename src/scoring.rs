//! Per-submission scoring pipeline
//!
//! predict → classify → record → append to session, in that order. A failed
//! history write is downgraded to a warning so the computed result is never
//! lost.

use crate::error::Result;
use crate::history::{Clock, HistoryRecord, HistoryRecorder, SessionHistory};
use crate::model::{evaluate, InputPolicy, PredictionInput, PredictionResult, SleepModel};

/// Outcome of one submission
#[derive(Debug, Clone)]
pub struct Submission {
    pub result: PredictionResult,
    pub record: HistoryRecord,
    /// Set when the history file could not be written
    pub warning: Option<String>,
}

impl Submission {
    pub fn persisted(&self) -> bool {
        self.warning.is_none()
    }
}

/// Owns the trained model and the history file for the process lifetime
///
/// Only constructible from a trained [`SleepModel`], so an untrained service
/// cannot exist. Shareable across threads: the model is read-only and the
/// recorder serializes its appends.
#[derive(Debug)]
pub struct ScoringService {
    model: SleepModel,
    recorder: HistoryRecorder,
    policy: InputPolicy,
}

impl ScoringService {
    pub fn new(model: SleepModel, recorder: HistoryRecorder, policy: InputPolicy) -> Self {
        Self {
            model,
            recorder,
            policy,
        }
    }

    pub fn model(&self) -> &SleepModel {
        &self.model
    }

    pub fn recorder(&self) -> &HistoryRecorder {
        &self.recorder
    }

    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    /// Build an input under this service's range policy
    pub fn input(
        &self,
        duration: i64,
        stress: i64,
        caffeine: i64,
        exercise: i64,
    ) -> Result<PredictionInput> {
        PredictionInput::with_policy(duration, stress, caffeine, exercise, self.policy)
    }

    /// Score one input, persist it and add it to the session
    pub fn submit(
        &self,
        session: &mut SessionHistory,
        input: &PredictionInput,
        clock: &dyn Clock,
    ) -> Submission {
        let result = evaluate(&self.model, input);
        tracing::debug!(score = result.score, tier = %result.tier, "scored submission");

        let record = HistoryRecord::stamped(input, result.score, clock);

        let warning = match self.recorder.append(&record) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("History not saved: {}", e);
                Some(e.to_string())
            }
        };

        session.append(&record);

        Submission {
            result,
            record,
            warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{load_history, FixedClock};
    use crate::model::Tier;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn clock(hour: u32) -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
        )
    }

    fn service(dir: &TempDir, policy: InputPolicy) -> ScoringService {
        ScoringService::new(
            SleepModel::new(5.0, [0.3, -0.2, -0.1, 0.2]),
            HistoryRecorder::new(dir.path().join("history.csv")),
            policy,
        )
    }

    #[test]
    fn test_submit_runs_full_pipeline() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, InputPolicy::Reject);
        let mut session = SessionHistory::new();

        let input = service.input(4, 10, 5, 0).unwrap();
        let submission = service.submit(&mut session, &input, &clock(21));

        assert_eq!(submission.result.score, 3.7);
        assert_eq!(submission.result.tier, Tier::Poor);
        assert!(submission.persisted());
        assert_eq!(submission.record.timestamp, "2024-05-01 21:00");
        assert_eq!(session.len(), 1);

        let on_disk = load_history(service.recorder().path()).unwrap();
        assert_eq!(on_disk, vec![submission.record]);
    }

    #[test]
    fn test_persistence_failure_keeps_result() {
        let dir = TempDir::new().unwrap();
        let service = ScoringService::new(
            SleepModel::new(7.0, [0.0; 4]),
            HistoryRecorder::new(dir.path().join("no-such-dir").join("history.csv")),
            InputPolicy::Reject,
        );
        let mut session = SessionHistory::new();

        let submission = service.submit(&mut session, &PredictionInput::default(), &clock(8));

        assert_eq!(submission.result.score, 7.0);
        assert_eq!(submission.result.tier, Tier::Good);
        assert!(!submission.persisted());
        assert!(submission.warning.unwrap().contains("history"));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_policy_applied_to_inputs() {
        let dir = TempDir::new().unwrap();
        assert!(service(&dir, InputPolicy::Reject).input(3, 5, 2, 3).is_err());

        let clamped = service(&dir, InputPolicy::Clamp).input(3, 5, 2, 3).unwrap();
        assert_eq!(clamped.sleep_duration_hours(), 4);
    }

    #[test]
    fn test_session_series_follows_submissions() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, InputPolicy::Reject);
        let mut session = SessionHistory::new();

        for hour in [22, 7, 13] {
            service.submit(&mut session, &PredictionInput::default(), &clock(hour));
        }

        let hours: Vec<String> = session
            .render_series()
            .iter()
            .map(|p| p.timestamp.format("%H").to_string())
            .collect();
        assert_eq!(hours, vec!["07", "13", "22"]);
    }

    #[test]
    fn test_service_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScoringService>();
    }
}
