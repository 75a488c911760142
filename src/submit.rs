//! Final score submission
//!
//! The engine only knows the final score. Signing, the contract call and
//! confirmation happen behind `ScoreSubmitter`, which a host implements for
//! its wallet stack.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Game identifier registered for the runner on the score contract
pub const STREET_RUN_GAME_ID: u32 = 1001;

/// Payload handed to the submitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub game_id: u32,
    pub score: u64,
}

impl ScoreSubmission {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Why a score could not be submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The run has not ended yet
    RunNotOver,
    /// This run's score is already on record
    AlreadySubmitted { score: u64 },
    /// The backend refused or failed; safe to retry
    Rejected(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunNotOver => write!(f, "run is still in progress"),
            Self::AlreadySubmitted { score } => {
                write!(f, "score {score} was already submitted for this run")
            }
            Self::Rejected(reason) => write!(f, "score submission failed: {reason}"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl SubmitError {
    /// Whether trying again later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Something that can record a score (a contract call, an API, a log)
pub trait ScoreSubmitter {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmitError>;
}

/// Writes submissions to the log; used by hosts without a wallet
#[derive(Debug, Default)]
pub struct LogSubmitter {
    pub submitted: Vec<ScoreSubmission>,
}

impl ScoreSubmitter for LogSubmitter {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmitError> {
        log::info!("Submitting score: {}", submission.to_json());
        self.submitted.push(*submission);
        Ok(())
    }
}

/// Submits each finished run's score at most once
#[derive(Debug)]
pub struct ScoreReporter<S> {
    submitter: S,
    game_id: u32,
    /// Run (by start count) whose score is already recorded
    saved_run: Option<u64>,
}

impl<S: ScoreSubmitter> ScoreReporter<S> {
    pub fn new(submitter: S, game_id: u32) -> Self {
        Self {
            submitter,
            game_id,
            saved_run: None,
        }
    }

    /// Submit `final_score` for run number `run`
    ///
    /// `final_score` is `None` while the run is still going. A failed
    /// submission leaves the run unsaved so it can be retried.
    pub fn submit_final(&mut self, run: u64, final_score: Option<u64>) -> Result<(), SubmitError> {
        let score = final_score.ok_or(SubmitError::RunNotOver)?;
        if self.saved_run == Some(run) {
            return Err(SubmitError::AlreadySubmitted { score });
        }

        let submission = ScoreSubmission {
            game_id: self.game_id,
            score,
        };
        match self.submitter.submit(&submission) {
            Ok(()) => {
                self.saved_run = Some(run);
                log::info!("Score {} saved for game {}", score, self.game_id);
                Ok(())
            }
            Err(e) => {
                log::warn!("Score submission failed: {e}");
                Err(e)
            }
        }
    }

    /// Whether run number `run` has been saved
    pub fn is_saved(&self, run: u64) -> bool {
        self.saved_run == Some(run)
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fails the first `failures` calls, then accepts
    struct Flaky {
        failures: u32,
        accepted: Vec<ScoreSubmission>,
    }

    impl ScoreSubmitter for Flaky {
        fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmitError> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(SubmitError::Rejected("user rejected signature".into()));
            }
            self.accepted.push(*submission);
            Ok(())
        }
    }

    #[test]
    fn test_payload_json() {
        let submission = ScoreSubmission {
            game_id: STREET_RUN_GAME_ID,
            score: 1234,
        };
        assert_eq!(submission.to_json(), r#"{"game_id":1001,"score":1234}"#);
    }

    #[test]
    fn test_refuses_unfinished_run() {
        let mut reporter = ScoreReporter::new(LogSubmitter::default(), STREET_RUN_GAME_ID);
        assert_eq!(reporter.submit_final(1, None), Err(SubmitError::RunNotOver));
        assert!(reporter.submitter().submitted.is_empty());
    }

    #[test]
    fn test_submits_once_per_run() {
        let mut reporter = ScoreReporter::new(LogSubmitter::default(), STREET_RUN_GAME_ID);
        assert!(reporter.submit_final(1, Some(420)).is_ok());
        assert!(reporter.is_saved(1));
        assert_eq!(
            reporter.submit_final(1, Some(420)),
            Err(SubmitError::AlreadySubmitted { score: 420 })
        );

        // A new run can be saved again
        assert!(!reporter.is_saved(2));
        assert!(reporter.submit_final(2, Some(77)).is_ok());
        assert_eq!(reporter.submitter().submitted.len(), 2);
        assert_eq!(reporter.submitter().submitted[1].score, 77);
    }

    #[test]
    fn test_failure_is_retryable() {
        let flaky = Flaky {
            failures: 1,
            accepted: Vec::new(),
        };
        let mut reporter = ScoreReporter::new(flaky, STREET_RUN_GAME_ID);

        let err = reporter.submit_final(1, Some(50)).unwrap_err();
        assert!(err.is_retryable());
        assert!(!reporter.is_saved(1));

        assert!(reporter.submit_final(1, Some(50)).is_ok());
        assert_eq!(
            reporter.submitter().accepted,
            vec![ScoreSubmission {
                game_id: 1001,
                score: 50
            }]
        );
    }
}
