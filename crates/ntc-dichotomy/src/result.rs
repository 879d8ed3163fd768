//! Final search summary derived from a terminated [`Index`].

use serde::{Deserialize, Serialize};

use crate::index::Index;
use crate::outcome::{FailureReason, StepOutcome};

/// The single dominant cause limiting further improvement of the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitingCause {
    /// The feasible interval is bounded by a generation/load shift limitation.
    GlskLimitation,
    /// A network constraint stays violated just above the secure exchange.
    CriticalBranch,
    /// The insecure side of the bracket is an oracle breakdown, not a verdict.
    ComputationFailure,
    /// The search exhausted its bounds or iteration budget before bracketing
    /// a true security boundary.
    IndexEvaluationOrMaxIteration,
}

impl LimitingCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitingCause::GlskLimitation => "glsk-limitation",
            LimitingCause::CriticalBranch => "critical-branch",
            LimitingCause::ComputationFailure => "computation-failure",
            LimitingCause::IndexEvaluationOrMaxIteration => {
                "index-evaluation-or-max-iteration"
            }
        }
    }
}

/// Immutable summary of one dichotomy run.
///
/// Built exactly once, from the final [`Index`] state, and never mutated.
/// Note the asymmetry with the index brackets: the insecure side here is the
/// lowest *non-secure* tested level, `Failed` steps included, because a level
/// that could not be validated still caps what the search can claim — even
/// though such steps never narrowed the bracket while the search was running.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<V> {
    best_secure: Option<(f64, StepOutcome<V>)>,
    best_insecure_or_failed: Option<(f64, StepOutcome<V>)>,
    limiting_cause: LimitingCause,
    limiting_message: String,
}

impl<V: Clone> SearchResult<V> {
    /// Derive the summary from a terminated index.
    pub fn from_index(index: &Index<V>) -> Self {
        let best_secure = index
            .highest_secure_point()
            .map(|(value, outcome)| (value, outcome.clone()));
        let best_insecure_or_failed = index
            .tested_steps()
            .iter()
            .filter(|(_, outcome)| !outcome.is_valid())
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(value, outcome)| (*value, outcome.clone()));

        let (limiting_cause, limiting_message) = match (&best_secure, &best_insecure_or_failed) {
            (Some(_), Some((_, outcome))) => match outcome {
                StepOutcome::Failed { reason, message } => {
                    let cause = match reason {
                        FailureReason::GlskLimitation => LimitingCause::GlskLimitation,
                        FailureReason::ValidationFailed => LimitingCause::ComputationFailure,
                    };
                    (cause, message.clone())
                }
                _ => (
                    LimitingCause::CriticalBranch,
                    "operational limits violated above the secure exchange".to_string(),
                ),
            },
            _ => (
                LimitingCause::IndexEvaluationOrMaxIteration,
                "search interval or iteration budget exhausted before bracketing the limit"
                    .to_string(),
            ),
        };

        Self {
            best_secure,
            best_insecure_or_failed,
            limiting_cause,
            limiting_message,
        }
    }
}

impl<V> SearchResult<V> {
    pub fn best_secure(&self) -> Option<(f64, &StepOutcome<V>)> {
        self.best_secure
            .as_ref()
            .map(|(value, outcome)| (*value, outcome))
    }

    pub fn best_insecure_or_failed(&self) -> Option<(f64, &StepOutcome<V>)> {
        self.best_insecure_or_failed
            .as_ref()
            .map(|(value, outcome)| (*value, outcome))
    }

    pub fn has_secure_step(&self) -> bool {
        self.best_secure.is_some()
    }

    pub fn best_secure_value(&self) -> Option<f64> {
        self.best_secure.as_ref().map(|(value, _)| *value)
    }

    pub fn best_insecure_value(&self) -> Option<f64> {
        self.best_insecure_or_failed.as_ref().map(|(value, _)| *value)
    }

    pub fn limiting_cause(&self) -> LimitingCause {
        self.limiting_cause
    }

    pub fn limiting_message(&self) -> &str {
        &self.limiting_message
    }
}
