//! Search interval state: bounds, precision and tested-step history.

use thiserror::Error;

use crate::outcome::StepOutcome;

/// Errors raised by [`Index`] construction and bookkeeping.
///
/// The ordering variants flag internal-consistency violations: with a correct
/// strategy a secure level can never sit above an insecure one, so hitting
/// them means a logic bug in the caller, not bad business data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndexError {
    #[error("minimum exchange {min} MW is above maximum {max} MW")]
    InvalidBounds { min: f64, max: f64 },

    #[error("secure step at {value} MW is above the lowest unsecure step at {bound} MW")]
    SecureAboveInsecure { value: f64, bound: f64 },

    #[error("unsecure step at {value} MW is below the highest secure step at {bound} MW")]
    InsecureBelowSecure { value: f64, bound: f64 },
}

/// Exchange-level search state for one dichotomy run.
///
/// Holds the immutable search bounds and precision, the append-only history
/// of tested levels in insertion order, and the derived brackets: the highest
/// level found secure and the lowest level found unsecure after validation.
/// `Failed` outcomes are kept in the history but never move either bracket.
#[derive(Debug)]
pub struct Index<V> {
    min_value: f64,
    max_value: f64,
    precision: f64,
    steps: Vec<(f64, StepOutcome<V>)>,
    highest_secure: Option<usize>,
    lowest_insecure: Option<usize>,
}

impl<V> Index<V> {
    /// Create an index over `[min_value, max_value]` with the given target
    /// precision (all in MW).
    pub fn new(min_value: f64, max_value: f64, precision: f64) -> Result<Self, IndexError> {
        if min_value > max_value {
            return Err(IndexError::InvalidBounds {
                min: min_value,
                max: max_value,
            });
        }
        Ok(Self {
            min_value,
            max_value,
            precision,
            steps: Vec::new(),
            highest_secure: None,
            lowest_insecure: None,
        })
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Full tested history, in insertion order.
    pub fn tested_steps(&self) -> &[(f64, StepOutcome<V>)] {
        &self.steps
    }

    /// Highest level with a secure verdict, if any.
    pub fn highest_secure_point(&self) -> Option<(f64, &StepOutcome<V>)> {
        self.highest_secure
            .map(|pos| (self.steps[pos].0, &self.steps[pos].1))
    }

    /// Lowest level found unsecure after validation, if any. Failed steps do
    /// not qualify.
    pub fn lowest_insecure_point(&self) -> Option<(f64, &StepOutcome<V>)> {
        self.lowest_insecure
            .map(|pos| (self.steps[pos].0, &self.steps[pos].1))
    }

    /// Append a tested level and update the brackets.
    ///
    /// # Errors
    ///
    /// Returns an ordering violation when a secure level lands above the
    /// lowest unsecure one (or an unsecure level below the highest secure
    /// one). The step is not recorded in that case.
    pub fn record(&mut self, value: f64, outcome: StepOutcome<V>) -> Result<(), IndexError> {
        let pos = self.steps.len();
        match &outcome {
            StepOutcome::Secure { .. } => {
                if let Some((bound, _)) = self.lowest_insecure_point() {
                    if value > bound {
                        return Err(IndexError::SecureAboveInsecure { value, bound });
                    }
                }
                let advances = self
                    .highest_secure
                    .map_or(true, |current| value >= self.steps[current].0);
                self.steps.push((value, outcome));
                if advances {
                    self.highest_secure = Some(pos);
                }
            }
            StepOutcome::Insecure { .. } => {
                if let Some((bound, _)) = self.highest_secure_point() {
                    if value < bound {
                        return Err(IndexError::InsecureBelowSecure { value, bound });
                    }
                }
                let advances = self
                    .lowest_insecure
                    .map_or(true, |current| value <= self.steps[current].0);
                self.steps.push((value, outcome));
                if advances {
                    self.lowest_insecure = Some(pos);
                }
            }
            StepOutcome::Failed { .. } => {
                self.steps.push((value, outcome));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FailureReason;

    fn secure() -> StepOutcome<()> {
        StepOutcome::Secure { payload: () }
    }

    fn insecure() -> StepOutcome<()> {
        StepOutcome::Insecure { payload: () }
    }

    fn failed(reason: FailureReason) -> StepOutcome<()> {
        StepOutcome::Failed {
            reason,
            message: "step failed".into(),
        }
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = Index::<()>::new(100.0, 0.0, 1.0).unwrap_err();
        assert_eq!(err, IndexError::InvalidBounds { min: 100.0, max: 0.0 });
    }

    #[test]
    fn accepts_degenerate_interval() {
        assert!(Index::<()>::new(50.0, 50.0, 1.0).is_ok());
    }

    #[test]
    fn brackets_start_empty() {
        let index = Index::<()>::new(0.0, 100.0, 1.0).unwrap();
        assert!(index.highest_secure_point().is_none());
        assert!(index.lowest_insecure_point().is_none());
        assert!(index.tested_steps().is_empty());
    }

    #[test]
    fn record_tracks_extreme_brackets() {
        let mut index = Index::new(0.0, 1000.0, 10.0).unwrap();
        index.record(100.0, secure()).unwrap();
        index.record(200.0, secure()).unwrap();
        index.record(800.0, insecure()).unwrap();
        index.record(600.0, insecure()).unwrap();
        assert_eq!(index.highest_secure_point().unwrap().0, 200.0);
        assert_eq!(index.lowest_insecure_point().unwrap().0, 600.0);
        assert_eq!(index.tested_steps().len(), 4);
    }

    #[test]
    fn failed_steps_never_move_brackets() {
        let mut index = Index::new(0.0, 1000.0, 10.0).unwrap();
        index.record(100.0, secure()).unwrap();
        index
            .record(500.0, failed(FailureReason::GlskLimitation))
            .unwrap();
        index
            .record(50.0, failed(FailureReason::ValidationFailed))
            .unwrap();
        assert_eq!(index.highest_secure_point().unwrap().0, 100.0);
        assert!(index.lowest_insecure_point().is_none());
        assert_eq!(index.tested_steps().len(), 3);
    }

    #[test]
    fn secure_above_unsecure_is_a_consistency_error() {
        let mut index = Index::new(0.0, 1000.0, 10.0).unwrap();
        index.record(400.0, insecure()).unwrap();
        let err = index.record(700.0, secure()).unwrap_err();
        assert_eq!(
            err,
            IndexError::SecureAboveInsecure {
                value: 700.0,
                bound: 400.0
            }
        );
        // the offending step must not be recorded
        assert_eq!(index.tested_steps().len(), 1);
    }

    #[test]
    fn unsecure_below_secure_is_a_consistency_error() {
        let mut index = Index::new(0.0, 1000.0, 10.0).unwrap();
        index.record(600.0, secure()).unwrap();
        let err = index.record(300.0, insecure()).unwrap_err();
        assert_eq!(
            err,
            IndexError::InsecureBelowSecure {
                value: 300.0,
                bound: 600.0
            }
        );
    }

    #[test]
    fn equal_secure_and_unsecure_levels_are_accepted() {
        // a converged search may probe the exact boundary from both sides
        let mut index = Index::new(0.0, 1000.0, 10.0).unwrap();
        index.record(500.0, secure()).unwrap();
        index.record(500.0, insecure()).unwrap();
        assert_eq!(index.highest_secure_point().unwrap().0, 500.0);
        assert_eq!(index.lowest_insecure_point().unwrap().0, 500.0);
    }
}
