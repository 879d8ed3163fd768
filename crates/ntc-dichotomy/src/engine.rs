//! The dichotomy loop: perturb, validate, classify, record.

use thiserror::Error;
use tracing::{debug, info, warn};

use ntc_core::{VariantScope, VariantedModel};

use crate::cancel::CancellationToken;
use crate::index::{Index, IndexError};
use crate::outcome::{FailureReason, StepOutcome};
use crate::result::SearchResult;
use crate::strategy::IndexStrategy;

/// Default iteration budget for one search.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Fewer iterations than this cannot even bracket and bisect once.
pub const MIN_ITERATIONS: usize = 3;

/// Errors raised by a shift request.
#[derive(Debug, Error)]
pub enum ShiftError {
    /// The target exchange cannot be realized within generation/load shift
    /// limits. Classified as a GLSK limitation.
    #[error("shift to {target} MW is infeasible: {reason}")]
    Infeasible { target: f64, reason: String },

    /// Any other shift breakdown. Classified as a validation failure.
    #[error("shift to {target} MW failed: {reason}")]
    Failed { target: f64, reason: String },
}

/// The external validator could not produce a verdict.
#[derive(Debug, Error)]
#[error("validation failed: {0}")]
pub struct ValidationError(pub String);

/// Perturbs a model in place toward a target exchange level.
pub trait Shifter<M> {
    fn shift(&mut self, target_exchange: f64, model: &mut M) -> Result<(), ShiftError>;
}

/// The expensive external security oracle.
///
/// Returns a fully classified [`StepOutcome::Secure`] or
/// [`StepOutcome::Insecure`] with its report payload. The previous step's
/// outcome is passed along so implementations can warm-start.
pub trait Validator<M, V> {
    fn validate(
        &mut self,
        model: &mut M,
        previous: Option<&StepOutcome<V>>,
    ) -> Result<StepOutcome<V>, ValidationError>;
}

/// Engine construction errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("max iterations must be at least {MIN_ITERATIONS}, got {0}")]
    TooFewIterations(usize),
}

/// Unrecoverable errors during a run. Per-iteration oracle failures are *not*
/// errors — they are recorded as `Failed` steps and the search continues.
#[derive(Debug, Error)]
pub enum DichotomyError {
    /// Internal-consistency violation while recording a step; indicates a
    /// logic bug in the strategy or the caller.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Drives one dichotomy search to completion.
///
/// One engine owns one [`Index`]: `run` consumes the engine, so a search can
/// never be resumed or replayed against stale state. The model is borrowed
/// only for the duration of the run; the engine is its sole mutator and every
/// iteration works on a scoped variant that is discarded afterwards.
pub struct DichotomyEngine<V, S, H, L> {
    index: Index<V>,
    strategy: S,
    shifter: H,
    validator: L,
    max_iterations: usize,
    cancellation: CancellationToken,
}

impl<V, S, H, L> DichotomyEngine<V, S, H, L>
where
    V: Clone,
    S: IndexStrategy<V>,
{
    /// Engine with the default iteration budget.
    pub fn new(index: Index<V>, strategy: S, shifter: H, validator: L) -> Self {
        Self {
            index,
            strategy,
            shifter,
            validator,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            cancellation: CancellationToken::new(),
        }
    }

    /// Engine with an explicit iteration budget (at least [`MIN_ITERATIONS`]).
    pub fn with_max_iterations(
        index: Index<V>,
        strategy: S,
        shifter: H,
        validator: L,
        max_iterations: usize,
    ) -> Result<Self, ConfigError> {
        if max_iterations < MIN_ITERATIONS {
            return Err(ConfigError::TooFewIterations(max_iterations));
        }
        let mut engine = Self::new(index, strategy, shifter, validator);
        engine.max_iterations = max_iterations;
        Ok(engine)
    }

    /// Handle for requesting cooperative cancellation from outside the run.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Use an externally owned cancellation token instead of the engine's.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Run the search to convergence, iteration cap, or cancellation.
    ///
    /// # Errors
    ///
    /// Only internal-consistency violations abort the run; every shift or
    /// validation failure is demoted to a recorded `Failed` step.
    pub fn run<M>(mut self, model: &mut M) -> Result<SearchResult<V>, DichotomyError>
    where
        M: VariantedModel,
        H: Shifter<M>,
        L: Validator<M, V>,
    {
        let mut iterations = 0usize;
        let mut cancelled = false;
        while !self.strategy.precision_reached(&self.index) && iterations < self.max_iterations {
            let candidate = self.strategy.next_value(&self.index);
            if self.cancellation.is_cancelled() {
                info!(iterations, "search cancelled, keeping partial bracket");
                cancelled = true;
                break;
            }
            debug!(candidate, iteration = iterations, "testing exchange level");
            let previous = self.index.tested_steps().last().map(|(_, outcome)| outcome);
            let outcome = run_step(
                model,
                &mut self.shifter,
                &mut self.validator,
                candidate,
                previous,
            );
            info!(candidate, outcome = outcome.label(), "dichotomy step done");
            self.index.record(candidate, outcome)?;
            iterations += 1;
        }
        if !cancelled
            && iterations >= self.max_iterations
            && !self.strategy.precision_reached(&self.index)
        {
            warn!(
                max_iterations = self.max_iterations,
                "iteration budget exhausted, returning best-known bracket"
            );
        }
        Ok(SearchResult::from_index(&self.index))
    }
}

/// One perturb-and-validate step on a scoped model variant.
///
/// The variant scope guarantees the original variant is restored and the
/// scoped one discarded on every path out of this function.
fn run_step<M, V, H, L>(
    model: &mut M,
    shifter: &mut H,
    validator: &mut L,
    target: f64,
    previous: Option<&StepOutcome<V>>,
) -> StepOutcome<V>
where
    M: VariantedModel,
    H: Shifter<M>,
    L: Validator<M, V>,
{
    let mut scope = match VariantScope::open(model, "dichotomy") {
        Ok(scope) => scope,
        Err(err) => {
            return StepOutcome::Failed {
                reason: FailureReason::ValidationFailed,
                message: format!("variant setup failed: {err}"),
            }
        }
    };
    if let Err(err) = shifter.shift(target, &mut scope) {
        let reason = match err {
            ShiftError::Infeasible { .. } => FailureReason::GlskLimitation,
            ShiftError::Failed { .. } => FailureReason::ValidationFailed,
        };
        return StepOutcome::Failed {
            reason,
            message: err.to_string(),
        };
    }
    match validator.validate(&mut scope, previous) {
        Ok(outcome) => outcome,
        Err(err) => StepOutcome::Failed {
            reason: FailureReason::ValidationFailed,
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::result::LimitingCause;
    use crate::sim::{LinearShifter, SimNetwork, SimReport, ThresholdValidator};
    use crate::strategy::RangeDivision;

    /// Records whether each call was warm-started.
    struct PreviousProbe {
        inner: ThresholdValidator,
        seen: Arc<Mutex<Vec<bool>>>,
    }

    impl Validator<SimNetwork, SimReport> for PreviousProbe {
        fn validate(
            &mut self,
            model: &mut SimNetwork,
            previous: Option<&StepOutcome<SimReport>>,
        ) -> Result<StepOutcome<SimReport>, ValidationError> {
            self.seen.lock().unwrap().push(previous.is_some());
            self.inner.validate(model, previous)
        }
    }

    /// Always errors out, so no step ever moves a bracket.
    struct BrokenValidator {
        calls: Arc<AtomicUsize>,
    }

    impl Validator<SimNetwork, SimReport> for BrokenValidator {
        fn validate(
            &mut self,
            _model: &mut SimNetwork,
            _previous: Option<&StepOutcome<SimReport>>,
        ) -> Result<StepOutcome<SimReport>, ValidationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ValidationError("optimizer unreachable".into()))
        }
    }

    /// Valid verdicts, but cancels the search after its n-th call.
    struct CancellingValidator {
        inner: ThresholdValidator,
        calls: Arc<AtomicUsize>,
        cancel_after: usize,
        token: CancellationToken,
    }

    impl Validator<SimNetwork, SimReport> for CancellingValidator {
        fn validate(
            &mut self,
            model: &mut SimNetwork,
            previous: Option<&StepOutcome<SimReport>>,
        ) -> Result<StepOutcome<SimReport>, ValidationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call >= self.cancel_after {
                self.token.cancel();
            }
            self.inner.validate(model, previous)
        }
    }

    #[test]
    fn converges_on_the_secure_limit() {
        let index = Index::new(0.0, 1000.0, 10.0).unwrap();
        let engine = DichotomyEngine::new(
            index,
            RangeDivision::new(true),
            LinearShifter::unbounded(),
            ThresholdValidator::new(640.0),
        );
        let mut model = SimNetwork::new(0.0);
        let result = engine.run(&mut model).unwrap();
        assert_eq!(result.limiting_cause(), LimitingCause::CriticalBranch);
        let best_secure = result.best_secure_value().unwrap();
        let best_insecure = result.best_insecure_value().unwrap();
        assert!(best_secure <= 640.0);
        assert!(best_insecure > 640.0);
        assert!(best_insecure - best_secure < 10.0);
    }

    #[test]
    fn run_leaves_the_model_variant_untouched() {
        let index = Index::new(0.0, 1000.0, 10.0).unwrap();
        let engine = DichotomyEngine::new(
            index,
            RangeDivision::new(true),
            LinearShifter::unbounded(),
            ThresholdValidator::new(640.0),
        );
        let mut model = SimNetwork::new(123.0);
        engine.run(&mut model).unwrap();
        assert_eq!(model.working_variant(), SimNetwork::INITIAL_VARIANT);
        assert_eq!(model.exchange(), 123.0);
        assert_eq!(model.variant_count(), 1);
    }

    #[test]
    fn glsk_band_limits_the_search() {
        // everything above 600 MW is infeasible for the shifter, and the grid
        // would still be secure there, so the GLSK band is the limit
        let index = Index::new(0.0, 1000.0, 10.0).unwrap();
        let engine = DichotomyEngine::with_max_iterations(
            index,
            RangeDivision::new(true),
            LinearShifter::new(0.0, 600.0),
            ThresholdValidator::new(800.0),
            10,
        )
        .unwrap();
        let mut model = SimNetwork::new(0.0);
        let result = engine.run(&mut model).unwrap();
        assert_eq!(result.limiting_cause(), LimitingCause::GlskLimitation);
        assert!(result.limiting_message().contains("infeasible"));
    }

    #[test]
    fn iteration_cap_yields_partial_result_without_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let index = Index::new(0.0, 1000.0, 10.0).unwrap();
        let engine = DichotomyEngine::with_max_iterations(
            index,
            RangeDivision::new(true),
            LinearShifter::unbounded(),
            BrokenValidator {
                calls: Arc::clone(&calls),
            },
            5,
        )
        .unwrap();
        let mut model = SimNetwork::new(0.0);
        let result = engine.run(&mut model).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(
            result.limiting_cause(),
            LimitingCause::IndexEvaluationOrMaxIteration
        );
        assert!(!result.has_secure_step());
    }

    #[test]
    fn cancellation_stops_before_the_next_step() {
        let calls = Arc::new(AtomicUsize::new(0));
        let index = Index::new(0.0, 1000.0, 1.0).unwrap();
        let token = CancellationToken::new();
        let engine = DichotomyEngine::new(
            index,
            RangeDivision::new(true),
            LinearShifter::unbounded(),
            CancellingValidator {
                inner: ThresholdValidator::new(640.0),
                calls: Arc::clone(&calls),
                cancel_after: 2,
                token: token.clone(),
            },
        )
        .with_cancellation(token);
        let mut model = SimNetwork::new(0.0);
        let result = engine.run(&mut model).unwrap();
        // exactly two steps were recorded before the flag was honored
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // min secure + max insecure were recorded, so the partial bracket is real
        assert_eq!(result.best_secure_value(), Some(0.0));
        assert_eq!(result.best_insecure_value(), Some(1000.0));
    }

    #[test]
    fn rejects_too_small_iteration_budget() {
        let index = Index::<SimReport>::new(0.0, 1000.0, 10.0).unwrap();
        let err = DichotomyEngine::with_max_iterations(
            index,
            RangeDivision::new(true),
            LinearShifter::unbounded(),
            ThresholdValidator::new(640.0),
            2,
        )
        .err()
        .unwrap();
        assert_eq!(err, ConfigError::TooFewIterations(2));
    }

    #[test]
    fn validator_sees_the_previous_outcome() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let index = Index::new(0.0, 1000.0, 10.0).unwrap();
        let engine = DichotomyEngine::new(
            index,
            RangeDivision::new(true),
            LinearShifter::unbounded(),
            PreviousProbe {
                inner: ThresholdValidator::new(640.0),
                seen: Arc::clone(&seen),
            },
        );
        let mut model = SimNetwork::new(0.0);
        engine.run(&mut model).unwrap();
        let seen = seen.lock().unwrap();
        assert!(seen.len() >= 3);
        assert!(!seen[0], "first step must be cold-started");
        assert!(seen[1..].iter().all(|warm| *warm));
    }
}
