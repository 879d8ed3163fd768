//! Bi-directional stride search that lets GLSK limitations narrow the
//! interval around a reference exchange.

use crate::index::Index;
use crate::outcome::FailureReason;
use crate::strategy::{bounds_converged, midpoint, IndexStrategy, StrategyError};

/// [`BiDirectionalSteps`](crate::strategy::BiDirectionalSteps) variant for
/// searches anchored to a reference exchange (typically the forecast market
/// position).
///
/// A GLSK limitation is not a security verdict, but a level that cannot be
/// reached by redispatch still constrains where the boundary can be. This
/// strategy therefore works on derived bounds:
///
/// - *highest admissible* — the greater of the highest secure level and the
///   closest GLSK-limited level at or below the reference,
/// - *lowest inadmissible* — the lesser of the lowest unsecure level and the
///   closest GLSK-limited level above the reference,
///
/// and applies the usual stepping, clamping and midpoint rules to them. Both
/// candidate selection and the convergence test use the derived bounds, so
/// GLSK limitations participate in bracket narrowing without ever being
/// conflated with a secure/unsecure verdict.
#[derive(Debug, Clone, Copy)]
pub struct BiDirectionalStepsWithReference {
    start_value: f64,
    step_size: f64,
    reference_exchange: f64,
}

impl BiDirectionalStepsWithReference {
    pub fn new(
        start_value: f64,
        step_size: f64,
        reference_exchange: f64,
    ) -> Result<Self, StrategyError> {
        if step_size <= 0.0 {
            return Err(StrategyError::NonPositiveStep(step_size));
        }
        Ok(Self {
            start_value,
            step_size,
            reference_exchange,
        })
    }

    /// Derived [highest admissible, lowest inadmissible] working bounds.
    fn derived_bounds<V>(&self, index: &Index<V>) -> (Option<f64>, Option<f64>) {
        let mut glsk_below: Option<f64> = None;
        let mut glsk_above: Option<f64> = None;
        for (value, outcome) in index.tested_steps() {
            if outcome.failure_reason() != Some(FailureReason::GlskLimitation) {
                continue;
            }
            if *value <= self.reference_exchange {
                glsk_below = Some(glsk_below.map_or(*value, |best| best.max(*value)));
            } else {
                glsk_above = Some(glsk_above.map_or(*value, |best| best.min(*value)));
            }
        }
        let secure = index.highest_secure_point().map(|(value, _)| value);
        let unsecure = index.lowest_insecure_point().map(|(value, _)| value);
        let highest_admissible = max_opt(secure, glsk_below);
        let lowest_inadmissible = min_opt(unsecure, glsk_above);
        (highest_admissible, lowest_inadmissible)
    }
}

impl<V> IndexStrategy<V> for BiDirectionalStepsWithReference {
    fn next_value(&self, index: &Index<V>) -> f64 {
        debug_assert!(
            !self.precision_reached(index),
            "next_value called after convergence"
        );
        let (admissible, inadmissible) = self.derived_bounds(index);
        match (admissible, inadmissible) {
            (Some(admissible), Some(inadmissible)) => midpoint(admissible, inadmissible),
            (Some(admissible), None) => (admissible + self.step_size).min(index.max_value()),
            (None, Some(inadmissible)) => (inadmissible - self.step_size).max(index.min_value()),
            (None, None) => self.start_value.clamp(index.min_value(), index.max_value()),
        }
    }

    fn precision_reached(&self, index: &Index<V>) -> bool {
        let (admissible, inadmissible) = self.derived_bounds(index);
        bounds_converged(index, admissible, inadmissible)
    }
}

fn max_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

fn min_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}
