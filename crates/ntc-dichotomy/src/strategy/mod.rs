//! Policies deciding which exchange level to test next.
//!
//! All strategies are stateless: the next candidate is derived from the
//! [`Index`] contents alone, so a failed step (which moves no bracket) makes
//! a strategy re-propose the same candidate and the iteration cap bounds the
//! retries.

use thiserror::Error;

use crate::index::Index;

mod bidirectional;
mod range_division;
mod reference;
mod steps;

pub use bidirectional::BiDirectionalSteps;
pub use range_division::RangeDivision;
pub use reference::BiDirectionalStepsWithReference;
pub use steps::Steps;

/// Absolute tolerance for "a bracket sits on a search bound" (MW).
pub const EPSILON: f64 = 1e-3;

/// Errors raised at strategy construction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StrategyError {
    #[error("step size must be positive, got {0} MW")]
    NonPositiveStep(f64),
}

/// Policy for one dichotomy run.
///
/// The single required capability is picking the next exchange level to test;
/// `precision_reached` has a shared default that concrete strategies may
/// override when they derive their own working bounds.
pub trait IndexStrategy<V> {
    /// Next exchange level to test, always within
    /// `[index.min_value(), index.max_value()]`.
    ///
    /// Calling this once `precision_reached` is true is a caller bug; debug
    /// builds assert against it.
    fn next_value(&self, index: &Index<V>) -> f64;

    /// True when the search can stop: the unsecure bracket collapsed onto the
    /// minimum bound, the secure bracket reached the maximum bound, or the
    /// two brackets are closer than the index precision.
    fn precision_reached(&self, index: &Index<V>) -> bool {
        default_precision_reached(index)
    }
}

pub(crate) fn default_precision_reached<V>(index: &Index<V>) -> bool {
    bounds_converged(
        index,
        index.highest_secure_point().map(|(value, _)| value),
        index.lowest_insecure_point().map(|(value, _)| value),
    )
}

/// Shared termination test over an arbitrary [secure-side, unsecure-side]
/// pair of working bounds.
pub(crate) fn bounds_converged<V>(
    index: &Index<V>,
    secure_side: Option<f64>,
    unsecure_side: Option<f64>,
) -> bool {
    if let Some(value) = unsecure_side {
        if (value - index.min_value()).abs() < EPSILON {
            return true;
        }
    }
    if let Some(value) = secure_side {
        if (index.max_value() - value).abs() < EPSILON {
            return true;
        }
    }
    match (secure_side, unsecure_side) {
        (Some(secure), Some(unsecure)) => (unsecure - secure).abs() < index.precision(),
        _ => false,
    }
}

pub(crate) fn midpoint(a: f64, b: f64) -> f64 {
    0.5 * (a + b)
}
