//! Fixed-stride walk from one bound, switching to bisection once bracketed.

use crate::index::Index;
use crate::strategy::{midpoint, IndexStrategy, StrategyError};

/// Walks from the starting bound in `step_size` increments (clamped to the
/// search bounds) until both a secure and an unsecure level exist, then
/// bisects the bracket like [`RangeDivision`](crate::strategy::RangeDivision).
///
/// Useful when the boundary is expected close to one bound: the walk gives a
/// cheap coarse localization before bisection spends oracle calls.
#[derive(Debug, Clone, Copy)]
pub struct Steps {
    start_with_min: bool,
    step_size: f64,
}

impl Steps {
    pub fn new(start_with_min: bool, step_size: f64) -> Result<Self, StrategyError> {
        if step_size <= 0.0 {
            return Err(StrategyError::NonPositiveStep(step_size));
        }
        Ok(Self {
            start_with_min,
            step_size,
        })
    }
}

impl<V> IndexStrategy<V> for Steps {
    fn next_value(&self, index: &Index<V>) -> f64 {
        debug_assert!(
            !self.precision_reached(index),
            "next_value called after convergence"
        );
        let secure = index.highest_secure_point().map(|(value, _)| value);
        let unsecure = index.lowest_insecure_point().map(|(value, _)| value);
        match (secure, unsecure) {
            (Some(secure), Some(unsecure)) => midpoint(secure, unsecure),
            _ if self.start_with_min => match secure {
                None => index.min_value(),
                Some(secure) => (secure + self.step_size).min(index.max_value()),
            },
            _ => match unsecure {
                None => index.max_value(),
                Some(unsecure) => (unsecure - self.step_size).max(index.min_value()),
            },
        }
    }
}
