//! Classic interval halving: probe both bounds, then bisect.

use crate::index::Index;
use crate::strategy::{midpoint, IndexStrategy};

/// Probes the starting bound, then the opposite bound, then the midpoint of
/// the current [secure, unsecure] bracket.
#[derive(Debug, Clone, Copy)]
pub struct RangeDivision {
    start_with_min: bool,
}

impl RangeDivision {
    pub fn new(start_with_min: bool) -> Self {
        Self { start_with_min }
    }
}

impl<V> IndexStrategy<V> for RangeDivision {
    fn next_value(&self, index: &Index<V>) -> f64 {
        debug_assert!(
            !self.precision_reached(index),
            "next_value called after convergence"
        );
        let (first, second) = if self.start_with_min {
            (index.min_value(), index.max_value())
        } else {
            (index.max_value(), index.min_value())
        };
        let steps = index.tested_steps();
        if steps.is_empty() {
            return first;
        }
        if steps.len() == 1 {
            return second;
        }
        let secure = index.highest_secure_point().map(|(value, _)| value);
        let unsecure = index.lowest_insecure_point().map(|(value, _)| value);
        match (secure, unsecure) {
            (Some(secure), Some(unsecure)) => midpoint(secure, unsecure),
            // a bracket side is still missing after both bounds were probed,
            // so some step failed; re-propose the missing side's bound
            (Some(_), None) => index.max_value(),
            (None, Some(_)) => index.min_value(),
            (None, None) => {
                if steps.len() % 2 == 0 {
                    first
                } else {
                    second
                }
            }
        }
    }
}
