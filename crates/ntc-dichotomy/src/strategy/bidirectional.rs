//! Stride search opening from an arbitrary start level inside the range.

use crate::index::Index;
use crate::strategy::{midpoint, IndexStrategy, StrategyError};

/// Starts anywhere inside the range and steps outward from whichever bracket
/// side is missing — down from the lowest unsecure level, up from the highest
/// secure one, clamped to the bounds — then bisects once both sides exist.
///
/// Suited to searches seeded with a forecast exchange rather than a bound.
#[derive(Debug, Clone, Copy)]
pub struct BiDirectionalSteps {
    start_value: f64,
    step_size: f64,
}

impl BiDirectionalSteps {
    pub fn new(start_value: f64, step_size: f64) -> Result<Self, StrategyError> {
        if step_size <= 0.0 {
            return Err(StrategyError::NonPositiveStep(step_size));
        }
        Ok(Self {
            start_value,
            step_size,
        })
    }
}

impl<V> IndexStrategy<V> for BiDirectionalSteps {
    fn next_value(&self, index: &Index<V>) -> f64 {
        debug_assert!(
            !self.precision_reached(index),
            "next_value called after convergence"
        );
        let secure = index.highest_secure_point().map(|(value, _)| value);
        let unsecure = index.lowest_insecure_point().map(|(value, _)| value);
        match (secure, unsecure) {
            (Some(secure), Some(unsecure)) => midpoint(secure, unsecure),
            (Some(secure), None) => (secure + self.step_size).min(index.max_value()),
            (None, Some(unsecure)) => (unsecure - self.step_size).max(index.min_value()),
            (None, None) => self.start_value.clamp(index.min_value(), index.max_value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::outcome::StepOutcome;

    fn secure() -> StepOutcome<()> {
        StepOutcome::Secure { payload: () }
    }

    fn insecure() -> StepOutcome<()> {
        StepOutcome::Insecure { payload: () }
    }

    #[test]
    fn opens_at_the_start_value() {
        let strategy = BiDirectionalSteps::new(500.0, 100.0).unwrap();
        let index = Index::<()>::new(0.0, 1000.0, 10.0).unwrap();
        assert_eq!(strategy.next_value(&index), 500.0);
    }

    #[test]
    fn start_value_is_clamped_into_the_range() {
        let strategy = BiDirectionalSteps::new(5000.0, 100.0).unwrap();
        let index = Index::<()>::new(0.0, 1000.0, 10.0).unwrap();
        assert_eq!(strategy.next_value(&index), 1000.0);
    }

    #[test]
    fn steps_down_while_only_unsecure_is_known() {
        let strategy = BiDirectionalSteps::new(500.0, 100.0).unwrap();
        let mut index = Index::new(0.0, 1000.0, 10.0).unwrap();
        index.record(500.0, insecure()).unwrap();
        assert_eq!(strategy.next_value(&index), 400.0);
        index.record(400.0, insecure()).unwrap();
        assert_eq!(strategy.next_value(&index), 300.0);
    }

    #[test]
    fn steps_up_while_only_secure_is_known() {
        let strategy = BiDirectionalSteps::new(500.0, 300.0).unwrap();
        let mut index = Index::new(0.0, 1000.0, 10.0).unwrap();
        index.record(500.0, secure()).unwrap();
        assert_eq!(strategy.next_value(&index), 800.0);
        index.record(800.0, secure()).unwrap();
        // clamped: 800 + 300 exceeds the maximum bound
        assert_eq!(strategy.next_value(&index), 1000.0);
    }

    #[test]
    fn bisects_once_both_sides_exist() {
        let strategy = BiDirectionalSteps::new(500.0, 100.0).unwrap();
        let mut index = Index::new(0.0, 1000.0, 10.0).unwrap();
        index.record(500.0, secure()).unwrap();
        index.record(600.0, insecure()).unwrap();
        assert_eq!(strategy.next_value(&index), 550.0);
    }
}
