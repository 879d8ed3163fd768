//! Synthetic network and oracle for tests and demos.
//!
//! A stand-in for the real collaborators: the "network" is a single scalar
//! exchange level per variant, the shifter applies the target directly within
//! a configurable redispatch band, and the validator compares the exchange
//! against a fixed secure limit. Deterministic and instantaneous, which makes
//! engine behavior easy to pin down in tests and cheap to demo from the CLI.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use ntc_core::{ModelError, VariantedModel};

use crate::engine::{ShiftError, Shifter, ValidationError, Validator};
use crate::outcome::StepOutcome;

/// In-memory grid model: one exchange level (MW) per named variant.
#[derive(Debug, Clone)]
pub struct SimNetwork {
    variants: HashMap<String, f64>,
    working: String,
}

impl SimNetwork {
    pub const INITIAL_VARIANT: &'static str = "initial";

    pub fn new(initial_exchange: f64) -> Self {
        let mut variants = HashMap::new();
        variants.insert(Self::INITIAL_VARIANT.to_string(), initial_exchange);
        Self {
            variants,
            working: Self::INITIAL_VARIANT.to_string(),
        }
    }

    /// Exchange level of the working variant.
    pub fn exchange(&self) -> f64 {
        self.variants[&self.working]
    }

    pub fn set_exchange(&mut self, exchange: f64) {
        self.variants.insert(self.working.clone(), exchange);
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }
}

impl VariantedModel for SimNetwork {
    fn working_variant(&self) -> String {
        self.working.clone()
    }

    fn clone_variant(&mut self, source: &str, target: &str) -> Result<(), ModelError> {
        if self.variants.contains_key(target) {
            return Err(ModelError::DuplicateVariant(target.to_string()));
        }
        let value = *self
            .variants
            .get(source)
            .ok_or_else(|| ModelError::UnknownVariant(source.to_string()))?;
        self.variants.insert(target.to_string(), value);
        Ok(())
    }

    fn set_working_variant(&mut self, variant: &str) -> Result<(), ModelError> {
        if !self.variants.contains_key(variant) {
            return Err(ModelError::UnknownVariant(variant.to_string()));
        }
        self.working = variant.to_string();
        Ok(())
    }

    fn remove_variant(&mut self, variant: &str) -> Result<(), ModelError> {
        if variant == self.working {
            return Err(ModelError::VariantInUse(variant.to_string()));
        }
        self.variants
            .remove(variant)
            .ok_or_else(|| ModelError::UnknownVariant(variant.to_string()))?;
        Ok(())
    }
}

/// Applies the target exchange directly, rejecting targets outside the
/// redispatch band as GLSK-infeasible.
#[derive(Debug, Clone, Copy)]
pub struct LinearShifter {
    band_min: f64,
    band_max: f64,
}

impl LinearShifter {
    pub fn new(band_min: f64, band_max: f64) -> Self {
        Self { band_min, band_max }
    }

    /// No redispatch limit: every target is feasible.
    pub fn unbounded() -> Self {
        Self {
            band_min: f64::NEG_INFINITY,
            band_max: f64::INFINITY,
        }
    }
}

impl Shifter<SimNetwork> for LinearShifter {
    fn shift(&mut self, target_exchange: f64, model: &mut SimNetwork) -> Result<(), ShiftError> {
        if target_exchange < self.band_min || target_exchange > self.band_max {
            return Err(ShiftError::Infeasible {
                target: target_exchange,
                reason: format!(
                    "outside redispatch band [{}, {}] MW",
                    self.band_min, self.band_max
                ),
            });
        }
        model.set_exchange(target_exchange);
        Ok(())
    }
}

/// Per-step report emitted by the simulated validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimReport {
    /// Exchange level that was validated (MW).
    pub exchange_mw: f64,
    /// Margin to the secure limit; negative when limits are violated (MW).
    pub margin_mw: f64,
    /// Whether a previous outcome was available for warm-starting.
    pub warm_started: bool,
}

/// Secure iff the exchange does not exceed the configured limit.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdValidator {
    secure_limit: f64,
}

impl ThresholdValidator {
    pub fn new(secure_limit: f64) -> Self {
        Self { secure_limit }
    }
}

impl Validator<SimNetwork, SimReport> for ThresholdValidator {
    fn validate(
        &mut self,
        model: &mut SimNetwork,
        previous: Option<&StepOutcome<SimReport>>,
    ) -> Result<StepOutcome<SimReport>, ValidationError> {
        let exchange_mw = model.exchange();
        let margin_mw = self.secure_limit - exchange_mw;
        let payload = SimReport {
            exchange_mw,
            margin_mw,
            warm_started: previous.is_some(),
        };
        if margin_mw >= 0.0 {
            Ok(StepOutcome::Secure { payload })
        } else {
            Ok(StepOutcome::Insecure { payload })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_snapshot_independently() {
        let mut network = SimNetwork::new(100.0);
        network.clone_variant("initial", "probe").unwrap();
        network.set_working_variant("probe").unwrap();
        network.set_exchange(900.0);
        network.set_working_variant("initial").unwrap();
        assert_eq!(network.exchange(), 100.0);
        network.remove_variant("probe").unwrap();
        assert_eq!(network.variant_count(), 1);
    }

    #[test]
    fn working_variant_cannot_be_removed() {
        let mut network = SimNetwork::new(0.0);
        assert!(matches!(
            network.remove_variant("initial"),
            Err(ModelError::VariantInUse(_))
        ));
    }

    #[test]
    fn cloning_onto_an_existing_name_fails() {
        let mut network = SimNetwork::new(0.0);
        network.clone_variant("initial", "probe").unwrap();
        assert!(matches!(
            network.clone_variant("initial", "probe"),
            Err(ModelError::DuplicateVariant(_))
        ));
    }

    #[test]
    fn shifter_enforces_the_band() {
        let mut network = SimNetwork::new(0.0);
        let mut shifter = LinearShifter::new(0.0, 500.0);
        assert!(shifter.shift(400.0, &mut network).is_ok());
        assert_eq!(network.exchange(), 400.0);
        assert!(matches!(
            shifter.shift(600.0, &mut network),
            Err(ShiftError::Infeasible { .. })
        ));
        // a failed shift leaves the model untouched
        assert_eq!(network.exchange(), 400.0);
    }

    #[test]
    fn validator_classifies_around_the_limit() {
        let mut network = SimNetwork::new(0.0);
        let mut validator = ThresholdValidator::new(500.0);

        network.set_exchange(500.0);
        let at_limit = validator.validate(&mut network, None).unwrap();
        assert!(at_limit.is_valid());

        network.set_exchange(500.1);
        let above = validator.validate(&mut network, Some(&at_limit)).unwrap();
        assert!(above.is_insecure());
        let report = above.payload().unwrap();
        assert!(report.margin_mw < 0.0);
        assert!(report.warm_started);
    }
}
