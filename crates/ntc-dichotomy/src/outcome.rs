//! Classified outcome of testing one exchange level.

use serde::{Deserialize, Serialize};

/// Why a tested exchange level produced no security verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// The requested perturbation cannot be realized within generation/load
    /// shift limits. A modeling/input limitation, not a bug — the level still
    /// constrains the feasible interval for reference-aware strategies.
    GlskLimitation,
    /// The shift or the validation itself broke down before producing a
    /// verdict (transient/operational failure).
    ValidationFailed,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::GlskLimitation => "glsk-limitation",
            FailureReason::ValidationFailed => "validation-failed",
        }
    }
}

/// Result of one dichotomy step.
///
/// `V` is the validator's report payload; the engine carries it through
/// without ever inspecting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepOutcome<V> {
    /// Validation ran and found the grid secure at this level.
    Secure { payload: V },
    /// Validation ran and found operational limits violated. This is a valid,
    /// informative result — not a failure.
    Insecure { payload: V },
    /// No verdict could be produced at this level.
    Failed { reason: FailureReason, message: String },
}

impl<V> StepOutcome<V> {
    /// True only for [`StepOutcome::Secure`].
    pub fn is_valid(&self) -> bool {
        matches!(self, StepOutcome::Secure { .. })
    }

    /// True only for [`StepOutcome::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }

    /// True only for [`StepOutcome::Insecure`] (unsecure after validation).
    pub fn is_insecure(&self) -> bool {
        matches!(self, StepOutcome::Insecure { .. })
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            StepOutcome::Failed { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            StepOutcome::Failed { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Validator payload, when a verdict was produced.
    pub fn payload(&self) -> Option<&V> {
        match self {
            StepOutcome::Secure { payload } | StepOutcome::Insecure { payload } => Some(payload),
            StepOutcome::Failed { .. } => None,
        }
    }

    /// Short label for logs and run records.
    pub fn label(&self) -> &'static str {
        match self {
            StepOutcome::Secure { .. } => "secure",
            StepOutcome::Insecure { .. } => "unsecure",
            StepOutcome::Failed { reason, .. } => reason.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_secure_is_valid() {
        assert!(StepOutcome::Secure { payload: () }.is_valid());
        assert!(!StepOutcome::Insecure { payload: () }.is_valid());
        assert!(!StepOutcome::<()>::Failed {
            reason: FailureReason::GlskLimitation,
            message: "band exhausted".into(),
        }
        .is_valid());
    }

    #[test]
    fn insecure_is_not_failed() {
        let outcome = StepOutcome::Insecure { payload: 42u32 };
        assert!(!outcome.is_failed());
        assert!(outcome.is_insecure());
        assert_eq!(outcome.payload(), Some(&42));
    }

    #[test]
    fn failed_carries_reason_and_message() {
        let outcome = StepOutcome::<()>::Failed {
            reason: FailureReason::ValidationFailed,
            message: "optimizer timed out".into(),
        };
        assert!(outcome.is_failed());
        assert_eq!(outcome.failure_reason(), Some(FailureReason::ValidationFailed));
        assert_eq!(outcome.failure_message(), Some("optimizer timed out"));
        assert!(outcome.payload().is_none());
        assert_eq!(outcome.label(), "validation-failed");
    }
}
