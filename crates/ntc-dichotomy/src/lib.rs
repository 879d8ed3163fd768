//! # ntc-dichotomy: Exchange Limit Search Engine
//!
//! Computes the maximum cross-border exchange at which a grid remains
//! operationally secure, by dichotomy (bisection) over a scalar exchange
//! level. Each tested level costs one call into an expensive external
//! security oracle, so the engine converges to a target precision within a
//! bounded number of oracle calls, survives oracle failures without aborting,
//! and supports cooperative mid-search cancellation.
//!
//! ## Pieces
//!
//! - [`Index`] — search bounds, required precision, and the full history of
//!   tested exchange levels with their derived secure/insecure brackets.
//! - [`strategy`] — four interchangeable policies deciding the next level to
//!   test and whether the target precision has been reached.
//! - [`StepOutcome`] / [`SearchResult`] — classification of one oracle call,
//!   and the final summary with its single dominant limiting cause.
//! - [`DichotomyEngine`] — the loop: pick a candidate, perturb a scoped model
//!   variant through the [`Shifter`], ask the [`Validator`] for a verdict,
//!   record, repeat.
//! - [`sim`] — a synthetic network and oracle for tests and demos.
//!
//! The engine is single-threaded and synchronous: step *n+1* always depends
//! on the classified outcome of step *n*. Independent searches need
//! independent model instances.

pub mod cancel;
pub mod engine;
pub mod index;
pub mod outcome;
pub mod result;
pub mod sim;
pub mod strategy;

pub use cancel::CancellationToken;
pub use engine::{
    ConfigError, DichotomyEngine, DichotomyError, ShiftError, Shifter, ValidationError, Validator,
};
pub use index::{Index, IndexError};
pub use outcome::{FailureReason, StepOutcome};
pub use result::{LimitingCause, SearchResult};
pub use strategy::{
    BiDirectionalSteps, BiDirectionalStepsWithReference, IndexStrategy, RangeDivision, Steps,
    StrategyError,
};
