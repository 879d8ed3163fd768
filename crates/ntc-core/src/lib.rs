//! # ntc-core: Grid Model Abstraction
//!
//! Shared model surface for the NTC toolkit. The grid model itself is opaque
//! here: load-flow physics, file formats and remedial-action optimization all
//! live behind external collaborators. What this crate pins down is the one
//! capability every collaborator relies on, **named variants** — independently
//! mutable snapshots of a model's state that can be cloned, activated and
//! discarded by name.
//!
//! ## Variant discipline
//!
//! Algorithms that perturb a model must never contaminate the variant they
//! started from. [`VariantScope`] enforces this as a scoped resource: opening
//! a scope clones the working variant under a fresh name and activates it,
//! and dropping the scope restores the original variant and discards the
//! clone on every exit path, early returns and panics included.
//!
//! ```
//! use ntc_core::{VariantScope, VariantedModel};
//!
//! fn perturb<M: VariantedModel>(model: &mut M) -> Result<(), ntc_core::ModelError> {
//!     let scope = VariantScope::open(model, "perturbation")?;
//!     // mutate through the scope; the working variant is the scoped clone
//!     drop(scope); // original variant is active again, clone discarded
//!     Ok(())
//! }
//! ```

pub mod model;
pub mod variant;

pub use model::{ModelError, VariantedModel};
pub use variant::VariantScope;
