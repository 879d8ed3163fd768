//! Opaque grid model with named, independently mutable variants.

use thiserror::Error;

/// Errors raised by variant bookkeeping on a grid model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The named variant does not exist on this model.
    #[error("unknown variant '{0}'")]
    UnknownVariant(String),

    /// A variant with this name already exists.
    #[error("variant '{0}' already exists")]
    DuplicateVariant(String),

    /// The working variant cannot be removed while it is active.
    #[error("variant '{0}' is the working variant and cannot be removed")]
    VariantInUse(String),

    /// Backend-specific failure (storage, IPC to a remote model host, ...).
    #[error("model error: {0}")]
    Backend(String),
}

/// A grid model exposing named-variant snapshots.
///
/// Implementations own whatever state a "variant" snapshots; this crate never
/// inspects it. The contract is:
///
/// - exactly one variant is *working* (active) at any time,
/// - `clone_variant` copies the full state of `source` under the new name
///   `target` without activating it,
/// - mutations performed by callers apply to the working variant only.
pub trait VariantedModel {
    /// Name of the currently active variant.
    fn working_variant(&self) -> String;

    /// Copy `source`'s state under the new name `target`.
    fn clone_variant(&mut self, source: &str, target: &str) -> Result<(), ModelError>;

    /// Make `variant` the working variant.
    fn set_working_variant(&mut self, variant: &str) -> Result<(), ModelError>;

    /// Discard `variant`. Removing the working variant is an error.
    fn remove_variant(&mut self, variant: &str) -> Result<(), ModelError>;
}
