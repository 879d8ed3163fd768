//! Scoped variant acquisition with guaranteed release.

use std::ops::{Deref, DerefMut};

use tracing::warn;
use uuid::Uuid;

use crate::model::{ModelError, VariantedModel};

/// RAII guard over a scoped model variant.
///
/// `open` clones the working variant under a fresh uuid-suffixed name and
/// activates the clone. While the scope is alive the model derefs to the
/// scoped variant, so all mutations stay isolated. Dropping the scope
/// restores the original working variant and discards the clone; failures
/// during restoration are logged, never propagated (Drop cannot fail).
pub struct VariantScope<'a, M: VariantedModel> {
    model: &'a mut M,
    original: String,
    scoped: String,
}

impl<'a, M: VariantedModel> VariantScope<'a, M> {
    /// Clone the working variant under `prefix-<uuid>` and activate it.
    pub fn open(model: &'a mut M, prefix: &str) -> Result<Self, ModelError> {
        let original = model.working_variant();
        let scoped = format!("{prefix}-{}", Uuid::new_v4());
        model.clone_variant(&original, &scoped)?;
        if let Err(err) = model.set_working_variant(&scoped) {
            // the clone exists but could not be activated; discard it before bailing
            if let Err(cleanup) = model.remove_variant(&scoped) {
                warn!(variant = %scoped, error = %cleanup, "failed to discard stale variant");
            }
            return Err(err);
        }
        Ok(Self {
            model,
            original,
            scoped,
        })
    }

    /// Name of the scoped variant this guard activated.
    pub fn scoped_variant(&self) -> &str {
        &self.scoped
    }

    /// Name of the variant that will be restored on drop.
    pub fn original_variant(&self) -> &str {
        &self.original
    }
}

impl<M: VariantedModel> Deref for VariantScope<'_, M> {
    type Target = M;

    fn deref(&self) -> &M {
        self.model
    }
}

impl<M: VariantedModel> DerefMut for VariantScope<'_, M> {
    fn deref_mut(&mut self) -> &mut M {
        self.model
    }
}

impl<M: VariantedModel> Drop for VariantScope<'_, M> {
    fn drop(&mut self) {
        if let Err(err) = self.model.set_working_variant(&self.original) {
            warn!(variant = %self.original, error = %err, "failed to restore working variant");
        }
        if let Err(err) = self.model.remove_variant(&self.scoped) {
            warn!(variant = %self.scoped, error = %err, "failed to discard scoped variant");
        }
    }
}
