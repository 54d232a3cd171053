use crate::compat::strip_legacy_attribute;
use crate::config::LoadOptions;
use anyhow::Context;
use preprocess::ImageTensor;
use std::path::Path;

#[cfg(feature = "ort-backend")]
pub mod ort;

pub trait InferenceBackend {
    /// Build a session from serialized model bytes
    fn from_bytes(model: &[u8], options: &LoadOptions) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Run one forward pass and return the flattened class scores
    fn infer(&self, input: &ImageTensor) -> anyhow::Result<Vec<f32>>;

    /// Build a session from an artifact on disk. Runtimes that resolve
    /// external weight files relative to the model path should override this.
    fn from_file(path: &Path, options: &LoadOptions) -> anyhow::Result<Self>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read model artifact {}", path.display()))?;
        Self::from_bytes(&bytes, options)
    }

    /// Load an artifact, applying the legacy-attribute fix-up when configured.
    ///
    /// Only a model that actually lost attributes is built from memory; all
    /// others go through [`InferenceBackend::from_file`].
    fn load_model(path: &Path, options: &LoadOptions) -> anyhow::Result<Self>
    where
        Self: Sized,
    {
        let Some(rule) = &options.legacy_attribute else {
            return Self::from_file(path, options);
        };

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read model artifact {}", path.display()))?;
        let stripped = strip_legacy_attribute(&bytes, rule)?;
        if stripped.removed == 0 {
            return Self::from_file(path, options);
        }

        tracing::info!(
            path = %path.display(),
            op_type = %rule.op_type,
            attribute = %rule.attribute,
            removed = stripped.removed,
            "Stripped legacy attributes from model"
        );
        Self::from_bytes(&stripped.model, options)
    }
}
