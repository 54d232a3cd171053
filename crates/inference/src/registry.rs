use crate::backend::InferenceBackend;
use crate::config::{LoadOptions, ModelSpec};
use schema::StatusMessage;
use std::path::PathBuf;

/// A classifier that loaded successfully.
pub struct ModelHandle<B> {
    name: String,
    backend: B,
}

impl<B> ModelHandle<B> {
    pub fn new(name: impl Into<String>, backend: B) -> Self {
        Self {
            name: name.into(),
            backend,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

pub enum LoadOutcome<B> {
    Loaded(ModelHandle<B>),
    Unavailable(String),
}

/// One configured model position and what happened when loading it.
pub struct ModelSlot<B> {
    pub name: String,
    pub path: PathBuf,
    pub outcome: LoadOutcome<B>,
}

impl<B> ModelSlot<B> {
    pub fn handle(&self) -> Option<&ModelHandle<B>> {
        match &self.outcome {
            LoadOutcome::Loaded(handle) => Some(handle),
            LoadOutcome::Unavailable(_) => None,
        }
    }

    pub fn status(&self) -> StatusMessage {
        match &self.outcome {
            LoadOutcome::Loaded(_) => StatusMessage::success(
                &self.name,
                format!("Model loaded successfully from {}", self.path.display()),
            ),
            LoadOutcome::Unavailable(reason) => StatusMessage::error(
                &self.name,
                format!(
                    "Error loading model from {}: {}",
                    self.path.display(),
                    reason
                ),
            ),
        }
    }
}

/// Classifiers configured at startup, kept in configuration order.
///
/// Built once and shared read-only; a slot that failed to load stays in the
/// registry as unavailable so the order of the others never shifts.
pub struct ModelRegistry<B> {
    slots: Vec<ModelSlot<B>>,
}

impl<B: InferenceBackend> ModelRegistry<B> {
    /// Load every spec independently. Never fails: problems are recorded per slot.
    pub fn load(specs: &[ModelSpec], options: &LoadOptions) -> Self {
        let slots: Vec<ModelSlot<B>> = specs
            .iter()
            .map(|spec| ModelSlot {
                name: spec.name.clone(),
                path: spec.path.clone(),
                outcome: Self::load_one(spec, options),
            })
            .collect();

        let registry = Self::from_slots(slots);

        tracing::info!(
            configured = specs.len(),
            available = registry.available_count(),
            "Model registry ready"
        );

        registry
    }

    pub fn load_one(spec: &ModelSpec, options: &LoadOptions) -> LoadOutcome<B> {
        let _span = tracing::info_span!("load_model", model = %spec.name).entered();

        if !spec.path.exists() {
            let reason = format!("{} does not exist", spec.path.display());
            tracing::warn!(path = %spec.path.display(), "Model file not found, skipping");
            return LoadOutcome::Unavailable(reason);
        }

        match B::load_model(&spec.path, options) {
            Ok(backend) => {
                tracing::info!(path = %spec.path.display(), "Model loaded successfully");
                LoadOutcome::Loaded(ModelHandle::new(spec.name.clone(), backend))
            }
            Err(e) => {
                tracing::warn!(
                    path = %spec.path.display(),
                    error = %format!("{e:#}"),
                    "Failed to load model, skipping"
                );
                LoadOutcome::Unavailable(format!("{e:#}"))
            }
        }
    }
}

impl<B> ModelRegistry<B> {
    pub fn from_slots(slots: Vec<ModelSlot<B>>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[ModelSlot<B>] {
        &self.slots
    }

    /// Loaded models in configuration order
    pub fn available(&self) -> impl Iterator<Item = &ModelHandle<B>> {
        self.slots.iter().filter_map(ModelSlot::handle)
    }

    pub fn available_count(&self) -> usize {
        self.available().count()
    }

    pub fn status_messages(&self) -> Vec<StatusMessage> {
        self.slots.iter().map(ModelSlot::status).collect()
    }
}
