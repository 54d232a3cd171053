pub mod backend;
pub mod compat;
pub mod config;
pub mod registry;
pub mod runner;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use backend::InferenceBackend;
#[cfg(feature = "ort-backend")]
pub use backend::ort::OrtBackend;
pub use compat::LegacyAttributeRule;
pub use config::{ExecutionProvider, LoadOptions, ModelSpec};
pub use registry::{LoadOutcome, ModelHandle, ModelRegistry, ModelSlot};
pub use runner::{argmax, predict, predict_all};
