use crate::compat::LegacyAttributeRule;
use serde::Deserialize;
use std::path::PathBuf;

/// One configured classifier: display name plus artifact location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub path: PathBuf,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionProvider {
    #[default]
    Cpu,
    Cuda,
}

/// Settings shared by every model load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub onnx_threads: usize,
    pub execution_provider: ExecutionProvider,
    /// Attribute to strip from legacy nodes before building a session
    pub legacy_attribute: Option<LegacyAttributeRule>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            onnx_threads: 1,
            execution_provider: ExecutionProvider::Cpu,
            legacy_attribute: Some(LegacyAttributeRule::default()),
        }
    }
}
