use crate::label::ClassLabel;
use serde::{Deserialize, Serialize};

/// Output of one model for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub model: String,
    pub class_index: usize,
    pub label: ClassLabel,
    /// One score per [`ClassLabel`], in label order.
    pub confidences: Vec<f32>,
}

impl PredictionResult {
    /// Score the model assigned to `label`.
    pub fn confidence_for(&self, label: ClassLabel) -> f32 {
        self.confidences
            .get(label.index())
            .copied()
            .unwrap_or_default()
    }
}
