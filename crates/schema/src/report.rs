use crate::label::ClassLabel;
use crate::prediction::PredictionResult;
use serde::{Deserialize, Serialize};

/// One bar of the confidence comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub model: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Class predicted by the first available model.
    pub reference: ClassLabel,
    /// Fraction of models whose prediction equals `reference`.
    pub agreement: f64,
    /// Confidence of each model at `reference`, in model order.
    pub series: Vec<ChartPoint>,
}

/// Everything produced by one classification pass over an uploaded image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub predictions: Vec<PredictionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ComparisonSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<ClassLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_omits_optional_fields() {
        let json = serde_json::to_value(ClassificationReport::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "predictions": [] }));
    }

    #[test]
    fn test_confidence_lookup_by_label() {
        let mut confidences = vec![0.0; crate::CLASS_COUNT];
        confidences[ClassLabel::LeftShoulder.index()] = 0.8;

        let prediction = PredictionResult {
            model: "VGG16".to_string(),
            class_index: ClassLabel::LeftShoulder.index(),
            label: ClassLabel::LeftShoulder,
            confidences,
        };

        assert_eq!(prediction.confidence_for(ClassLabel::LeftShoulder), 0.8);
        assert_eq!(prediction.confidence_for(ClassLabel::RightHand), 0.0);
    }
}
