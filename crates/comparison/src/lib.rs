//! Cross-model comparison of the predictions for one image.

use schema::{ChartPoint, ClassLabel, ComparisonSummary, PredictionResult};

/// Compare the predictions of every model that ran, in model order.
///
/// The first prediction is the reference. `agreement` counts the results
/// that predicted the same class as the reference (the reference included),
/// so it is always 1.0 for a single model and says nothing about whether
/// the reference is correct. Returns `None` when no model produced a result.
pub fn summarize(predictions: &[PredictionResult]) -> Option<ComparisonSummary> {
    let reference = predictions.first()?.label;

    let agreement = fraction_matching(predictions, reference);

    let series = predictions
        .iter()
        .map(|p| ChartPoint {
            model: p.model.clone(),
            confidence: p.confidence_for(reference),
        })
        .collect();

    tracing::debug!(
        reference = %reference,
        agreement,
        models = predictions.len(),
        "Comparison summary"
    );

    Some(ComparisonSummary {
        reference,
        agreement,
        series,
    })
}

/// Fraction of models that predicted `expected`.
pub fn accuracy_against(predictions: &[PredictionResult], expected: ClassLabel) -> Option<f64> {
    if predictions.is_empty() {
        return None;
    }
    Some(fraction_matching(predictions, expected))
}

fn fraction_matching(predictions: &[PredictionResult], label: ClassLabel) -> f64 {
    let matching = predictions.iter().filter(|p| p.label == label).count();
    matching as f64 / predictions.len() as f64
}
