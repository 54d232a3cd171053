use crate::backend::InferenceBackend;
use crate::registry::{ModelHandle, ModelRegistry};
use anyhow::Context;
use preprocess::ImageTensor;
use schema::{CLASS_COUNT, ClassLabel, PredictionResult};

/// Index of the highest score; ties go to the lowest index.
///
/// The result is unspecified when `scores` contains NaN; [`predict`] rejects
/// non-finite scores before calling this.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Run one model on one image.
///
/// Errors are not recovered here: a failing forward pass aborts the request.
pub fn predict<B: InferenceBackend>(
    tensor: &ImageTensor,
    model: &ModelHandle<B>,
) -> anyhow::Result<PredictionResult> {
    let _span = tracing::info_span!("model_inference", model = %model.name()).entered();

    let confidences = model
        .backend()
        .infer(tensor)
        .with_context(|| format!("Inference failed for model {}", model.name()))?;

    if confidences.len() != CLASS_COUNT {
        anyhow::bail!(
            "Model {} returned {} scores, expected {}",
            model.name(),
            confidences.len(),
            CLASS_COUNT
        );
    }

    if let Some(i) = confidences.iter().position(|score| !score.is_finite()) {
        anyhow::bail!(
            "Model {} returned a non-finite score for class {}",
            model.name(),
            i
        );
    }

    let class_index = argmax(&confidences)
        .ok_or_else(|| anyhow::anyhow!("Model {} returned no scores", model.name()))?;
    let label = ClassLabel::from_index(class_index)?;

    tracing::debug!(
        class_index,
        label = %label,
        confidence = confidences[class_index],
        "Prediction"
    );

    Ok(PredictionResult {
        model: model.name().to_string(),
        class_index,
        label,
        confidences,
    })
}

/// Run every available model in registry order, stopping at the first failure.
pub fn predict_all<B: InferenceBackend>(
    tensor: &ImageTensor,
    registry: &ModelRegistry<B>,
) -> anyhow::Result<Vec<PredictionResult>> {
    registry
        .available()
        .map(|model| predict(tensor, model))
        .collect()
}
