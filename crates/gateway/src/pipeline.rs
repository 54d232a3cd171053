use image::DynamicImage;
use inference::{InferenceBackend, ModelRegistry};
use schema::{ClassLabel, ClassificationReport};

/// One classification pass: preprocess once, run every available model in
/// order, then compare their outputs.
pub fn classify<B: InferenceBackend>(
    image: &DynamicImage,
    registry: &ModelRegistry<B>,
    expected: Option<ClassLabel>,
) -> anyhow::Result<ClassificationReport> {
    let _span = common::span!("classify");

    let tensor = preprocess::normalize(image)?;
    let predictions = inference::predict_all(&tensor, registry)?;

    let summary = comparison::summarize(&predictions);
    let accuracy = expected.and_then(|label| comparison::accuracy_against(&predictions, label));

    tracing::info!(
        models = predictions.len(),
        agreement = summary.as_ref().map(|s| s.agreement),
        "Classification complete"
    );

    Ok(ClassificationReport {
        predictions,
        summary,
        expected,
        accuracy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubBackend, registry};
    use image::{GrayImage, RgbaImage};
    use schema::CLASS_COUNT;

    fn one_hot(index: usize, value: f32) -> Vec<f32> {
        let mut scores = vec![0.0; CLASS_COUNT];
        scores[index] = value;
        scores
    }

    #[test]
    fn test_report_for_three_models() {
        let registry = registry(vec![
            ("VGG16", Some(StubBackend::Scores(one_hot(1, 0.9)))),
            ("MobileNetV2", Some(StubBackend::Scores(one_hot(1, 0.7)))),
            ("DenseNet121", Some(StubBackend::Scores(one_hot(4, 0.8)))),
        ]);
        let image = DynamicImage::ImageRgb8(image::RgbImage::new(300, 200));

        let report = classify(&image, &registry, Some(ClassLabel::LeftShoulder)).unwrap();

        assert_eq!(report.predictions.len(), 3);
        let summary = report.summary.unwrap();
        assert_eq!(summary.reference, ClassLabel::LeftHand);
        assert!((summary.agreement - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.expected, Some(ClassLabel::LeftShoulder));
        assert!((report.accuracy.unwrap() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_models_gives_empty_report() {
        let registry = registry(vec![("VGG16", None), ("MobileNetV2", None)]);
        let image = DynamicImage::ImageLuma8(GrayImage::new(32, 32));

        let report = classify(&image, &registry, Some(ClassLabel::LeftHand)).unwrap();

        assert!(report.predictions.is_empty());
        assert!(report.summary.is_none(), "No models means no comparison");
        assert!(report.accuracy.is_none());
    }

    #[test]
    fn test_rgba_upload_is_accepted() {
        let registry = registry(vec![("VGG16", Some(StubBackend::Scores(one_hot(9, 0.5))))]);
        let image = DynamicImage::ImageRgba8(RgbaImage::new(10, 40));

        let report = classify(&image, &registry, None).unwrap();

        assert_eq!(report.predictions[0].label, ClassLabel::RightShoulder);
        assert_eq!(report.summary.unwrap().agreement, 1.0);
        assert!(report.accuracy.is_none());
    }

    #[test]
    fn test_failing_model_fails_the_pass() {
        let registry = registry(vec![
            ("VGG16", Some(StubBackend::Scores(one_hot(0, 1.0)))),
            ("MobileNetV2", Some(StubBackend::Failing)),
        ]);
        let image = DynamicImage::ImageRgb8(image::RgbImage::new(16, 16));

        let err = classify(&image, &registry, None).unwrap_err();

        assert!(format!("{err:#}").contains("MobileNetV2"));
    }
}
