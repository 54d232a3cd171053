use crate::chart::{BarChart, bar_chart};
use base64::{Engine, engine::general_purpose::STANDARD};
use image::ImageFormat;
use minijinja::Environment;
use schema::{ClassLabel, ClassificationReport, StatusMessage};
use serde::Serialize;
use std::path::Path;

const INDEX: &str = "index.html";
const CHART: &str = "chart.html";

/// Compiled page templates.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> anyhow::Result<Self> {
        let mut env = Environment::new();
        env.add_template(INDEX, include_str!("../templates/index.html"))?;
        env.add_template(CHART, include_str!("../templates/chart.html"))?;
        Ok(Self { env })
    }

    pub fn render(&self, view: &PageView<'_>) -> anyhow::Result<String> {
        let html = self.env.get_template(INDEX)?.render(view)?;
        Ok(html)
    }
}

#[derive(Debug, Serialize)]
pub struct ComparisonPanel {
    pub available: bool,
    pub error: Option<String>,
}

impl ComparisonPanel {
    pub fn for_path(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path.is_file() => Self {
                available: true,
                error: None,
            },
            Some(path) => Self {
                available: false,
                error: Some(format!("Error: {} does not exist.", path.display())),
            },
            None => Self {
                available: false,
                error: Some("Error: no comparison image is configured.".to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionLine {
    pub model: String,
    pub label: ClassLabel,
}

/// Everything shown for one classified upload.
#[derive(Debug, Serialize)]
pub struct ResultView {
    pub preview: String,
    pub predictions: Vec<PredictionLine>,
    pub agreement: Option<String>,
    pub expected: Option<ClassLabel>,
    pub accuracy: Option<String>,
    pub chart: Option<BarChart>,
}

impl ResultView {
    pub fn new(report: &ClassificationReport, upload: &[u8], format: ImageFormat) -> Self {
        let preview = format!(
            "data:{};base64,{}",
            format.to_mime_type(),
            STANDARD.encode(upload)
        );

        let predictions = report
            .predictions
            .iter()
            .map(|p| PredictionLine {
                model: p.model.clone(),
                label: p.label,
            })
            .collect();

        Self {
            preview,
            predictions,
            agreement: report.summary.as_ref().map(|s| format!("{:.2}", s.agreement)),
            expected: report.expected,
            accuracy: report.accuracy.map(|a| format!("{a:.2}")),
            chart: report
                .summary
                .as_ref()
                .and_then(|s| bar_chart(&s.series)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    pub statuses: &'a [StatusMessage],
    pub labels: &'static [ClassLabel],
    pub comparison: ComparisonPanel,
    pub result: Option<ResultView>,
}

impl<'a> PageView<'a> {
    pub fn new(statuses: &'a [StatusMessage], comparison: ComparisonPanel) -> Self {
        Self {
            statuses,
            labels: &ClassLabel::ALL,
            comparison,
            result: None,
        }
    }

    pub fn with_result(mut self, result: ResultView) -> Self {
        self.result = Some(result);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{ChartPoint, ComparisonSummary, PredictionResult, CLASS_COUNT};
    use tempfile::NamedTempFile;

    fn report() -> ClassificationReport {
        let mut confidences = vec![0.0; CLASS_COUNT];
        confidences[ClassLabel::LeftHandFinger.index()] = 0.875;
        ClassificationReport {
            predictions: vec![PredictionResult {
                model: "VGG16".to_string(),
                class_index: ClassLabel::LeftHandFinger.index(),
                label: ClassLabel::LeftHandFinger,
                confidences,
            }],
            summary: Some(ComparisonSummary {
                reference: ClassLabel::LeftHandFinger,
                agreement: 1.0,
                series: vec![ChartPoint {
                    model: "VGG16".to_string(),
                    confidence: 0.875,
                }],
            }),
            expected: None,
            accuracy: None,
        }
    }

    #[test]
    fn test_renders_predictions_and_chart() {
        let pages = Pages::new().unwrap();
        let statuses = [StatusMessage::success(
            "VGG16",
            "Model loaded successfully from /models/vgg16.onnx",
        )];
        let view = PageView::new(&statuses, ComparisonPanel::for_path(None))
            .with_result(ResultView::new(&report(), b"\x89PNG", ImageFormat::Png));

        let html = pages.render(&view).unwrap();

        assert!(html.contains("VGG16 Prediction: LEFT_HAND_FINGURE"));
        assert!(html.contains("Agreement: 1.00"));
        assert!(!html.contains("Accuracy:"), "Accuracy needs an expected label");
        assert!(html.contains("Prediction Confidence Comparison"));
        assert!(html.contains("0.88"), "Bar labels use two decimals");
        assert!(html.contains("data:image/png;base64,iVBORw=="));
        assert!(html.contains("Model loaded successfully from"));
        assert!(html.contains("vgg16.onnx"));
    }

    #[test]
    fn test_heading_and_classifying_notice() {
        let pages = Pages::new().unwrap();
        let view = PageView::new(&[], ComparisonPanel::for_path(None));

        let html = pages.render(&view).unwrap();

        assert!(html.contains("<h1>CLASSIFICATION OF MEDICAL IMAGE BASED ON TEXTURE ANALYSIS</h1>"));
        assert!(
            html.contains(r#"<p class="notice" id="classifying" hidden>Classifying...</p>"#),
            "The notice stays hidden until the form is submitted"
        );
        assert!(html.contains("getElementById('classifying').hidden = false"));
    }

    #[test]
    fn test_status_text_is_escaped() {
        let pages = Pages::new().unwrap();
        let statuses = [StatusMessage::error(
            "VGG16",
            "Error loading model from <script>.onnx: bad",
        )];
        let view = PageView::new(&statuses, ComparisonPanel::for_path(None));

        let html = pages.render(&view).unwrap();

        assert!(!html.contains("<script>.onnx"));
        assert!(html.contains("&lt;script&gt;.onnx"));
    }

    #[test]
    fn test_comparison_panel() {
        let present = NamedTempFile::new().unwrap();
        let panel = ComparisonPanel::for_path(Some(present.path()));
        assert!(panel.available);
        assert!(panel.error.is_none());

        let panel = ComparisonPanel::for_path(Some(Path::new("/nonexistent/comparison.png")));
        assert!(!panel.available);
        assert_eq!(
            panel.error.as_deref(),
            Some("Error: /nonexistent/comparison.png does not exist.")
        );
    }
}
