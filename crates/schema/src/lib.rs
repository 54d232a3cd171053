//! Data model shared by the classification pipeline and its presentation layer.

mod label;
mod prediction;
mod report;
mod status;

pub use label::{CLASS_COUNT, ClassLabel, LabelError};
pub use prediction::PredictionResult;
pub use report::{ChartPoint, ClassificationReport, ComparisonSummary};
pub use status::{StatusLevel, StatusMessage};
