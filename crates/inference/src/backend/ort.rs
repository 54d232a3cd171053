use super::InferenceBackend;
use crate::config::{ExecutionProvider, LoadOptions};
use ort::{
    session::{
        Session,
        builder::{GraphOptimizationLevel, SessionBuilder},
    },
    value::TensorRef,
};
use preprocess::ImageTensor;
use std::path::Path;
use std::sync::Mutex;

/// ONNX Runtime session for a single-input, single-output classifier.
pub struct OrtBackend {
    // Running a session needs exclusive access
    session: Mutex<Session>,
}

impl OrtBackend {
    fn session_builder(options: &LoadOptions) -> anyhow::Result<SessionBuilder> {
        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        let mut builder = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(options.onnx_threads)?;

        match options.execution_provider {
            ExecutionProvider::Cuda => {
                #[cfg(feature = "cuda")]
                {
                    tracing::info!("Initializing ONNX Runtime with CUDA execution provider");
                    builder = builder.with_execution_providers([
                        ort::execution_providers::CUDAExecutionProvider::default()
                            .with_device_id(0)
                            .build()
                            .error_on_failure(),
                    ])?;
                }
                #[cfg(not(feature = "cuda"))]
                anyhow::bail!("CUDA execution provider requested but built without the `cuda` feature");
            }
            ExecutionProvider::Cpu => {
                tracing::debug!("Initializing ONNX Runtime with CPU execution provider");
            }
        }

        Ok(builder)
    }

    fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

impl InferenceBackend for OrtBackend {
    fn from_bytes(model: &[u8], options: &LoadOptions) -> anyhow::Result<Self> {
        let session = Self::session_builder(options)?.commit_from_memory(model)?;
        Ok(Self::new(session))
    }

    // Lets ONNX Runtime find external-data files next to the model
    fn from_file(path: &Path, options: &LoadOptions) -> anyhow::Result<Self> {
        let session = Self::session_builder(options)?.commit_from_file(path)?;
        Ok(Self::new(session))
    }

    fn infer(&self, input: &ImageTensor) -> anyhow::Result<Vec<f32>> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("ONNX session lock poisoned"))?;

        let outputs = session.run(ort::inputs![TensorRef::from_array_view(input.view())?])?;

        let scores = outputs[0].try_extract_array::<f32>()?;
        Ok(scores.iter().copied().collect())
    }
}
