use inference::{InferenceBackend, LoadOptions, LoadOutcome, ModelHandle, ModelRegistry, ModelSlot};
use preprocess::ImageTensor;

pub enum StubBackend {
    Scores(Vec<f32>),
    Failing,
}

impl InferenceBackend for StubBackend {
    fn from_bytes(_model: &[u8], _options: &LoadOptions) -> anyhow::Result<Self> {
        anyhow::bail!("stub backends are built in memory")
    }

    fn infer(&self, _input: &ImageTensor) -> anyhow::Result<Vec<f32>> {
        match self {
            StubBackend::Scores(scores) => Ok(scores.clone()),
            StubBackend::Failing => anyhow::bail!("forward pass crashed"),
        }
    }
}

/// Registry with one slot per entry; `None` marks a model that failed to load.
pub fn registry(models: Vec<(&str, Option<StubBackend>)>) -> ModelRegistry<StubBackend> {
    let slots = models
        .into_iter()
        .map(|(name, backend)| ModelSlot {
            name: name.to_string(),
            path: format!("/models/{name}.onnx").into(),
            outcome: match backend {
                Some(backend) => LoadOutcome::Loaded(ModelHandle::new(name, backend)),
                None => LoadOutcome::Unavailable(format!("/models/{name}.onnx does not exist")),
            },
        })
        .collect();
    ModelRegistry::from_slots(slots)
}
