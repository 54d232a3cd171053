use common::{Environment, LogLevel};
use inference::{ExecutionProvider, LegacyAttributeRule, LoadOptions, ModelSpec};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable naming the optional configuration file.
pub const CONFIG_FILE_VAR: &str = "CLASSIFIER_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "classifier";
const ENV_PREFIX: &str = "CLASSIFIER";

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub model1: ModelConfig,
    pub model2: ModelConfig,
    pub model3: ModelConfig,
    pub comparison_image: Option<PathBuf>,
    pub bind_addr: String,
    pub max_upload_bytes: usize,
    pub onnx_threads: usize,
    pub execution_provider: ExecutionProvider,
    pub legacy_attribute: LegacyAttributeRule,
    pub log_level: LogLevel,
    pub environment: Environment,
    pub otel_endpoint: Option<String>,
}

impl Config {
    /// The three model slots in display order. Every slot needs a path.
    pub fn model_specs(&self) -> Result<Vec<ModelSpec>, config::ConfigError> {
        [
            ("model1", &self.model1),
            ("model2", &self.model2),
            ("model3", &self.model3),
        ]
        .into_iter()
        .map(|(key, model)| {
            let path = model.path.clone().ok_or_else(|| {
                config::ConfigError::Message(format!(
                    "{key}.path is not set; add it to the configuration file or set {ENV_PREFIX}_{}__PATH",
                    key.to_uppercase()
                ))
            })?;
            Ok(ModelSpec::new(model.name.clone(), path))
        })
        .collect()
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            onnx_threads: self.onnx_threads,
            execution_provider: self.execution_provider,
            legacy_attribute: Some(self.legacy_attribute.clone()),
        }
    }
}

/// Read the optional configuration file, then `CLASSIFIER_*` environment
/// variables on top of it. Fails when a model path is missing.
pub fn get_configuration() -> Result<Config, config::ConfigError> {
    let file = std::env::var(CONFIG_FILE_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    let config = config::Config::builder()
        .set_default("model1.name", "VGG16")?
        .set_default("model2.name", "MobileNetV2")?
        .set_default("model3.name", "DenseNet121")?
        .set_default("bind_addr", "0.0.0.0:8080")?
        .set_default("max_upload_bytes", 10 * 1024 * 1024)?
        .set_default("onnx_threads", 1)?
        .set_default("execution_provider", "cpu")?
        .set_default("legacy_attribute.op_type", "DepthwiseConv2D")?
        .set_default("legacy_attribute.attribute", "groups")?
        .set_default("log_level", "info")?
        .set_default("environment", "development")?
        .add_source(config::File::with_name(&file).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = config.try_deserialize::<Config>()?;
    config.model_specs()?;

    Ok(config)
}
