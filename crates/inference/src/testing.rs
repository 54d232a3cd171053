//! Backends for unit tests that need no model runtime.

use crate::backend::InferenceBackend;
use crate::config::LoadOptions;
use preprocess::ImageTensor;

/// Returns the same scores for every image. Loads from comma-separated text.
pub struct FixedScores(pub Vec<f32>);

impl InferenceBackend for FixedScores {
    fn from_bytes(model: &[u8], _options: &LoadOptions) -> anyhow::Result<Self> {
        let scores = std::str::from_utf8(model)?
            .split(',')
            .map(|s| s.trim().parse::<f32>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(scores))
    }

    fn infer(&self, _input: &ImageTensor) -> anyhow::Result<Vec<f32>> {
        Ok(self.0.clone())
    }
}

pub struct FailingBackend;

impl InferenceBackend for FailingBackend {
    fn from_bytes(_model: &[u8], _options: &LoadOptions) -> anyhow::Result<Self> {
        Ok(Self)
    }

    fn infer(&self, _input: &ImageTensor) -> anyhow::Result<Vec<f32>> {
        anyhow::bail!("forward pass crashed")
    }
}

/// Keeps the bytes it was built from so tests can inspect what reached the
/// runtime after the compat fix-up.
pub struct RecordedBytes(pub Vec<u8>);

impl InferenceBackend for RecordedBytes {
    fn from_bytes(model: &[u8], _options: &LoadOptions) -> anyhow::Result<Self> {
        Ok(Self(model.to_vec()))
    }

    fn infer(&self, _input: &ImageTensor) -> anyhow::Result<Vec<f32>> {
        anyhow::bail!("recorded backends do not run")
    }
}

/// Subset of onnx.proto3, enough to build and decode small graphs.
pub mod onnx {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct AttributeProto {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(int64, tag = "3")]
        pub i: i64,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct NodeProto {
        #[prost(string, repeated, tag = "1")]
        pub input: Vec<String>,
        #[prost(string, tag = "3")]
        pub name: String,
        #[prost(string, tag = "4")]
        pub op_type: String,
        #[prost(message, repeated, tag = "5")]
        pub attribute: Vec<AttributeProto>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct GraphProto {
        #[prost(message, repeated, tag = "1")]
        pub node: Vec<NodeProto>,
        #[prost(string, tag = "2")]
        pub name: String,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ModelProto {
        #[prost(int64, tag = "1")]
        pub ir_version: i64,
        #[prost(string, tag = "2")]
        pub producer_name: String,
        #[prost(message, optional, tag = "7")]
        pub graph: Option<GraphProto>,
    }

    pub fn attribute(name: &str, i: i64) -> AttributeProto {
        AttributeProto {
            name: name.to_string(),
            i,
        }
    }

    pub fn node(name: &str, op_type: &str, attribute: Vec<AttributeProto>) -> NodeProto {
        NodeProto {
            input: vec!["x".to_string()],
            name: name.to_string(),
            op_type: op_type.to_string(),
            attribute,
        }
    }

    pub fn model(node: Vec<NodeProto>) -> ModelProto {
        ModelProto {
            ir_version: 7,
            producer_name: "keras2onnx".to_string(),
            graph: Some(GraphProto {
                node,
                name: "classifier".to_string(),
            }),
        }
    }
}
