use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Success,
    Error,
}

/// User-facing outcome of loading one configured model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub model: String,
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn success(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            level: StatusLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            level: StatusLevel::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }
}
