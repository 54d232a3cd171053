use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of body-region classes every model must score.
pub const CLASS_COUNT: usize = 10;

/// Body-region categories in model output order.
///
/// The discriminant is the output index the models were trained with and must
/// not be reordered. Wire names keep the training-time spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassLabel {
    LeftForearm = 0,
    LeftHand = 1,
    LeftHandElbow = 2,
    #[serde(rename = "LEFT_HAND_FINGURE")]
    LeftHandFinger = 3,
    LeftShoulder = 4,
    RightForearm = 5,
    RightHand = 6,
    RightHandElbow = 7,
    #[serde(rename = "RIGHT_HAND_FINGURE")]
    RightHandFinger = 8,
    RightShoulder = 9,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    #[error("class index {0} is out of range (expected 0..{max})", max = CLASS_COUNT)]
    IndexOutOfRange(usize),

    #[error("unknown class label: {0}")]
    UnknownName(String),
}

impl ClassLabel {
    pub const ALL: [ClassLabel; CLASS_COUNT] = [
        ClassLabel::LeftForearm,
        ClassLabel::LeftHand,
        ClassLabel::LeftHandElbow,
        ClassLabel::LeftHandFinger,
        ClassLabel::LeftShoulder,
        ClassLabel::RightForearm,
        ClassLabel::RightHand,
        ClassLabel::RightHandElbow,
        ClassLabel::RightHandFinger,
        ClassLabel::RightShoulder,
    ];

    pub fn from_index(index: usize) -> Result<Self, LabelError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(LabelError::IndexOutOfRange(index))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassLabel::LeftForearm => "LEFT_FOREARM",
            ClassLabel::LeftHand => "LEFT_HAND",
            ClassLabel::LeftHandElbow => "LEFT_HAND_ELBOW",
            ClassLabel::LeftHandFinger => "LEFT_HAND_FINGURE",
            ClassLabel::LeftShoulder => "LEFT_SHOULDER",
            ClassLabel::RightForearm => "RIGHT_FOREARM",
            ClassLabel::RightHand => "RIGHT_HAND",
            ClassLabel::RightHandElbow => "RIGHT_HAND_ELBOW",
            ClassLabel::RightHandFinger => "RIGHT_HAND_FINGURE",
            ClassLabel::RightShoulder => "RIGHT_SHOULDER",
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassLabel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LabelError::UnknownName(s.to_string()))
    }
}
