// src/classifier.rs - Exact template matching of extension vectors
use crate::features::FingerExtension;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Victory,
    ThumbsUp,
}

impl Gesture {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Victory => "victory",
            Self::ThumbsUp => "thumbs_up",
        }
    }

    pub fn template(self) -> FingerExtension {
        GESTURE_TEMPLATES
            .iter()
            .find(|t| t.gesture == self)
            .map(|t| t.fingers)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureTemplate {
    pub gesture: Gesture,
    pub fingers: FingerExtension,
}

/// Every recognised gesture and the exact vector it requires.
pub const GESTURE_TEMPLATES: &[GestureTemplate] = &[
    GestureTemplate {
        gesture: Gesture::Victory,
        fingers: FingerExtension::new(false, true, true, false, false),
    },
    GestureTemplate {
        gesture: Gesture::ThumbsUp,
        fingers: FingerExtension::new(true, false, false, false, false),
    },
];

pub fn matches(gesture: Gesture, fingers: &FingerExtension) -> bool {
    gesture.template() == *fingers
}

/// All gestures whose template equals `fingers`.
pub fn classify(fingers: &FingerExtension) -> Vec<Gesture> {
    GESTURE_TEMPLATES
        .iter()
        .filter(|t| t.fingers == *fingers)
        .map(|t| t.gesture)
        .collect()
}

/// Number of hands in a frame matching `gesture`. Hands without a vector never match.
pub fn count_matches(vectors: &[Option<FingerExtension>], gesture: Gesture) -> usize {
    vectors
        .iter()
        .flatten()
        .filter(|fingers| matches(gesture, fingers))
        .count()
}
