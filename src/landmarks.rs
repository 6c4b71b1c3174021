// src/landmarks.rs - Hand joint model delivered by the landmark source
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl Finger {
    /// Fingers in feature-vector order.
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Little,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Little => "little",
        }
    }

    pub fn tip(self) -> HandJoint {
        match self {
            Self::Thumb => HandJoint::ThumbTip,
            Self::Index => HandJoint::IndexTip,
            Self::Middle => HandJoint::MiddleTip,
            Self::Ring => HandJoint::RingTip,
            Self::Little => HandJoint::LittleTip,
        }
    }

    /// Joint compared against the tip when deciding extension.
    /// MCP for the four fingers, MP for the thumb.
    pub fn knuckle(self) -> HandJoint {
        match self {
            Self::Thumb => HandJoint::ThumbMp,
            Self::Index => HandJoint::IndexMcp,
            Self::Middle => HandJoint::MiddleMcp,
            Self::Ring => HandJoint::RingMcp,
            Self::Little => HandJoint::LittleMcp,
        }
    }

    /// All joints of the finger, base to tip.
    pub fn joints(self) -> [HandJoint; 4] {
        match self {
            Self::Thumb => [
                HandJoint::ThumbCmc,
                HandJoint::ThumbMp,
                HandJoint::ThumbIp,
                HandJoint::ThumbTip,
            ],
            Self::Index => [
                HandJoint::IndexMcp,
                HandJoint::IndexPip,
                HandJoint::IndexDip,
                HandJoint::IndexTip,
            ],
            Self::Middle => [
                HandJoint::MiddleMcp,
                HandJoint::MiddlePip,
                HandJoint::MiddleDip,
                HandJoint::MiddleTip,
            ],
            Self::Ring => [
                HandJoint::RingMcp,
                HandJoint::RingPip,
                HandJoint::RingDip,
                HandJoint::RingTip,
            ],
            Self::Little => [
                HandJoint::LittleMcp,
                HandJoint::LittlePip,
                HandJoint::LittleDip,
                HandJoint::LittleTip,
            ],
        }
    }
}

/// The 21 named points a hand-pose model reports for one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandJoint {
    Wrist,
    ThumbCmc,
    ThumbMp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    LittleMcp,
    LittlePip,
    LittleDip,
    LittleTip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chirality {
    Left,
    Right,
}

impl Chirality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized image coordinates.
    pub position: Point2<f64>,
    pub confidence: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self {
            position: Point2::new(x, y),
            confidence,
        }
    }
}

/// One detected hand in one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chirality: Option<Chirality>,
    pub joints: HashMap<HandJoint, Landmark>,
}

impl HandObservation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chirality(mut self, chirality: Chirality) -> Self {
        self.chirality = Some(chirality);
        self
    }

    pub fn insert(&mut self, joint: HandJoint, x: f64, y: f64, confidence: f64) {
        self.joints.insert(joint, Landmark::new(x, y, confidence));
    }

    pub fn landmark(&self, joint: HandJoint) -> Option<&Landmark> {
        self.joints.get(&joint)
    }

    /// Position of `joint` if it was reported with confidence above `threshold`.
    pub fn confident(&self, joint: HandJoint, threshold: f64) -> Option<Point2<f64>> {
        self.joints
            .get(&joint)
            .filter(|lm| lm.confidence > threshold)
            .map(|lm| lm.position)
    }

    /// Whether the source reported any joint of `finger` at all.
    pub fn has_finger(&self, finger: Finger) -> bool {
        finger.joints().iter().any(|j| self.joints.contains_key(j))
    }
}

/// Everything the landmark source reports for one captured frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Seconds since the start of capture.
    pub timestamp: f64,
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

impl LandmarkFrame {
    pub fn new(timestamp: f64, hands: Vec<HandObservation>) -> Self {
        Self { timestamp, hands }
    }
}
