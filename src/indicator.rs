// src/indicator.rs - Selected target pose with a hold timer
use crate::tracking::FrameSummary;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PoseTarget {
    #[default]
    TwoHands,
    Victory,
    ThumbsUp,
    Wiggle,
}

impl PoseTarget {
    pub fn title(self) -> &'static str {
        match self {
            Self::TwoHands => "Two Hands",
            Self::Victory => "Victory Pose",
            Self::ThumbsUp => "Thumbs Up",
            Self::Wiggle => "Wiggle",
        }
    }

    /// Whether a single frame shows the target pose.
    ///
    /// Victory and thumbs-up also need both hands in view.
    pub fn is_satisfied(self, summary: &FrameSummary) -> bool {
        match self {
            Self::TwoHands => summary.total_hands == 2,
            Self::Victory => summary.total_hands == 2 && summary.victory_hands >= 1,
            Self::ThumbsUp => summary.total_hands == 2 && summary.thumbs_up_hands >= 1,
            Self::Wiggle => summary.wiggle_hands >= 1,
        }
    }
}

/// Keeps the "detected" state lit for `hold` after the last satisfying frame,
/// so single-frame dropouts do not flicker. Time is the frame timestamp.
#[derive(Debug, Clone)]
pub struct PoseIndicator {
    target: PoseTarget,
    hold: Duration,
    lit_until: Option<f64>,
}

impl PoseIndicator {
    pub fn new(target: PoseTarget, hold: Duration) -> Self {
        Self {
            target,
            hold,
            lit_until: None,
        }
    }

    pub fn target(&self) -> PoseTarget {
        self.target
    }

    pub fn set_target(&mut self, target: PoseTarget) {
        if target != self.target {
            self.target = target;
            self.lit_until = None;
        }
    }

    /// Feed one frame; returns whether the indicator is lit at that frame.
    pub fn update(&mut self, summary: &FrameSummary) -> bool {
        if self.target.is_satisfied(summary) {
            self.lit_until = Some(summary.timestamp + self.hold.as_secs_f64());
        }
        self.is_lit(summary.timestamp)
    }

    pub fn is_lit(&self, now: f64) -> bool {
        self.lit_until.is_some_and(|until| now < until)
    }
}
