// src/events.rs - Typed per-frame signals for the presentation side
use crate::tracking::FrameSummary;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "count", rename_all = "snake_case")]
pub enum GestureEvent {
    HandsDetected(usize),
    VictoryHands(usize),
    ThumbsUpHands(usize),
    WiggleHands(usize),
}

impl GestureEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::HandsDetected(_) => "hands_detected",
            Self::VictoryHands(_) => "victory_hands",
            Self::ThumbsUpHands(_) => "thumbs_up_hands",
            Self::WiggleHands(_) => "wiggle_hands",
        }
    }

    pub fn count(&self) -> usize {
        match *self {
            Self::HandsDetected(n)
            | Self::VictoryHands(n)
            | Self::ThumbsUpHands(n)
            | Self::WiggleHands(n) => n,
        }
    }
}

impl FrameSummary {
    /// One event per count, always in the same order.
    pub fn events(&self) -> [GestureEvent; 4] {
        [
            GestureEvent::HandsDetected(self.total_hands),
            GestureEvent::VictoryHands(self.victory_hands),
            GestureEvent::ThumbsUpHands(self.thumbs_up_hands),
            GestureEvent::WiggleHands(self.wiggle_hands),
        ]
    }
}
