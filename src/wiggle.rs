// src/wiggle.rs - Index fingertip wiggle detection across frames
use crate::landmarks::{Chirality, HandObservation};
use nalgebra::{distance, Point2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// Last index fingertip seen for one tracked hand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WiggleState {
    previous_tip: Option<Point2<f64>>,
}

impl WiggleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_tip(&self) -> Option<Point2<f64>> {
        self.previous_tip
    }

    pub fn reset(&mut self) {
        self.previous_tip = None;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WiggleDetector {
    threshold: f64,
}

impl WiggleDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compare `tip` with the stored position, then store it.
    /// The first observation for a state never wiggles.
    pub fn observe(&self, state: &mut WiggleState, tip: Point2<f64>) -> bool {
        let wiggling = match state.previous_tip {
            Some(previous) => distance(&previous, &tip) > self.threshold,
            None => false,
        };
        state.previous_tip = Some(tip);
        wiggling
    }
}

/// How wiggle state is shared between hands in the same frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WiggleTracking {
    /// One position for every hand: with two hands in view each hand is
    /// compared against whichever hand was observed just before it.
    #[default]
    Shared,
    /// One position per tracked hand.
    PerHand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandKey {
    Shared,
    Chirality(Chirality),
    Slot(usize),
}

#[derive(Debug, Clone)]
pub struct WiggleTracker {
    detector: WiggleDetector,
    mode: WiggleTracking,
    states: HashMap<HandKey, WiggleState>,
}

impl WiggleTracker {
    pub fn new(threshold: f64, mode: WiggleTracking) -> Self {
        Self {
            detector: WiggleDetector::new(threshold),
            mode,
            states: HashMap::new(),
        }
    }

    pub fn mode(&self) -> WiggleTracking {
        self.mode
    }

    /// State slot for the hand at position `slot` in the frame.
    pub fn key_for(&self, slot: usize, hand: &HandObservation) -> HandKey {
        match self.mode {
            WiggleTracking::Shared => HandKey::Shared,
            WiggleTracking::PerHand => match hand.chirality {
                Some(chirality) => HandKey::Chirality(chirality),
                None => HandKey::Slot(slot),
            },
        }
    }

    pub fn observe(&mut self, slot: usize, hand: &HandObservation, tip: Point2<f64>) -> bool {
        let key = self.key_for(slot, hand);
        let state = self.states.entry(key).or_default();
        let wiggling = self.detector.observe(state, tip);
        trace!(?key, wiggling, x = tip.x, y = tip.y, "index tip observed");
        wiggling
    }

    pub fn state(&self, key: HandKey) -> Option<&WiggleState> {
        self.states.get(&key)
    }

    pub fn reset(&mut self) {
        self.states.clear();
    }
}
