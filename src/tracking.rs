// src/tracking.rs - Per-frame classification of every detected hand
use crate::classifier::{self, Gesture};
use crate::config::GestureConfig;
use crate::features::{self, FingerExtension};
use crate::landmarks::{Chirality, HandJoint, LandmarkFrame};
use crate::wiggle::WiggleTracker;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, trace};

const METRICS_WINDOW: usize = 30;

#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    /// Frames per second of input, from the timestamps of recent frames.
    pub avg_fps: f32,
    /// Seconds spent classifying one frame.
    pub avg_processing_time: f32,
    frame_times: VecDeque<f32>,
    timestamps: VecDeque<f64>,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self {
            avg_fps: 0.0,
            avg_processing_time: 0.0,
            frame_times: VecDeque::with_capacity(METRICS_WINDOW),
            timestamps: VecDeque::with_capacity(METRICS_WINDOW),
        }
    }

    fn record(&mut self, elapsed: f32, timestamp: f64) {
        self.frame_times.push_front(elapsed);
        if self.frame_times.len() > METRICS_WINDOW {
            self.frame_times.pop_back();
        }
        self.timestamps.push_front(timestamp);
        if self.timestamps.len() > METRICS_WINDOW {
            self.timestamps.pop_back();
        }

        self.avg_processing_time =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;

        let span = match (self.timestamps.front(), self.timestamps.back()) {
            (Some(newest), Some(oldest)) => newest - oldest,
            _ => 0.0,
        };
        self.avg_fps = if span > 0.0 {
            ((self.timestamps.len() - 1) as f64 / span) as f32
        } else {
            0.0
        };
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Classification result for one hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandReport {
    /// Position of the hand within its frame.
    pub slot: usize,
    pub chirality: Option<Chirality>,
    /// `None` when the hand lacked the landmarks needed for a vector.
    pub fingers: Option<FingerExtension>,
    pub gestures: Vec<Gesture>,
    pub wiggling: bool,
}

impl HandReport {
    pub fn is(&self, gesture: Gesture) -> bool {
        self.gestures.contains(&gesture)
    }
}

/// The four per-frame counts plus the per-hand detail they were built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameSummary {
    pub frame_index: u64,
    pub timestamp: f64,
    pub total_hands: usize,
    pub victory_hands: usize,
    pub thumbs_up_hands: usize,
    pub wiggle_hands: usize,
    pub hands: Vec<HandReport>,
}

impl FrameSummary {
    pub fn empty(frame_index: u64, timestamp: f64) -> Self {
        Self {
            frame_index,
            timestamp,
            ..Default::default()
        }
    }

    pub fn count(&self, gesture: Gesture) -> usize {
        match gesture {
            Gesture::Victory => self.victory_hands,
            Gesture::ThumbsUp => self.thumbs_up_hands,
        }
    }
}

pub struct FrameClassifier {
    config: GestureConfig,
    wiggle: WiggleTracker,
    metrics: PerformanceMetrics,
    frame_counter: u64,
}

impl FrameClassifier {
    pub fn new(config: GestureConfig) -> Self {
        let wiggle = WiggleTracker::new(config.wiggle_threshold, config.wiggle_tracking);
        Self {
            config,
            wiggle,
            metrics: PerformanceMetrics::new(),
            frame_counter: 0,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn frames_processed(&self) -> u64 {
        self.frame_counter
    }

    /// Forget every stored fingertip position.
    pub fn reset_wiggle(&mut self) {
        self.wiggle.reset();
    }

    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> FrameSummary {
        let frame_index = self.frame_counter;
        self.frame_counter += 1;

        if frame.hands.len() > self.config.max_hands {
            debug!(
                frame_index,
                detected = frame.hands.len(),
                max_hands = self.config.max_hands,
                "discarding extra hands"
            );
        }

        let mut summary = FrameSummary::empty(frame_index, frame.timestamp);
        let threshold = self.config.confidence_threshold;

        for (slot, hand) in frame.hands.iter().take(self.config.max_hands).enumerate() {
            let fingers = features::extract(hand, threshold);
            let gestures = fingers
                .as_ref()
                .map(classifier::classify)
                .unwrap_or_default();

            // Wiggle only needs the index tip, not a full vector
            let wiggling = match hand.confident(HandJoint::IndexTip, threshold) {
                Some(tip) => self.wiggle.observe(slot, hand, tip),
                None => false,
            };

            trace!(
                frame_index,
                slot,
                fingers = %fingers.map(|f| f.to_string()).unwrap_or_else(|| "-".to_string()),
                ?gestures,
                wiggling,
                "hand classified"
            );

            summary.hands.push(HandReport {
                slot,
                chirality: hand.chirality,
                fingers,
                gestures,
                wiggling,
            });
        }

        summary.total_hands = summary.hands.len();
        summary.victory_hands = summary.hands.iter().filter(|h| h.is(Gesture::Victory)).count();
        summary.thumbs_up_hands = summary.hands.iter().filter(|h| h.is(Gesture::ThumbsUp)).count();
        summary.wiggle_hands = summary.hands.iter().filter(|h| h.wiggling).count();
        summary
    }

    pub fn process_frame_with_metrics(
        &mut self,
        frame: &LandmarkFrame,
    ) -> (FrameSummary, PerformanceMetrics) {
        let start = Instant::now();
        let summary = self.process_frame(frame);
        self.metrics.record(start.elapsed().as_secs_f32(), frame.timestamp);
        (summary, self.metrics.clone())
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }
}
