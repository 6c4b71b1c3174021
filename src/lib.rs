// src/lib.rs
//! Hand gesture recognition from per-frame hand landmarks.
//!
//! A landmark source delivers [`LandmarkFrame`]s; [`FrameClassifier`] turns each
//! hand into a finger-extension vector, matches it against the gesture table,
//! tracks index fingertip wiggle, and reports four counts per frame.

pub mod classifier;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod features;
pub mod indicator;
pub mod landmarks;
pub mod source;
pub mod tracking;
pub mod wiggle;
pub mod worker;

pub use classifier::{Gesture, GESTURE_TEMPLATES};
pub use config::GestureConfig;
pub use error::{GestureError, Result};
pub use events::GestureEvent;
pub use features::FingerExtension;
pub use indicator::{PoseIndicator, PoseTarget};
pub use landmarks::{Chirality, Finger, HandJoint, HandObservation, Landmark, LandmarkFrame};
pub use source::{LandmarkSource, ReplaySource, SimulatedSource};
pub use tracking::{FrameClassifier, FrameSummary, HandReport};
pub use wiggle::{WiggleDetector, WiggleState, WiggleTracking};
pub use worker::{Delivery, FrameWorker};
