// src/features.rs - Per-hand "finger extended" feature vector
use crate::landmarks::{Finger, HandJoint, HandObservation};
use nalgebra::{distance, Point2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extension flags in thumb, index, middle, ring, little order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FingerExtension {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub little: bool,
}

impl FingerExtension {
    pub const fn new(thumb: bool, index: bool, middle: bool, ring: bool, little: bool) -> Self {
        Self {
            thumb,
            index,
            middle,
            ring,
            little,
        }
    }

    pub const fn from_array(flags: [bool; 5]) -> Self {
        Self::new(flags[0], flags[1], flags[2], flags[3], flags[4])
    }

    pub const fn to_array(self) -> [bool; 5] {
        [self.thumb, self.index, self.middle, self.ring, self.little]
    }

    pub fn get(&self, finger: Finger) -> bool {
        self.to_array()[finger.index()]
    }

    pub fn set(&mut self, finger: Finger, extended: bool) {
        match finger {
            Finger::Thumb => self.thumb = extended,
            Finger::Index => self.index = extended,
            Finger::Middle => self.middle = extended,
            Finger::Ring => self.ring = extended,
            Finger::Little => self.little = extended,
        }
    }

    pub fn extended_count(&self) -> usize {
        self.to_array().iter().filter(|&&f| f).count()
    }
}

// Compact form used in logs and CSV, e.g. "01100" for a victory hand.
impl fmt::Display for FingerExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in self.to_array() {
            f.write_str(if flag { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Compute the extension vector for one hand.
///
/// Returns `None` when the wrist or a whole finger is missing from the
/// observation. Joints that are present but not above `confidence_threshold`
/// leave the affected finger "not extended".
pub fn extract(hand: &HandObservation, confidence_threshold: f64) -> Option<FingerExtension> {
    if hand.landmark(HandJoint::Wrist).is_none() {
        return None;
    }
    if !Finger::ALL.iter().all(|&finger| hand.has_finger(finger)) {
        return None;
    }

    let mut fingers = FingerExtension::default();
    let wrist = match hand.confident(HandJoint::Wrist, confidence_threshold) {
        Some(wrist) => wrist,
        None => return Some(fingers),
    };

    for finger in Finger::ALL {
        fingers.set(finger, is_extended(hand, wrist, finger, confidence_threshold));
    }
    Some(fingers)
}

fn is_extended(
    hand: &HandObservation,
    wrist: Point2<f64>,
    finger: Finger,
    confidence_threshold: f64,
) -> bool {
    let tip = hand.confident(finger.tip(), confidence_threshold);
    let knuckle = hand.confident(finger.knuckle(), confidence_threshold);

    match (tip, knuckle) {
        (Some(tip), Some(knuckle)) => distance(&tip, &wrist) > distance(&knuckle, &wrist),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::synthetic_hand;

    const THRESHOLD: f64 = 0.3;

    fn hand_with(cx: f64, cy: f64, extended: [bool; 5]) -> HandObservation {
        synthetic_hand(cx, cy, extended, 0.9)
    }

    #[test]
    fn test_victory_hand_vector() {
        let hand = hand_with(0.5, 0.8, [false, true, true, false, false]);
        let fingers = extract(&hand, THRESHOLD).unwrap();
        assert_eq!(fingers, FingerExtension::new(false, true, true, false, false));
        assert_eq!(fingers.to_string(), "01100");
        assert_eq!(fingers.extended_count(), 2);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let hand = hand_with(0.3, 0.6, [true, false, true, false, true]);
        let first = extract(&hand, THRESHOLD);
        for _ in 0..10 {
            assert_eq!(extract(&hand, THRESHOLD), first);
        }
    }

    #[test]
    fn test_low_confidence_tip_fails_closed() {
        let mut hand = hand_with(0.5, 0.8, [true, true, true, true, true]);
        hand.insert(HandJoint::IndexTip, 0.5, 0.5, 0.2);
        let fingers = extract(&hand, THRESHOLD).unwrap();
        assert!(!fingers.index);
        assert!(fingers.middle);
    }

    #[test]
    fn test_missing_knuckle_fails_closed() {
        let mut hand = hand_with(0.5, 0.8, [true, true, true, true, true]);
        hand.joints.remove(&HandJoint::RingMcp);
        let fingers = extract(&hand, THRESHOLD).unwrap();
        assert!(!fingers.ring);
        assert!(fingers.little);
    }

    #[test]
    fn test_missing_wrist_yields_none() {
        let mut hand = hand_with(0.5, 0.8, [true; 5]);
        hand.joints.remove(&HandJoint::Wrist);
        assert_eq!(extract(&hand, THRESHOLD), None);
    }

    #[test]
    fn test_missing_finger_set_yields_none() {
        let mut hand = hand_with(0.5, 0.8, [true; 5]);
        for joint in Finger::Little.joints() {
            hand.joints.remove(&joint);
        }
        assert_eq!(extract(&hand, THRESHOLD), None);
    }

    #[test]
    fn test_low_confidence_wrist_is_all_false() {
        let mut hand = hand_with(0.5, 0.8, [true; 5]);
        hand.insert(HandJoint::Wrist, 0.5, 0.8, 0.1);
        assert_eq!(extract(&hand, THRESHOLD), Some(FingerExtension::default()));
    }

    #[test]
    fn test_array_round_trip_and_get() {
        let fingers = FingerExtension::from_array([true, false, false, true, false]);
        assert!(fingers.get(Finger::Thumb));
        assert!(fingers.get(Finger::Ring));
        assert!(!fingers.get(Finger::Little));
        assert_eq!(fingers.to_array(), [true, false, false, true, false]);
    }
}
