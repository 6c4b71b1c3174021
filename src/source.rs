// src/source.rs - Landmark sources: recorded JSON lines or a synthetic demo
use crate::error::{GestureError, Result};
use crate::landmarks::{Chirality, Finger, HandJoint, HandObservation, LandmarkFrame};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use tracing::{debug, info};

/// Anything that hands out landmark frames one at a time.
pub trait LandmarkSource {
    /// `Ok(None)` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>>;
}

/// Replays frames recorded one JSON object per line. Blank lines are skipped.
pub struct ReplaySource<R> {
    lines: Lines<R>,
    line: usize,
}

impl ReplaySource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        info!(path = %path.display(), "replaying landmark recording");
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> LandmarkSource for ReplaySource<R> {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        for line in self.lines.by_ref() {
            self.line += 1;
            let line = line.map_err(|source| GestureError::ReplayIo {
                line: self.line,
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let frame = serde_json::from_str(&line).map_err(|source| GestureError::Replay {
                line: self.line,
                source,
            })?;
            return Ok(Some(frame));
        }
        Ok(None)
    }
}

const SIM_DT: f64 = 1.0 / 30.0;
const PHASE_SECS: f64 = 2.0;
const WIGGLE_AMPLITUDE: f64 = 0.06;

/// Deterministic demo hands cycling through the recognised poses:
/// victory + thumbs-up, a wiggling index finger, an empty frame, two open hands.
pub struct SimulatedSource {
    sim_time: f64,
    frame_index: u64,
    remaining: Option<usize>,
}

impl SimulatedSource {
    pub fn new(frames: Option<usize>) -> Self {
        Self {
            sim_time: 0.0,
            frame_index: 0,
            remaining: frames,
        }
    }

    fn generate(&self) -> Vec<HandObservation> {
        let t = self.sim_time;
        let phase = (t / PHASE_SECS) as usize % 4;

        match phase {
            0 => vec![
                synthetic_hand(0.3, 0.75, [false, true, true, false, false], 0.9)
                    .with_chirality(Chirality::Left),
                synthetic_hand(0.7, 0.75, [true, false, false, false, false], 0.9)
                    .with_chirality(Chirality::Right),
            ],
            1 => {
                let offset = if self.frame_index % 2 == 0 {
                    WIGGLE_AMPLITUDE
                } else {
                    -WIGGLE_AMPLITUDE
                };
                vec![
                    synthetic_hand(0.5 + offset, 0.75, [false, true, false, false, false], 0.85)
                        .with_chirality(Chirality::Right),
                ]
            }
            2 => Vec::new(),
            _ => {
                let sway = 0.01 * t.sin();
                vec![
                    synthetic_hand(0.3 + sway, 0.75, [true; 5], 0.8)
                        .with_chirality(Chirality::Left),
                    synthetic_hand(0.7 + sway, 0.75, [true; 5], 0.8)
                        .with_chirality(Chirality::Right),
                ]
            }
        }
    }
}

impl LandmarkSource for SimulatedSource {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                debug!(frames = self.frame_index, "simulation finished");
                return Ok(None);
            }
            *remaining -= 1;
        }

        let frame = LandmarkFrame::new(self.sim_time, self.generate());
        self.sim_time += SIM_DT;
        self.frame_index += 1;
        Ok(Some(frame))
    }
}

/// A complete 21-joint hand with the wrist at (`cx`, `cy`) and fingers
/// pointing up the image. Fingers flagged in `extended` reach past their
/// knuckle; the rest curl back towards the palm.
pub fn synthetic_hand(cx: f64, cy: f64, extended: [bool; 5], confidence: f64) -> HandObservation {
    let mut hand = HandObservation::new();
    hand.insert(HandJoint::Wrist, cx, cy, confidence);

    for finger in Finger::ALL {
        let dx = (finger.index() as f64 - 2.0) * 0.03;
        let [base, second, third, tip] = finger.joints();
        hand.insert(base, cx + dx, cy - 0.08, confidence);
        hand.insert(second, cx + dx, cy - 0.10, confidence);
        if extended[finger.index()] {
            hand.insert(third, cx + dx, cy - 0.14, confidence);
            hand.insert(tip, cx + dx, cy - 0.18, confidence);
        } else {
            hand.insert(third, cx + dx, cy - 0.06, confidence);
            hand.insert(tip, cx + dx, cy - 0.04, confidence);
        }
    }
    hand
}
