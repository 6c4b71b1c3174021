// src/bin/landmark_dump.rs - Print per-hand classification for a recording
use anyhow::{Context, Result};
use gesture_detect::{FrameClassifier, GestureConfig, LandmarkSource, ReplaySource};
use std::path::PathBuf;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: landmark_dump <recording.jsonl>")?;

    println!("Classifying {}...\n", path.display());

    let mut source = ReplaySource::open(&path)
        .with_context(|| format!("Failed to open recording {}", path.display()))?;
    let mut classifier = FrameClassifier::new(GestureConfig::default());

    while let Some(frame) = source.next_frame()? {
        let summary = classifier.process_frame(&frame);
        println!(
            "[{:>5}] t={:.3}s hands={} victory={} thumbs_up={} wiggle={}",
            summary.frame_index,
            summary.timestamp,
            summary.total_hands,
            summary.victory_hands,
            summary.thumbs_up_hands,
            summary.wiggle_hands,
        );
        for hand in &summary.hands {
            let side = hand.chirality.map(|c| c.as_str()).unwrap_or("?");
            let fingers = hand
                .fingers
                .map(|f| f.to_string())
                .unwrap_or_else(|| "incomplete".to_string());
            let gestures: Vec<_> = hand.gestures.iter().map(|g| g.as_str()).collect();
            println!(
                "        #{} {:<5} fingers={} gestures=[{}]{}",
                hand.slot,
                side,
                fingers,
                gestures.join(", "),
                if hand.wiggling { " wiggling" } else { "" },
            );
        }
    }

    println!("\n{} frame(s) classified", classifier.frames_processed());
    Ok(())
}
