// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use gesture_detect::data::DataExporter;
use gesture_detect::GestureError;
use gesture_detect::{
    Delivery, FrameClassifier, FrameWorker, GestureConfig, LandmarkSource, PoseIndicator,
    PoseTarget, ReplaySource, SimulatedSource,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Frame interval of a 30 fps camera.
const CAMERA_FRAME_MS: u64 = 33;

#[derive(Parser)]
#[command(name = "gesture_detect")]
#[command(about = "Recognise hand gestures from per-frame hand landmarks", long_about = None)]
struct Cli {
    /// Landmark recording, one JSON frame per line
    #[arg(short, long, value_name = "FILE", conflicts_with = "simulate")]
    input: Option<PathBuf>,

    /// Generate this many synthetic frames instead of reading a recording
    #[arg(long, value_name = "FRAMES")]
    simulate: Option<usize>,

    /// JSON file overriding classifier settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pose the indicator watches for
    #[arg(short, long, value_enum, default_value_t = PoseTarget::TwoHands)]
    target: PoseTarget,

    /// Deliver frames at this interval and drop the ones that arrive while
    /// the worker is busy. Simulation defaults to 33; recordings are replayed
    /// without loss unless this is set.
    #[arg(long, value_name = "MS")]
    pace_ms: Option<u64>,

    /// Write a CSV of every frame and an HTML report when done
    #[arg(short, long)]
    export: bool,

    /// Where exports go (defaults to Documents/GestureDetect)
    #[arg(long, value_name = "DIR", requires = "export")]
    output_dir: Option<PathBuf>,
}

fn default_output_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|p| p.join("GestureDetect")))
        .unwrap_or_else(|| PathBuf::from("./output"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GestureConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GestureConfig::default(),
    };
    info!(?config, target = cli.target.title(), "starting gesture detection");

    let mut source: Box<dyn LandmarkSource + Send> = match (&cli.input, cli.simulate) {
        (Some(path), _) => Box::new(
            ReplaySource::open(path)
                .with_context(|| format!("Failed to open recording {}", path.display()))?,
        ),
        (None, frames) => {
            if frames.is_none() {
                warn!("no --input or --simulate given, running simulation until interrupted");
            }
            Box::new(SimulatedSource::new(frames))
        }
    };

    let delivery = match (&cli.input, cli.pace_ms) {
        (Some(_), None) => Delivery::Lossless,
        (_, pace) => Delivery::Live(Duration::from_millis(pace.unwrap_or(CAMERA_FRAME_MS))),
    };

    let mut exporter = cli.export.then(|| {
        let dir = cli.output_dir.clone().unwrap_or_else(default_output_dir);
        DataExporter::new(dir, None)
    });

    let (worker, mut summaries) = FrameWorker::spawn(FrameClassifier::new(config.clone()));

    let mut indicator = PoseIndicator::new(cli.target, config.hold_duration());
    let consumer = tokio::spawn(async move {
        let mut was_lit = false;
        while let Some(summary) = summaries.recv().await {
            let lit = indicator.update(&summary);
            for event in summary.events() {
                debug!(frame = summary.frame_index, event = event.name(), count = event.count());
            }
            if lit != was_lit {
                info!(
                    frame = summary.frame_index,
                    timestamp = summary.timestamp,
                    target = indicator.target().title(),
                    detected = lit,
                    "pose indicator changed"
                );
                was_lit = lit;
            }
            if let Some(exporter) = exporter.as_mut() {
                exporter.add_frame(&summary, lit)?;
            }
        }
        Ok::<_, GestureError>(exporter)
    });

    info!(?delivery, "feeding frames");
    let fed = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal...");
            Ok(())
        }
        result = worker.feed(source.as_mut(), delivery) => result,
    };

    let offered = worker.offered_frames();
    let dropped = worker.dropped_frames();
    let classifier = worker.shutdown().await?;
    let exporter = consumer
        .await
        .context("Summary consumer failed")?
        .context("Failed to write CSV row")?;
    fed.context("Failed to feed landmark frames")?;
    info!(
        offered,
        processed = classifier.frames_processed(),
        dropped,
        avg_fps = classifier.metrics().avg_fps,
        avg_processing_ms = classifier.metrics().avg_processing_time * 1000.0,
        "done"
    );

    if let Some(mut exporter) = exporter {
        exporter.set_dropped_frames(dropped);
        let csv_path = exporter.export_csv().context("Failed to export CSV")?;
        let report_path = exporter.generate_report().context("Failed to write report")?;
        info!(
            frames = exporter.frame_count(),
            csv = %csv_path.display(),
            report = %report_path.display(),
            "session exported"
        );
    }

    Ok(())
}
