// src/worker.rs - Background frame processing with late-frame discard
use crate::error::{GestureError, Result};
use crate::landmarks::LandmarkFrame;
use crate::source::LandmarkSource;
use crate::tracking::{FrameClassifier, FrameSummary};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

const RESULT_BUFFER: usize = 64;

/// How [`FrameWorker::feed`] hands frames to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Wait for room in the queue. Every frame is classified, in order.
    Lossless,
    /// Offer one frame per interval like a camera; frames that arrive while
    /// the worker is busy are dropped.
    Live(Duration),
}

/// Handle to the task that owns the classifier.
///
/// At most one frame waits for the worker; a frame offered while that slot
/// is taken is dropped rather than queued.
pub struct FrameWorker {
    frames: mpsc::Sender<LandmarkFrame>,
    offered: AtomicU64,
    dropped: Arc<AtomicU64>,
    handle: JoinHandle<FrameClassifier>,
}

impl FrameWorker {
    /// Start the worker on the current tokio runtime. Summaries arrive on the
    /// returned receiver in frame order.
    pub fn spawn(classifier: FrameClassifier) -> (Self, mpsc::Receiver<FrameSummary>) {
        let (frame_tx, frame_rx) = mpsc::channel(1);
        let (result_tx, result_rx) = mpsc::channel(RESULT_BUFFER);
        let handle = tokio::spawn(run(classifier, frame_rx, result_tx));

        let worker = Self {
            frames: frame_tx,
            offered: AtomicU64::new(0),
            dropped: Arc::new(AtomicU64::new(0)),
            handle,
        };
        (worker, result_rx)
    }

    /// Offer a frame without waiting. `Ok(false)` means it arrived late and was dropped.
    pub fn submit(&self, frame: LandmarkFrame) -> Result<bool> {
        self.offered.fetch_add(1, Ordering::Relaxed);
        match self.frames.try_send(frame) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(frame)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                trace!(timestamp = frame.timestamp, dropped, "late frame discarded");
                Ok(false)
            }
            Err(TrySendError::Closed(_)) => Err(GestureError::WorkerClosed),
        }
    }

    /// Queue a frame, waiting until the worker has room for it.
    pub async fn send(&self, frame: LandmarkFrame) -> Result<()> {
        self.offered.fetch_add(1, Ordering::Relaxed);
        self.frames
            .send(frame)
            .await
            .map_err(|_| GestureError::WorkerClosed)
    }

    /// Pull frames from `source` until it is exhausted.
    pub async fn feed<S>(&self, source: &mut S, delivery: Delivery) -> Result<()>
    where
        S: LandmarkSource + ?Sized,
    {
        while let Some(frame) = source.next_frame()? {
            match delivery {
                Delivery::Lossless => self.send(frame).await?,
                Delivery::Live(interval) => {
                    self.submit(frame)?;
                    if interval.is_zero() {
                        tokio::task::yield_now().await;
                    } else {
                        tokio::time::sleep(interval).await;
                    }
                }
            }
        }
        debug!(offered = self.offered_frames(), "landmark source exhausted");
        Ok(())
    }

    pub fn offered_frames(&self) -> u64 {
        self.offered.load(Ordering::Relaxed)
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Stop accepting frames, let the worker finish what it holds, and get
    /// the classifier back.
    pub async fn shutdown(self) -> Result<FrameClassifier> {
        let dropped = self.dropped_frames();
        drop(self.frames);
        let classifier = self.handle.await.map_err(|_| GestureError::WorkerClosed)?;
        info!(
            processed = classifier.frames_processed(),
            dropped,
            "frame worker stopped"
        );
        Ok(classifier)
    }
}

async fn run(
    mut classifier: FrameClassifier,
    mut frames: mpsc::Receiver<LandmarkFrame>,
    results: mpsc::Sender<FrameSummary>,
) -> FrameClassifier {
    debug!("frame worker started");
    while let Some(frame) = frames.recv().await {
        let (summary, metrics) = classifier.process_frame_with_metrics(&frame);
        trace!(
            frame_index = summary.frame_index,
            avg_fps = metrics.avg_fps,
            "frame processed"
        );
        if results.send(summary).await.is_err() {
            debug!("summary receiver dropped, stopping worker");
            break;
        }
    }
    classifier
}
