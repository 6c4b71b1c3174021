// src/data.rs - Session export of per-frame gesture summaries
use crate::error::Result;
use crate::tracking::{FrameSummary, HandReport};
use chrono::Local;
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
struct FrameRecord {
    frame: u64,
    timestamp: f64,
    total_hands: usize,
    victory_hands: usize,
    thumbs_up_hands: usize,
    wiggle_hands: usize,
    target_lit: bool,

    // First two hands, in detection order
    hand_1_chirality: Option<String>,
    hand_1_fingers: Option<String>,
    hand_1_gestures: Option<String>,
    hand_1_wiggling: Option<bool>,

    hand_2_chirality: Option<String>,
    hand_2_fingers: Option<String>,
    hand_2_gestures: Option<String>,
    hand_2_wiggling: Option<bool>,
}

#[derive(Default)]
struct HandColumns {
    chirality: Option<String>,
    fingers: Option<String>,
    gestures: Option<String>,
    wiggling: Option<bool>,
}

impl From<Option<&HandReport>> for HandColumns {
    fn from(hand: Option<&HandReport>) -> Self {
        match hand {
            Some(hand) => Self {
                chirality: hand.chirality.map(|c| c.as_str().to_string()),
                fingers: hand.fingers.map(|f| f.to_string()),
                gestures: Some(
                    hand.gestures
                        .iter()
                        .map(|g| g.as_str())
                        .collect::<Vec<_>>()
                        .join("+"),
                ),
                wiggling: Some(hand.wiggling),
            },
            None => Self::default(),
        }
    }
}

/// Running totals for the HTML report.
#[derive(Debug, Default, Clone, Copy)]
struct SessionStats {
    frames: usize,
    two_hand_frames: usize,
    victory_frames: usize,
    thumbs_up_frames: usize,
    wiggle_frames: usize,
    lit_frames: usize,
}

impl SessionStats {
    fn add(&mut self, summary: &FrameSummary, target_lit: bool) {
        self.frames += 1;
        self.two_hand_frames += usize::from(summary.total_hands == 2);
        self.victory_frames += usize::from(summary.victory_hands > 0);
        self.thumbs_up_frames += usize::from(summary.thumbs_up_hands > 0);
        self.wiggle_frames += usize::from(summary.wiggle_hands > 0);
        self.lit_frames += usize::from(target_lit);
    }
}

/// Writes one CSV row per frame as frames arrive, so a long session never
/// holds its summaries in memory.
pub struct DataExporter {
    output_dir: PathBuf,
    session_name: String,
    writer: Option<Writer<File>>,
    stats: SessionStats,
    dropped_frames: u64,
}

impl DataExporter {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name.unwrap_or_else(|| {
            format!("session_{}", Local::now().format("%Y%m%d_%H%M%S"))
        });

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            writer: None,
            stats: SessionStats::default(),
            dropped_frames: 0,
        }
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    fn csv_path(&self) -> PathBuf {
        self.session_dir().join("gesture_data.csv")
    }

    fn open_csv(&self) -> Result<Writer<File>> {
        std::fs::create_dir_all(self.session_dir())?;
        Ok(Writer::from_path(self.csv_path())?)
    }

    /// Record a processed frame and whether the pose indicator was lit for it.
    pub fn add_frame(&mut self, summary: &FrameSummary, target_lit: bool) -> Result<()> {
        if self.writer.is_none() {
            self.writer = Some(self.open_csv()?);
        }
        if let Some(writer) = self.writer.as_mut() {
            writer.serialize(Self::create_record(summary, target_lit))?;
        }
        self.stats.add(summary, target_lit);
        Ok(())
    }

    pub fn set_dropped_frames(&mut self, dropped: u64) {
        self.dropped_frames = dropped;
    }

    pub fn frame_count(&self) -> usize {
        self.stats.frames
    }

    /// Flush every row written so far and return the CSV path.
    pub fn export_csv(&mut self) -> Result<PathBuf> {
        if self.writer.is_none() {
            self.writer = Some(self.open_csv()?);
        }
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }

        let csv_path = self.csv_path();
        info!(path = %csv_path.display(), frames = self.stats.frames, "exported CSV");
        Ok(csv_path)
    }

    fn create_record(summary: &FrameSummary, target_lit: bool) -> FrameRecord {
        let first = HandColumns::from(summary.hands.first());
        let second = HandColumns::from(summary.hands.get(1));

        FrameRecord {
            frame: summary.frame_index,
            timestamp: summary.timestamp,
            total_hands: summary.total_hands,
            victory_hands: summary.victory_hands,
            thumbs_up_hands: summary.thumbs_up_hands,
            wiggle_hands: summary.wiggle_hands,
            target_lit,
            hand_1_chirality: first.chirality,
            hand_1_fingers: first.fingers,
            hand_1_gestures: first.gestures,
            hand_1_wiggling: first.wiggling,
            hand_2_chirality: second.chirality,
            hand_2_fingers: second.fingers,
            hand_2_gestures: second.gestures,
            hand_2_wiggling: second.wiggling,
        }
    }

    pub fn generate_report(&self) -> Result<PathBuf> {
        let report_path = self.session_dir().join("report.html");
        if let Some(parent) = report_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&report_path, self.create_html_report())?;
        info!(path = %report_path.display(), "wrote session report");
        Ok(report_path)
    }

    fn create_html_report(&self) -> String {
        let stats = self.stats;
        let total_frames = stats.frames;
        let offered = total_frames as u64 + self.dropped_frames;
        let processed_rate = if offered == 0 {
            0.0
        } else {
            total_frames as f64 / offered as f64 * 100.0
        };

        format!(r#"
<!DOCTYPE html>
<html>
<head>
    <title>Gesture Session Report - {}</title>
    <style>
        body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 40px; background: #f5f5f5; }}
        h1 {{ color: #333; }}
        .stats {{ background: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        .stat-item {{ margin: 10px 0; }}
        .stat-label {{ font-weight: bold; color: #666; }}
        .stat-value {{ color: #4682EA; font-size: 1.2em; }}
    </style>
</head>
<body>
    <h1>Gesture Session Report</h1>
    <div class="stats">
        <h2>Session: {}</h2>
        <div class="stat-item"><span class="stat-label">Frames Processed:</span> <span class="stat-value">{}</span></div>
        <div class="stat-item"><span class="stat-label">Frames Dropped:</span> <span class="stat-value">{}</span></div>
        <div class="stat-item"><span class="stat-label">Processed Rate:</span> <span class="stat-value">{:.1}%</span></div>
        <div class="stat-item"><span class="stat-label">Two Hands:</span> <span class="stat-value">{} frames</span></div>
        <div class="stat-item"><span class="stat-label">Victory:</span> <span class="stat-value">{} frames</span></div>
        <div class="stat-item"><span class="stat-label">Thumbs Up:</span> <span class="stat-value">{} frames</span></div>
        <div class="stat-item"><span class="stat-label">Wiggle:</span> <span class="stat-value">{} frames</span></div>
        <div class="stat-item"><span class="stat-label">Target Pose Lit:</span> <span class="stat-value">{} frames</span></div>
    </div>
</body>
</html>
"#,
            self.session_name,
            self.session_name,
            total_frames,
            self.dropped_frames,
            processed_rate,
            stats.two_hand_frames,
            stats.victory_frames,
            stats.thumbs_up_frames,
            stats.wiggle_frames,
            stats.lit_frames,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Gesture;
    use crate::landmarks::Chirality;

    fn victory_summary(frame_index: u64) -> FrameSummary {
        FrameSummary {
            frame_index,
            timestamp: frame_index as f64 / 30.0,
            total_hands: 1,
            victory_hands: 1,
            hands: vec![HandReport {
                slot: 0,
                chirality: Some(Chirality::Left),
                fingers: Some(Gesture::Victory.template()),
                gestures: vec![Gesture::Victory],
                wiggling: false,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_export_csv_writes_one_row_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = DataExporter::new(dir.path(), Some("unit".to_string()));
        exporter.add_frame(&victory_summary(0), false).unwrap();
        exporter.add_frame(&FrameSummary::empty(1, 0.033), false).unwrap();

        let path = exporter.export_csv().unwrap();
        assert_eq!(path, dir.path().join("unit").join("gesture_data.csv"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "frame");
        assert!(headers.iter().any(|h| h == "hand_2_wiggling"));

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        let fingers_col = headers.iter().position(|h| h == "hand_1_fingers").unwrap();
        let gestures_col = headers.iter().position(|h| h == "hand_1_gestures").unwrap();
        assert_eq!(&rows[0][fingers_col], "01100");
        assert_eq!(&rows[0][gestures_col], "victory");
        assert_eq!(&rows[1][fingers_col], "");
    }

    #[test]
    fn test_report_counts_frames() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = DataExporter::new(dir.path(), Some("report".to_string()));
        exporter.add_frame(&victory_summary(0), true).unwrap();
        exporter.add_frame(&victory_summary(1), true).unwrap();
        exporter.set_dropped_frames(2);
        assert_eq!(exporter.frame_count(), 2);

        let html = exporter.create_html_report();
        assert!(html.contains("Session: report"));
        assert!(html.contains("50.0%"));
        assert!(html.contains("Victory:</span> <span class=\"stat-value\">2 frames"));

        let path = exporter.generate_report().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_export_without_frames_creates_empty_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = DataExporter::new(dir.path(), Some("empty".to_string()));
        let path = exporter.export_csv().unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "");
        assert_eq!(exporter.frame_count(), 0);
    }

    #[test]
    fn test_hand_without_vector_leaves_fingers_blank() {
        let hand = HandReport {
            slot: 0,
            chirality: None,
            fingers: None,
            gestures: Vec::new(),
            wiggling: true,
        };
        let columns = HandColumns::from(Some(&hand));
        assert_eq!(columns.fingers, None);
        assert_eq!(columns.gestures.as_deref(), Some(""));
        assert_eq!(columns.wiggling, Some(true));
    }
}
