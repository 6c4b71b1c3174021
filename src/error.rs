// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GestureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed landmark frame on line {line}: {source}")]
    Replay {
        line: usize,
        source: serde_json::Error,
    },

    #[error("failed to read landmark recording at line {line}: {source}")]
    ReplayIo {
        line: usize,
        source: std::io::Error,
    },

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("frame worker has shut down")]
    WorkerClosed,
}

pub type Result<T> = std::result::Result<T, GestureError>;
