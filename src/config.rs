// src/config.rs - Classifier tuning, loadable from a JSON file
use crate::error::{GestureError, Result};
use crate::wiggle::WiggleTracking;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Joints at or below this confidence are ignored.
    pub confidence_threshold: f64,
    /// Index tip movement between frames, in normalized image units.
    pub wiggle_threshold: f64,
    pub wiggle_tracking: WiggleTracking,
    /// Hands beyond this many in one frame are discarded.
    pub max_hands: usize,
    /// How long the pose indicator stays lit after the last matching frame.
    pub hold_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.3,
            wiggle_threshold: 0.1,
            wiggle_tracking: WiggleTracking::Shared,
            max_hands: 2,
            hold_ms: 1000,
        }
    }
}

impl GestureConfig {
    /// Read a JSON config; fields left out keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|source| GestureError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(?config, path = %path.display(), "loaded gesture config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(GestureError::InvalidConfig(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.wiggle_threshold.is_nan() || self.wiggle_threshold <= 0.0 {
            return Err(GestureError::InvalidConfig(format!(
                "wiggle_threshold must be positive, got {}",
                self.wiggle_threshold
            )));
        }
        if self.max_hands == 0 {
            return Err(GestureError::InvalidConfig(
                "max_hands must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }
}
