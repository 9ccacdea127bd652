//! Host configuration.
//!
//! Values come from defaults, then an optional JSON file, then command-line
//! overrides applied in `main`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Target frames per second.
    pub tick_rate: f64,
    /// Number of frames to run (0 = unlimited).
    pub max_ticks: u64,
    /// Sleep between frames to hold the tick rate.
    pub realtime: bool,
    /// World script to load instead of the built-in island.
    pub script_path: Option<PathBuf>,
    /// Game state to load before the first frame.
    pub load_path: Option<PathBuf>,
    /// Where to write the game state after the last frame.
    pub save_path: Option<PathBuf>,
    /// Pizza mission length in frames, for pizza actions without one.
    pub pizza_time_limit: Option<u32>,
    /// Frames a scripted animation runs before its end is reported.
    pub animation_frames: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 600,
            realtime: true,
            script_path: None,
            load_path: None,
            save_path: None,
            pizza_time_limit: Some(120),
            animation_frames: 30,
        }
    }
}

impl AppConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.tick_rate.is_finite() && self.tick_rate > 0.0,
            "tick_rate must be positive, got {}",
            self.tick_rate
        );
        Ok(())
    }

    /// Seconds per frame.
    #[must_use]
    pub fn frame_seconds(&self) -> f64 {
        1.0 / self.tick_rate
    }
}
