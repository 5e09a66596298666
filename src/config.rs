//! Player-tunable settings.
//!
//! Stored as JSON in the home directory; every field falls back to its
//! default when absent so old files keep loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Smallest arena that still leaves room for a ship lane plus oscillation.
pub const MIN_ARENA_WIDTH: u16 = 16;
pub const MIN_ARENA_HEIGHT: u16 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Target frame duration in milliseconds (0 = run unpaced).
    pub frame_ms: u64,
    /// Heart health at the start of round 1.
    pub starting_health: u32,
    /// Arena size in terminal cells, border included.
    pub arena_width: u16,
    pub arena_height: u16,
    /// Horizontal speed multiplier for the heart (cells are ~2x taller than wide).
    pub aspect_ratio: f32,
    /// Fixed RNG seed for reproducible wave lanes and hazard picks.
    pub seed: Option<u64>,
    /// Where the binary writes its trace log.
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_ms: 33,
            starting_health: 10,
            arena_width: 60,
            arena_height: 20,
            aspect_ratio: 2.0,
            seed: None,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".heart_battle.json")
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.starting_health == 0 {
            return Err(GameError::InvalidSetting(
                "starting_health must be at least 1".into(),
            ));
        }
        if self.arena_width < MIN_ARENA_WIDTH || self.arena_height < MIN_ARENA_HEIGHT {
            return Err(GameError::InvalidSetting(format!(
                "arena must be at least {}x{}, got {}x{}",
                MIN_ARENA_WIDTH, MIN_ARENA_HEIGHT, self.arena_width, self.arena_height
            )));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(GameError::InvalidSetting(format!(
                "aspect_ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        Ok(())
    }
}
