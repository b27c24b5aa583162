//! Playback settings
//!
//! Persisted as a JSON file next to whatever drives the render loop.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Playback speed presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaybackSpeed {
    Half,
    #[default]
    Normal,
    Double,
    Triple,
}

impl PlaybackSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackSpeed::Half => "Half",
            PlaybackSpeed::Normal => "Normal",
            PlaybackSpeed::Double => "Double",
            PlaybackSpeed::Triple => "Triple",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "half" | "0.5" | "0.5x" => Some(PlaybackSpeed::Half),
            "normal" | "1" | "1x" => Some(PlaybackSpeed::Normal),
            "double" | "2" | "2x" => Some(PlaybackSpeed::Double),
            "triple" | "3" | "3x" => Some(PlaybackSpeed::Triple),
            _ => None,
        }
    }

    /// Shot seconds per wall-clock second
    pub fn factor(&self) -> f64 {
        match self {
            PlaybackSpeed::Half => 0.5,
            PlaybackSpeed::Normal => 1.0,
            PlaybackSpeed::Double => 2.0,
            PlaybackSpeed::Triple => 3.0,
        }
    }
}

/// Playback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Speed preset
    pub speed: PlaybackSpeed,
    /// Exact speed factor, wins over the preset when positive
    pub speed_factor_override: Option<f64>,

    /// Request the next shot as soon as one settles, without a pause
    pub auto_play: bool,
    /// Host loop cadence (frames per second)
    pub frame_rate: u32,

    /// Friction constants and table dimensions
    pub table: Table,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: PlaybackSpeed::Normal,
            speed_factor_override: None,

            auto_play: false,
            frame_rate: 60,

            table: Table::default(),
        }
    }
}

impl Settings {
    /// Settings for a speed preset, everything else default
    pub fn from_preset(speed: PlaybackSpeed) -> Self {
        Self {
            speed,
            ..Self::default()
        }
    }

    /// Speed factor handed to the player
    pub fn effective_speed_factor(&self) -> f64 {
        match self.speed_factor_override {
            Some(factor) if factor.is_finite() && factor > 0.0 => factor,
            _ => self.speed.factor(),
        }
    }

    /// Seconds between frames of the host loop
    pub fn frame_interval(&self) -> f64 {
        1.0 / self.frame_rate.max(1) as f64
    }

    /// Load settings from `path`, falling back to defaults if the file is
    /// missing or unreadable
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings {}: {}", path.display(), e),
            },
            Err(e) => log::info!("No settings at {} ({}), using defaults", path.display(), e),
        }
        Self::default()
    }

    /// Save settings to `path` (written to a temp file, then renamed)
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(self).context("serializing settings")?;
        fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
