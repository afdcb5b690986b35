//! Configuration for interaction timing and placement tuning
//!
//! Values can come from a preset profile or be loaded from JSON. Every section
//! falls back to its defaults when omitted, so a partial document such as
//! `{"clicks": {"double_click_window_ms": 300}}` is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::core::constants::{
    ANGLE_SLICE_DEGREES, DOUBLE_CLICK_WINDOW_MS, ICON_INTERVAL_METERS, MAX_TILE_LEVEL,
    MIN_TILE_LEVEL,
};
use crate::{MapError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionProfile {
    Standard,
    /// Longer double-click window and sparser icons, for touch screens
    Relaxed,
    Custom(InteractionConfig),
}

impl InteractionProfile {
    pub fn resolve(&self) -> InteractionConfig {
        match self {
            Self::Standard => InteractionConfig::default(),
            Self::Relaxed => InteractionConfig {
                clicks: ClickTimingConfig {
                    double_click_window_ms: 350,
                },
                tiles: TileGridConfig::default(),
                icons: IconPlacementConfig {
                    interval_meters: 60.0,
                    angle_slice_degrees: 30,
                },
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for InteractionProfile {
    fn default() -> Self {
        Self::Standard
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub clicks: ClickTimingConfig,
    pub tiles: TileGridConfig,
    pub icons: IconPlacementConfig,
}

impl InteractionConfig {
    /// Parses and validates a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: InteractionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.clicks.double_click_window_ms == 0 {
            return Err(MapError::Config(
                "double_click_window_ms must be positive".to_string(),
            ));
        }
        if self.tiles.min_level > self.tiles.max_level {
            return Err(MapError::Config(format!(
                "tile level range {}..={} is empty",
                self.tiles.min_level, self.tiles.max_level
            )));
        }
        let interval = self.icons.interval_meters;
        if interval <= 0.0 || !interval.is_finite() {
            return Err(MapError::Config(
                "icon interval must be a positive distance".to_string(),
            ));
        }
        if self.icons.angle_slice_degrees == 0 || self.icons.angle_slice_degrees > 360 {
            return Err(MapError::Config(format!(
                "angle slice {} outside 1..=360",
                self.icons.angle_slice_degrees
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickTimingConfig {
    pub double_click_window_ms: u64,
}

impl ClickTimingConfig {
    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_window_ms)
    }
}

impl Default for ClickTimingConfig {
    fn default() -> Self {
        Self {
            double_click_window_ms: DOUBLE_CLICK_WINDOW_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileGridConfig {
    pub min_level: u8,
    pub max_level: u8,
}

impl Default for TileGridConfig {
    fn default() -> Self {
        Self {
            min_level: MIN_TILE_LEVEL,
            max_level: MAX_TILE_LEVEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconPlacementConfig {
    pub interval_meters: f64,
    pub angle_slice_degrees: u32,
}

impl Default for IconPlacementConfig {
    fn default() -> Self {
        Self {
            interval_meters: ICON_INTERVAL_METERS,
            angle_slice_degrees: ANGLE_SLICE_DEGREES,
        }
    }
}
