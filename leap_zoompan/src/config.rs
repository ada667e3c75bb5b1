//! Application configuration, loaded from TOML.
//!
//! ```toml
//! [engine]
//! votes_to_commit = 8
//!
//! [viewport]
//! width = 1920
//! height = 1080
//!
//! [tracking]
//! max_hand_distance_cm = 40.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use zoompan_engine::EngineConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Engine(#[from] zoompan_engine::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine:   EngineConfig,
    pub viewport: ViewportConfig,
    pub tracking: TrackingConfig,
}

/// Geometry of the controlled view and its hand cursor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width:  f64,
    pub height: f64,
    /// Factor applied by a single zoom-in / zoom-out command.
    pub zoom_gain: f64,
    /// Offset shift of a single pan command.
    pub pan_gain: f64,
    /// Cursor diameter with the hand at the reference depth.
    pub cursor_size: f64,
    pub cursor_min_size: f64,
    /// Cursor shrink per centimetre of forward travel.
    pub cursor_size_scale: f64,
    /// Cursor travel per centimetre of palm travel.
    pub cursor_movement_scale: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig {
            width:                 1280.0,
            height:                720.0,
            zoom_gain:             1.1,
            pan_gain:              20.0,
            cursor_size:           86.0,
            cursor_min_size:       16.0,
            cursor_size_scale:     3.0,
            cursor_movement_scale: 10.0,
        }
    }
}

/// Hand-source settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Palms farther than this from the sensor are reported as "no hand".
    pub max_hand_distance_cm: f64,
    /// Frame spacing of the simulated source.
    pub frame_interval_ms: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        TrackingConfig {
            max_hand_distance_cm: 50.0,
            frame_interval_ms:    10,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "viewport must have a positive size, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if !(self.viewport.zoom_gain > 1.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom_gain must be > 1, got {}", self.viewport.zoom_gain
            )));
        }
        if !(self.tracking.max_hand_distance_cm > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_hand_distance_cm must be > 0, got {}", self.tracking.max_hand_distance_cm
            )));
        }
        Ok(())
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let cfg: AppConfig = toml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let cfg = Self::load(path)?;
            info!("loaded configuration from {}", path.display());
            Ok(cfg)
        } else {
            info!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
