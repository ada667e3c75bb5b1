//! Engine tuning.
//!
//! Every field has a default, so a partial `[engine]` table in a config file
//! only overrides what it names.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Tuning knobs for [`ZoomPan`](crate::ZoomPan) and its detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Samples kept by the speed detector.
    pub history_len: usize,
    /// Palm speed (cm/frame) separating Still from Adjusting.
    pub adjustment_threshold: f64,
    /// Palm speed (cm/frame) separating Adjusting from Moving.
    pub movement_threshold: f64,
    /// Net candidate wins needed to commit a new state.
    pub votes_to_commit: u32,
    /// Filter alpha while Still.
    pub stable_alpha: f64,
    /// Filter alpha in every other state.
    pub responsive_alpha: f64,
    /// Scale change per centimetre of forward/back palm travel.
    pub zoom_sensitivity: f64,
    /// Offset change per centimetre of sideways/vertical palm travel.
    pub offset_sensitivity: f64,
    /// Exponent applied to emitted scales of 1.0 and above.
    pub zoom_in_exponent: f64,
    pub scale_interval_ms: u64,
    pub offset_interval_ms: u64,
    pub cursor_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            history_len:          20,
            adjustment_threshold: 0.003,
            movement_threshold:   0.01,
            votes_to_commit:      10,
            stable_alpha:         0.001,
            responsive_alpha:     0.1,
            zoom_sensitivity:     0.05,
            offset_sensitivity:   10.0,
            zoom_in_exponent:     1.5,
            scale_interval_ms:    200,
            offset_interval_ms:   200,
            cursor_interval_ms:   40,
        }
    }
}

impl EngineConfig {
    /// Check that the values describe a working engine.
    /// Reports the first offending field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.history_len < 2 {
            return Err(Error::Config(format!(
                "history_len must be at least 2, got {}", self.history_len
            )));
        }
        if !(self.adjustment_threshold > 0.0) {
            return Err(Error::Config(format!(
                "adjustment_threshold must be > 0, got {}", self.adjustment_threshold
            )));
        }
        if !(self.movement_threshold > self.adjustment_threshold) {
            return Err(Error::Config(format!(
                "movement_threshold ({}) must exceed adjustment_threshold ({})",
                self.movement_threshold, self.adjustment_threshold
            )));
        }
        if self.votes_to_commit == 0 {
            return Err(Error::Config("votes_to_commit must be > 0".to_string()));
        }
        for (name, alpha) in [
            ("stable_alpha", self.stable_alpha),
            ("responsive_alpha", self.responsive_alpha),
        ] {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(Error::Config(format!(
                    "{} must be in (0, 1], got {}", name, alpha
                )));
            }
        }
        if !self.zoom_sensitivity.is_finite() || !self.offset_sensitivity.is_finite() {
            return Err(Error::Config("sensitivities must be finite".to_string()));
        }
        if !(self.zoom_in_exponent > 0.0) {
            return Err(Error::Config(format!(
                "zoom_in_exponent must be > 0, got {}", self.zoom_in_exponent
            )));
        }
        Ok(())
    }

    pub fn scale_interval(&self) -> Duration {
        Duration::from_millis(self.scale_interval_ms)
    }

    pub fn offset_interval(&self) -> Duration {
        Duration::from_millis(self.offset_interval_ms)
    }

    pub fn cursor_interval(&self) -> Duration {
        Duration::from_millis(self.cursor_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn default_intervals() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.scale_interval(), Duration::from_millis(200));
        assert_eq!(cfg.offset_interval(), Duration::from_millis(200));
        assert_eq!(cfg.cursor_interval(), Duration::from_millis(40));
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let cfg = EngineConfig {
            adjustment_threshold: 0.02,
            movement_threshold:   0.01,
            ..EngineConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("movement_threshold"));
    }

    #[test]
    fn rejects_zero_votes() {
        let cfg = EngineConfig { votes_to_commit: 0, ..EngineConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_alpha_out_of_range() {
        let cfg = EngineConfig { stable_alpha: 0.0, ..EngineConfig::default() };
        assert!(cfg.validate().unwrap_err().to_string().contains("stable_alpha"));
        let cfg = EngineConfig { responsive_alpha: 1.5, ..EngineConfig::default() };
        assert!(cfg.validate().unwrap_err().to_string().contains("responsive_alpha"));
    }

    #[test]
    fn rejects_tiny_history() {
        let cfg = EngineConfig { history_len: 1, ..EngineConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: EngineConfig = toml::from_str("votes_to_commit = 4\ncursor_interval_ms = 16\n")
            .expect("valid toml");
        assert_eq!(cfg.votes_to_commit, 4);
        assert_eq!(cfg.cursor_interval_ms, 16);
        assert_eq!(cfg.history_len, 20);
        assert_eq!(cfg.zoom_sensitivity, 0.05);
    }
}
