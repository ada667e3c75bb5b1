//! # zoompan_engine
//!
//! Turns a noisy stream of 3D hand samples into a stable gesture state and
//! smoothed, rate-limited zoom / pan / cursor output.
//!
//! ## Pipeline
//!
//! | Stage | Type | Output |
//! |---|---|---|
//! | Sample | [`HandLocation`] | palm + three fingertips, or empty |
//! | Classify | [`SpeedBasedDetector`] | candidate [`HandState`] |
//! | Debounce | [`ZoomPan`] | committed [`HandState`] |
//! | Project | [`Throttle`] ×3 | [`ZoomPanEvent`]s |
//!
//! ## Gesture → Action mapping
//!
//! | Committed state | Palm motion | Action |
//! |---|---|---|
//! | Still / Adjusting | forward / back (Y) | zoom out / in |
//! | Still / Adjusting | left / right (X) | pan horizontally |
//! | Still / Adjusting | up / down (Z) | pan vertically |
//! | Moving | any | zoom and pan frozen at their last values |
//! | Invisible | — | cursor hidden |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use zoompan_engine::{EngineConfig, HandLocation, Vec3, ZoomPan, ZoomPanEvent};
//! use std::sync::mpsc;
//!
//! let (tx, rx) = mpsc::channel::<ZoomPanEvent>();
//! let mut engine = ZoomPan::new(EngineConfig::default(), tx);
//!
//! let palm = Vec3::new(0.0, 20.0, 0.0);
//! engine.feed(HandLocation::new(palm, palm, palm, palm));
//!
//! while let Ok(event) = rx.try_recv() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod hand;
pub mod filter;
pub mod detector;
pub mod throttle;
pub mod config;
pub mod engine;

pub use config::EngineConfig;
pub use detector::{HandStateDetector, HysteresisBand, SpeedBasedDetector};
pub use engine::{Gesture, ZoomPan, ZoomPanEvent};
pub use filter::{LowPassFilter, PalmFilter};
pub use hand::{HandLocation, HandState, Vec3};
pub use throttle::Throttle;

/// Errors raised while preparing an engine.  Running an engine never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid engine configuration: {0}")]
    Config(String),
}
