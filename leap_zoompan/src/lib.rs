//! # leap_zoompan
//!
//! Touchless zoom and pan: a tracked hand drives the scale, offset and cursor
//! of a view through the [`zoompan_engine`] state machine.
//!
//! ## Gesture → Action mapping
//!
//! | Hand | Committed state | Action |
//! |---|---|---|
//! | Out of view | `Invisible` | Cursor hidden, view untouched |
//! | Held steady | `Still` | Reference captured, cursor shown |
//! | Drawn back | `Adjusting` | Zoom in (push forward to zoom out) |
//! | Slid sideways or up and down | `Adjusting` | Pan |
//! | Swiped quickly | `Moving` | Current zoom and pan kept |
//!
//! Discrete [`ViewCommand`](viewport::ViewCommand)s step the view by a fixed
//! factor or offset regardless of the hand.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: a scripted hand session replays at the
//!   configured frame rate.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ## Logging
//!
//! State changes are logged at `info`, view updates at `debug`, cursor moves
//! at `trace`.  Override with `RUST_LOG`.

pub mod args;
pub mod config;
pub mod viewport;
pub mod source;
pub mod app;
