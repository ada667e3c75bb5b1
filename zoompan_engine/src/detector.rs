//! Hand-state detection — raw per-frame candidates, before debouncing.
//!
//! The state machine in [`crate::engine`] only sees the
//! [`HandStateDetector`] trait, so alternative classifiers can be dropped in.

use std::collections::VecDeque;

use tracing::trace;

use crate::config::EngineConfig;
use crate::hand::{HandLocation, HandState, Vec3};

// ════════════════════════════════════════════════════════════════════════════
// HandStateDetector trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can propose a [`HandState`] for each incoming sample.
pub trait HandStateDetector: Send {
    /// Consume one sample.  `None` means "no opinion": keep the committed
    /// state.
    fn candidate(&mut self, sample: &HandLocation) -> Option<HandState>;

    /// Called after the state machine commits `state`.
    fn on_state_committed(&mut self, state: HandState);
}

// ════════════════════════════════════════════════════════════════════════════
// HysteresisBand
// ════════════════════════════════════════════════════════════════════════════

const UPPER_OPEN: f64 = 1e8;

/// Speed interval inside which the detector stays silent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HysteresisBand {
    pub exit_down: f64,
    pub exit_up:   f64,
}

impl HysteresisBand {
    /// Band for a freshly committed `state`.
    pub fn for_state(state: HandState, adjustment: f64, movement: f64) -> Self {
        let (exit_up, exit_down) = match state {
            HandState::Invisible => (UPPER_OPEN,        adjustment / 1.2),
            HandState::Still     => (adjustment * 1.2,  0.0),
            HandState::Adjusting => (movement * 1.2,    adjustment / 1.5),
            HandState::Moving    => (UPPER_OPEN,        movement / 1.2),
        };
        HysteresisBand { exit_down, exit_up }
    }

    pub fn excludes(&self, speed: f64) -> bool {
        speed < self.exit_down || speed > self.exit_up
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SpeedBasedDetector
// ════════════════════════════════════════════════════════════════════════════

/// Classifies by the averaged frame-to-frame palm displacement over a short
/// history window.
///
/// # Algorithm
///
/// * Keep the last `history_len` samples, newest first.
/// * Average the palm displacement over every adjacent pair where both
///   samples carry a hand; pairs touching an empty frame are skipped.
/// * `speed` is the length of that average.  Zero means nothing is moving
///   or nothing is visible, and always proposes `Invisible`.
/// * Otherwise a candidate is proposed only when `speed` leaves the band of
///   the committed state.
pub struct SpeedBasedDetector {
    history:    VecDeque<Option<HandLocation>>,
    capacity:   usize,
    adjustment: f64,
    movement:   f64,
    band:       HysteresisBand,
    last_speed: f64,
}

impl SpeedBasedDetector {
    pub fn new(cfg: &EngineConfig) -> Self {
        let capacity = cfg.history_len.max(2);
        let mut history = VecDeque::with_capacity(capacity);
        history.resize(capacity, None);
        SpeedBasedDetector {
            history,
            capacity,
            adjustment: cfg.adjustment_threshold,
            movement:   cfg.movement_threshold,
            band: HysteresisBand::for_state(
                HandState::Invisible,
                cfg.adjustment_threshold,
                cfg.movement_threshold,
            ),
            last_speed: 0.0,
        }
    }

    pub fn band(&self) -> HysteresisBand {
        self.band
    }

    /// Speed computed for the most recent sample.
    pub fn last_speed(&self) -> f64 {
        self.last_speed
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn store(&mut self, sample: HandLocation) {
        self.history.pop_back();
        self.history.push_front(Some(sample));
    }

    fn speed(&self) -> f64 {
        let mut sum = Vec3::ZERO;
        let mut pairs = 0usize;

        for (newer, older) in self.history.iter().zip(self.history.iter().skip(1)) {
            if let (Some(newer), Some(older)) = (newer, older) {
                if newer.is_empty() || older.is_empty() {
                    continue;
                }
                sum = sum + (older.palm - newer.palm);
                pairs += 1;
            }
        }

        (sum / pairs.max(1) as f64).norm()
    }

    fn classify(&self, speed: f64) -> HandState {
        if speed == 0.0 {
            HandState::Invisible
        } else if speed < self.adjustment {
            HandState::Still
        } else if speed < self.movement {
            HandState::Adjusting
        } else {
            HandState::Moving
        }
    }
}

impl HandStateDetector for SpeedBasedDetector {
    fn candidate(&mut self, sample: &HandLocation) -> Option<HandState> {
        self.store(*sample);

        let speed = self.speed();
        self.last_speed = speed;
        trace!(speed, "palm speed");

        if speed == 0.0 {
            Some(HandState::Invisible)
        } else if self.band.excludes(speed) {
            Some(self.classify(speed))
        } else {
            None
        }
    }

    fn on_state_committed(&mut self, state: HandState) {
        self.band = HysteresisBand::for_state(state, self.adjustment, self.movement);
        debug_assert_eq!(self.history.len(), self.capacity);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
