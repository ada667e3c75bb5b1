//! Hand samples and the gesture-state enum.
//!
//! Coordinates follow the classic LeapMotion frame, in centimetres:
//! X = left, Y = forward, Z = down.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

// ════════════════════════════════════════════════════════════════════════════
// Vec3
// ════════════════════════════════════════════════════════════════════════════

/// A point or displacement in sensor space (centimetres).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    /// Euclidean length.
    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, k: f64) -> Vec3 {
        Vec3::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;
    fn div(self, k: f64) -> Vec3 {
        Vec3::new(self.x / k, self.y / k, self.z / k)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLocation — one tracking frame
// ════════════════════════════════════════════════════════════════════════════

/// Snapshot of one tracked hand for a single sensor frame.
///
/// A frame without a usable hand is represented by [`HandLocation::empty`],
/// never by an error value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandLocation {
    pub palm:   Vec3,
    pub thumb:  Vec3,
    pub index:  Vec3,
    pub middle: Vec3,
    is_empty:   bool,
}

impl HandLocation {
    pub fn new(palm: Vec3, thumb: Vec3, index: Vec3, middle: Vec3) -> Self {
        HandLocation { palm, thumb, index, middle, is_empty: false }
    }

    /// Marker for "no hand detected this frame"; all vectors are zero.
    pub fn empty() -> Self {
        HandLocation {
            palm:     Vec3::ZERO,
            thumb:    Vec3::ZERO,
            index:    Vec3::ZERO,
            middle:   Vec3::ZERO,
            is_empty: true,
        }
    }

    /// Convenience for sources that only track the palm.
    pub fn palm_only(palm: Vec3) -> Self {
        HandLocation::new(palm, palm, palm, palm)
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandState
// ════════════════════════════════════════════════════════════════════════════

/// Committed gesture classification.
///
/// Variants are ordered by increasing motion, except `Invisible`, which means
/// there is no signal at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HandState {
    Invisible = 0,
    Still     = 1,
    Adjusting = 2,
    Moving    = 3,
}

impl HandState {
    pub const ALL: [HandState; 4] = [
        HandState::Invisible,
        HandState::Still,
        HandState::Adjusting,
        HandState::Moving,
    ];

    /// Slot in per-state arrays such as the vote counters.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Decode a tag produced by `self as u8`.
    ///
    /// # Panics
    ///
    /// On any tag outside `0..4`.  Such a tag can only come from a corrupted
    /// state cell, and continuing with a guessed state would hide the bug.
    pub fn from_tag(tag: u8) -> HandState {
        match tag {
            0 => HandState::Invisible,
            1 => HandState::Still,
            2 => HandState::Adjusting,
            3 => HandState::Moving,
            _ => unreachable!("invalid hand state tag {}", tag),
        }
    }

    /// Zoom and pan follow the hand only in these states.
    pub fn is_gesturing(self) -> bool {
        matches!(self, HandState::Still | HandState::Adjusting)
    }

    pub fn name(self) -> &'static str {
        match self {
            HandState::Invisible => "invisible",
            HandState::Still     => "still",
            HandState::Adjusting => "adjusting",
            HandState::Moving    => "moving",
        }
    }
}

impl fmt::Display for HandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
