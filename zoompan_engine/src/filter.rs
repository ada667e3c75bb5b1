//! Exponential low-pass smoothing.

use crate::hand::Vec3;

/// One smoothing step.  An unseeded state takes `value` verbatim.
fn smooth(previous: &mut Option<f64>, alpha: f64, value: f64) -> f64 {
    let next = match *previous {
        Some(p) => p + alpha * (value - p),
        None    => value,
    };
    *previous = Some(next);
    next
}

// ════════════════════════════════════════════════════════════════════════════
// LowPassFilter — scalar
// ════════════════════════════════════════════════════════════════════════════

/// Exponential smoother over a scalar stream.
///
/// `alpha` may be changed at any time; the new value applies from the next
/// [`feed`](Self::feed) on.
#[derive(Clone, Debug)]
pub struct LowPassFilter {
    pub alpha: f64,
    previous:  Option<f64>,
}

impl LowPassFilter {
    pub fn new(alpha: f64) -> Self {
        LowPassFilter { alpha, previous: None }
    }

    pub fn feed(&mut self, value: f64) -> f64 {
        smooth(&mut self.previous, self.alpha, value)
    }

    /// Forget the history; the next `feed` seeds the filter again.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    pub fn is_seeded(&self) -> bool {
        self.previous.is_some()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PalmFilter — three axes, one alpha
// ════════════════════════════════════════════════════════════════════════════

/// Smooths a palm position on x, y and z with a single shared alpha.
#[derive(Clone, Debug)]
pub struct PalmFilter {
    alpha: f64,
    axes:  [Option<f64>; 3],
}

impl PalmFilter {
    pub fn new(alpha: f64) -> Self {
        PalmFilter { alpha, axes: [None; 3] }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn feed(&mut self, p: Vec3) -> Vec3 {
        let [x, y, z] = &mut self.axes;
        Vec3::new(
            smooth(x, self.alpha, p.x),
            smooth(y, self.alpha, p.y),
            smooth(z, self.alpha, p.z),
        )
    }

    pub fn reset(&mut self) {
        self.axes = [None; 3];
    }

    pub fn is_seeded(&self) -> bool {
        self.axes.iter().all(Option::is_some)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
