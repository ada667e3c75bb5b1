//! The controlled view: scale, pan offset and the on-screen hand cursor.
//!
//! `Viewport` is driven by [`ZoomPanEvent`]s from the engine and by discrete
//! [`ViewCommand`]s (keyboard-style zoom / pan steps).

use zoompan_engine::{HandState, ZoomPanEvent};

use crate::config::ViewportConfig;

/// Position used to park the cursor off screen.
pub const CURSOR_HIDDEN: f64 = -1e8;

// ════════════════════════════════════════════════════════════════════════════
// ViewCommand
// ════════════════════════════════════════════════════════════════════════════

/// Discrete view adjustments, independent of the hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewCommand {
    ZoomIn,
    ZoomOut,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
}

// ════════════════════════════════════════════════════════════════════════════
// CursorTint — per-state cursor colour (ARGB)
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorTint(pub u32);

impl CursorTint {
    pub const IDLE:      CursorTint = CursorTint(0x50FF_FFFF);
    pub const STILL:     CursorTint = CursorTint(0x60FF_FFFF);
    pub const ADJUSTING: CursorTint = CursorTint(0xFF00_FF00);
    pub const MOVING:    CursorTint = CursorTint(0xD6FF_8000);
}

// ════════════════════════════════════════════════════════════════════════════
// Viewport
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Viewport {
    cfg: ViewportConfig,

    pub scale:    f64,
    pub offset_x: f64,
    pub offset_y: f64,

    pub cursor_x:    f64,
    pub cursor_y:    f64,
    pub cursor_size: f64,
    pub cursor_tint: CursorTint,

    pub hand_state: HandState,
}

impl Viewport {
    pub fn new(cfg: ViewportConfig) -> Self {
        Viewport {
            cursor_size: cfg.cursor_size,
            cfg,
            scale:       1.0,
            offset_x:    0.0,
            offset_y:    0.0,
            cursor_x:    CURSOR_HIDDEN,
            cursor_y:    CURSOR_HIDDEN,
            cursor_tint: CursorTint::IDLE,
            hand_state:  HandState::Invisible,
        }
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_x > CURSOR_HIDDEN && self.cursor_y > CURSOR_HIDDEN
    }

    // ── engine events ────────────────────────────────────────────────────

    pub fn apply_event(&mut self, event: &ZoomPanEvent) {
        match *event {
            ZoomPanEvent::ScaleChanged(scale) => {
                self.scale = scale;
            }
            ZoomPanEvent::OffsetChanged { x, y } => {
                self.offset_x = x;
                self.offset_y = y;
            }
            ZoomPanEvent::StateChanged(state) => {
                self.hand_state = state;
                match state {
                    HandState::Invisible => {
                        self.cursor_x = CURSOR_HIDDEN;
                        self.cursor_y = CURSOR_HIDDEN;
                    }
                    HandState::Still     => self.cursor_tint = CursorTint::STILL,
                    HandState::Adjusting => self.cursor_tint = CursorTint::ADJUSTING,
                    HandState::Moving    => self.cursor_tint = CursorTint::MOVING,
                }
            }
            ZoomPanEvent::CursorMoved { dx, dy, dz } => {
                let c = &self.cfg;
                let size = (c.cursor_size - dy * c.cursor_size_scale).max(c.cursor_min_size);
                self.cursor_size = size;
                self.cursor_x = c.width / 2.0 + dx * c.cursor_movement_scale - size / 2.0;
                self.cursor_y = c.height / 2.0 + dz * c.cursor_movement_scale - size / 2.0;
            }
        }
    }

    // ── discrete commands ────────────────────────────────────────────────

    pub fn apply_command(&mut self, cmd: ViewCommand) {
        let pan = self.cfg.pan_gain;
        match cmd {
            ViewCommand::ZoomIn   => self.scale *= self.cfg.zoom_gain,
            ViewCommand::ZoomOut  => self.scale /= self.cfg.zoom_gain,
            ViewCommand::PanLeft  => self.offset_x -= pan,
            ViewCommand::PanRight => self.offset_x += pan,
            ViewCommand::PanUp    => self.offset_y -= pan,
            ViewCommand::PanDown  => self.offset_y += pan,
        }
    }

    /// One-line summary for the status log.
    pub fn status(&self) -> String {
        let cursor = if self.cursor_visible() {
            format!("({:.0}, {:.0}) ⌀{:.0}", self.cursor_x, self.cursor_y, self.cursor_size)
        } else {
            "hidden".to_string()
        };
        format!(
            "{:<9}  scale={:.3}  offset=({:.1}, {:.1})  cursor={}",
            self.hand_state, self.scale, self.offset_x, self.offset_y, cursor
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
