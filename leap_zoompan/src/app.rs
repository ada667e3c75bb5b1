//! Top-level run loop.
//!
//! `AppState` owns the `ZoomPan` engine, the receiving end of its event
//! channel, and the `Viewport` those events drive.  Source events are handled
//! one at a time; engine events are drained after each of them.

use std::sync::mpsc::{self, Receiver, TryRecvError};

use tracing::{debug, info, trace};
use zoompan_engine::{HandState, ZoomPan, ZoomPanEvent};

use crate::config::{AppConfig, ConfigError};
use crate::source::{spawn_sample_source, SourceEvent};
use crate::viewport::Viewport;

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    engine:    ZoomPan,
    engine_rx: Receiver<ZoomPanEvent>,
    viewport:  Viewport,

    /// Every committed state, in order.
    transitions: Vec<HandState>,
    samples:     u64,

    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        let (tx, engine_rx) = mpsc::channel();
        let viewport = Viewport::new(cfg.viewport.clone());
        AppState {
            engine: ZoomPan::new(cfg.engine.clone(), tx),
            engine_rx,
            status: viewport.status(),
            viewport,
            transitions: Vec::new(),
            samples:     0,
        }
    }

    // ── process one SourceEvent ──────────────────────────────────────────

    /// Returns `false` once the source has asked to quit.
    pub fn handle_source_event(&mut self, event: SourceEvent) -> bool {
        match event {
            SourceEvent::Sample(sample) => {
                self.engine.feed(sample);
                self.samples += 1;
            }
            SourceEvent::Command(cmd) => {
                self.viewport.apply_command(cmd);
                self.status = self.viewport.status();
                info!(command = ?cmd, "{}", self.status);
            }
            SourceEvent::Quit => return false,
        }
        true
    }

    // ── engine events → viewport ─────────────────────────────────────────

    /// Apply every engine event received so far.  Returns how many there were.
    pub fn drain_engine_events(&mut self) -> usize {
        let mut n = 0;
        loop {
            match self.engine_rx.try_recv() {
                Ok(event) => {
                    self.apply(event);
                    n += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return n,
            }
        }
    }

    fn apply(&mut self, event: ZoomPanEvent) {
        self.viewport.apply_event(&event);
        self.status = self.viewport.status();
        match event {
            ZoomPanEvent::StateChanged(state) => {
                self.transitions.push(state);
                info!(sample = self.samples, "{}", self.status);
            }
            ZoomPanEvent::ScaleChanged(_) | ZoomPanEvent::OffsetChanged { .. } => {
                debug!("{}", self.status);
            }
            ZoomPanEvent::CursorMoved { .. } => trace!("{}", self.status),
        }
    }

    /// Shut the engine down and apply whatever its rate limiters still hold.
    ///
    /// Blocks for at most one output interval, until every pending delivery
    /// has been made.
    pub fn finish(self) -> Viewport {
        let AppState { engine, engine_rx, mut viewport, samples, .. } = self;
        drop(engine);
        let mut trailing = 0;
        for event in engine_rx.iter() {
            viewport.apply_event(&event);
            trailing += 1;
        }
        debug!(trailing, "engine outputs flushed");
        info!(samples, "final view: {}", viewport.status());
        viewport
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn engine(&self)      -> &ZoomPan     { &self.engine }
    pub fn viewport(&self)    -> &Viewport    { &self.viewport }
    pub fn transitions(&self) -> &[HandState] { &self.transitions }
    pub fn samples(&self)     -> u64          { self.samples }
}

// ════════════════════════════════════════════════════════════════════════════
// run
// ════════════════════════════════════════════════════════════════════════════

/// Drive the engine from `source` until it quits or hangs up.
pub fn run_with(cfg: &AppConfig, source: Receiver<SourceEvent>) -> Result<Viewport, ConfigError> {
    cfg.validate()?;
    let mut app = AppState::new(cfg);

    for event in source.iter() {
        let keep_going = app.handle_source_event(event);
        app.drain_engine_events();
        if !keep_going {
            debug!("source finished");
            break;
        }
    }

    Ok(app.finish())
}

/// Spawn the configured source and run until it ends.
pub fn run(cfg: &AppConfig) -> Result<Viewport, ConfigError> {
    run_with(cfg, spawn_configured_source(cfg))
}

#[cfg(feature = "leap")]
fn spawn_configured_source(cfg: &AppConfig) -> Receiver<SourceEvent> {
    use crate::source::LeapSampleSource;
    info!("reading hands from the LeapMotion controller");
    spawn_sample_source(LeapSampleSource { max_distance_cm: cfg.tracking.max_hand_distance_cm })
}

#[cfg(not(feature = "leap"))]
fn spawn_configured_source(cfg: &AppConfig) -> Receiver<SourceEvent> {
    use std::time::Duration;
    use crate::source::SimSampleSource;
    let interval = Duration::from_millis(cfg.tracking.frame_interval_ms);
    info!(frame_ms = cfg.tracking.frame_interval_ms, "replaying the simulated session");
    spawn_sample_source(SimSampleSource::demo(interval))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
