//! The debounced gesture state machine and its throttled outputs.
//!
//! `ZoomPan` owns the detector, the vote counters, the palm filter, the
//! reference sample and the base/adjusted gesture.  It is fed one sample at a
//! time from a single thread and reports through an `mpsc` channel of
//! [`ZoomPanEvent`]s.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use tracing::debug;

use crate::config::EngineConfig;
use crate::detector::{HandStateDetector, SpeedBasedDetector};
use crate::filter::PalmFilter;
use crate::hand::{HandLocation, HandState, Vec3};
use crate::throttle::Throttle;

// ════════════════════════════════════════════════════════════════════════════
// ZoomPanEvent
// ════════════════════════════════════════════════════════════════════════════

/// Notifications emitted by the engine.
///
/// `StateChanged` is sent synchronously from [`ZoomPan::feed`]; the other
/// three come from throttle worker threads.
#[derive(Clone, Debug, PartialEq)]
pub enum ZoomPanEvent {
    StateChanged(HandState),
    /// Zoom factor, already passed through the zoom-in curve.
    ScaleChanged(f64),
    OffsetChanged { x: f64, y: f64 },
    /// Raw filtered palm displacement from the reference, in centimetres.
    CursorMoved { dx: f64, dy: f64, dz: f64 },
}

// ════════════════════════════════════════════════════════════════════════════
// Gesture — scale + offset
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gesture {
    pub scale:    f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Gesture {
    fn default() -> Self {
        Gesture { scale: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

/// Map an adjusted scale to the value shown on screen.  Zooming in is
/// stretched by `exponent`; zooming out passes through.
pub fn zoom_curve(scale: f64, exponent: f64) -> f64 {
    if scale < 1.0 { scale } else { scale.powf(exponent) }
}

// ════════════════════════════════════════════════════════════════════════════
// Shared state cell — read by the throttle workers at delivery time
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
struct StateCell(Arc<AtomicU8>);

impl StateCell {
    fn new(state: HandState) -> Self {
        StateCell(Arc::new(AtomicU8::new(state as u8)))
    }

    fn load(&self) -> HandState {
        HandState::from_tag(self.0.load(Ordering::Acquire))
    }

    fn store(&self, state: HandState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Votes — debounce counters
// ════════════════════════════════════════════════════════════════════════════

/// One counter per [`HandState`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Votes([u32; 4]);

impl Votes {
    /// Count one win for `candidate` and one loss for every other state.
    /// Returns `true` (and clears every counter) once `candidate` reaches
    /// `needed`.
    pub fn cast(&mut self, candidate: HandState, needed: u32) -> bool {
        for state in HandState::ALL {
            let slot = &mut self.0[state.index()];
            if state == candidate {
                *slot += 1;
            } else {
                *slot = slot.saturating_sub(1);
            }
        }
        if self.0[candidate.index()] >= needed {
            self.clear();
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.0 = [0; 4];
    }

    pub fn get(&self, state: HandState) -> u32 {
        self.0[state.index()]
    }

    pub fn is_clear(&self) -> bool {
        self.0.iter().all(|&v| v == 0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ZoomPan — the engine
// ════════════════════════════════════════════════════════════════════════════

/// Gesture-to-viewport engine.
///
/// # Per-sample flow
///
/// 1. The detector proposes a candidate (or keeps the committed state).
/// 2. A differing candidate casts a vote; `votes_to_commit` net wins commit it.
/// 3. On commit: emit `StateChanged`, rebind the detector's band, retune the
///    filter, and capture or drop the reference sample.
/// 4. Otherwise, while Still or Adjusting with a reference, the filtered palm
///    displacement drives the scale, offset and cursor channels.
pub struct ZoomPan<D: HandStateDetector = SpeedBasedDetector> {
    cfg:       EngineConfig,
    detector:  D,
    state:     HandState,
    shared:    StateCell,
    votes:     Votes,
    filter:    PalmFilter,
    reference: Option<HandLocation>,
    base:      Gesture,
    adjusted:  Gesture,
    tx:        Sender<ZoomPanEvent>,
    scale_out:  Throttle<f64>,
    offset_out: Throttle<(f64, f64)>,
    cursor_out: Throttle<Vec3>,
}

impl ZoomPan<SpeedBasedDetector> {
    /// Engine with the default speed-based detector.
    pub fn new(cfg: EngineConfig, tx: Sender<ZoomPanEvent>) -> Self {
        let detector = SpeedBasedDetector::new(&cfg);
        ZoomPan::with_detector(cfg, detector, tx)
    }
}

impl<D: HandStateDetector> ZoomPan<D> {
    pub fn with_detector(cfg: EngineConfig, detector: D, tx: Sender<ZoomPanEvent>) -> Self {
        let shared = StateCell::new(HandState::Invisible);

        let scale_out = {
            let (tx, state) = (tx.clone(), shared.clone());
            let exponent = cfg.zoom_in_exponent;
            Throttle::spawn("scale", cfg.scale_interval(), move |scale: f64| {
                if state.load().is_gesturing() {
                    let scale = zoom_curve(scale, exponent);
                    debug!("zoom {:.2}", scale);
                    let _ = tx.send(ZoomPanEvent::ScaleChanged(scale));
                }
            })
        };

        let offset_out = {
            let (tx, state) = (tx.clone(), shared.clone());
            Throttle::spawn("offset", cfg.offset_interval(), move |(x, y): (f64, f64)| {
                if state.load().is_gesturing() {
                    debug!("offset {:.1} {:.1}", x, y);
                    let _ = tx.send(ZoomPanEvent::OffsetChanged { x, y });
                }
            })
        };

        let cursor_out = {
            let (tx, state) = (tx.clone(), shared.clone());
            Throttle::spawn("cursor", cfg.cursor_interval(), move |d: Vec3| {
                if state.load() != HandState::Invisible {
                    let _ = tx.send(ZoomPanEvent::CursorMoved { dx: d.x, dy: d.y, dz: d.z });
                }
            })
        };

        ZoomPan {
            filter: PalmFilter::new(cfg.responsive_alpha),
            cfg,
            detector,
            state: HandState::Invisible,
            shared,
            votes: Votes::default(),
            reference: None,
            base: Gesture::default(),
            adjusted: Gesture::default(),
            tx,
            scale_out,
            offset_out,
            cursor_out,
        }
    }

    // ── process one sample ───────────────────────────────────────────────

    pub fn feed(&mut self, sample: HandLocation) {
        let candidate = self.detector.candidate(&sample).unwrap_or(self.state);

        if candidate != self.state && self.votes.cast(candidate, self.cfg.votes_to_commit) {
            self.commit(candidate, &sample);
        } else if self.state.is_gesturing() && !sample.is_empty() {
            match self.reference {
                Some(reference) => self.project(&sample, &reference),
                // Still was committed on an empty frame; the first visible
                // one becomes the reference.
                None if self.state == HandState::Still => self.capture(&sample),
                None => {}
            }
        }
    }

    fn commit(&mut self, state: HandState, sample: &HandLocation) {
        debug!(from = %self.state, to = %state, "hand state committed");
        self.state = state;
        self.shared.store(state);
        let _ = self.tx.send(ZoomPanEvent::StateChanged(state));

        self.detector.on_state_committed(state);

        self.filter.set_alpha(if state == HandState::Still {
            self.cfg.stable_alpha
        } else {
            self.cfg.responsive_alpha
        });

        match state {
            HandState::Still => {
                if self.reference.is_none() && !sample.is_empty() {
                    self.capture(sample);
                }
            }
            HandState::Moving | HandState::Invisible => {
                self.reference = None;
                self.filter.reset();
                self.base = self.adjusted;
            }
            HandState::Adjusting => {}
        }
    }

    fn capture(&mut self, sample: &HandLocation) {
        debug!(palm = ?sample.palm, "reference captured");
        self.reference = Some(*sample);
        self.filter.feed(sample.palm);
    }

    fn project(&mut self, sample: &HandLocation, reference: &HandLocation) {
        let filtered = self.filter.feed(sample.palm);
        let d = filtered - reference.palm;

        self.cursor_out.invoke(d);

        self.adjusted.scale = self.base.scale - d.y * self.cfg.zoom_sensitivity;
        self.scale_out.invoke(self.adjusted.scale);

        self.adjusted.offset_x = self.base.offset_x + d.x * self.cfg.offset_sensitivity;
        self.adjusted.offset_y = self.base.offset_y + d.z * self.cfg.offset_sensitivity;
        self.offset_out.invoke((self.adjusted.offset_x, self.adjusted.offset_y));
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn state(&self)     -> HandState            { self.state }
    pub fn base(&self)      -> Gesture              { self.base }
    pub fn adjusted(&self)  -> Gesture              { self.adjusted }
    pub fn reference(&self) -> Option<&HandLocation> { self.reference.as_ref() }
    pub fn votes(&self)     -> &Votes               { &self.votes }
    pub fn config(&self)    -> &EngineConfig        { &self.cfg }
    pub fn detector(&self)  -> &D                   { &self.detector }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::mpsc::{self, Receiver};
    use std::time::{Duration, Instant};

    /// Detector that replays a fixed list of candidates.
    #[derive(Default)]
    struct Scripted {
        queue:     VecDeque<Option<HandState>>,
        committed: Vec<HandState>,
    }

    impl HandStateDetector for Scripted {
        fn candidate(&mut self, _sample: &HandLocation) -> Option<HandState> {
            self.queue.pop_front().flatten()
        }
        fn on_state_committed(&mut self, state: HandState) {
            self.committed.push(state);
        }
    }

    fn scripted(cfg: EngineConfig) -> (ZoomPan<Scripted>, Receiver<ZoomPanEvent>) {
        let (tx, rx) = mpsc::channel();
        (ZoomPan::with_detector(cfg, Scripted::default(), tx), rx)
    }

    /// Config whose filter follows the palm exactly.
    fn unfiltered() -> EngineConfig {
        EngineConfig { stable_alpha: 1.0, responsive_alpha: 1.0, ..EngineConfig::default() }
    }

    fn hand(x: f64, y: f64, z: f64) -> HandLocation {
        HandLocation::palm_only(Vec3::new(x, y, z))
    }

    fn push(e: &mut ZoomPan<Scripted>, c: Option<HandState>, n: usize, sample: HandLocation) {
        for _ in 0..n {
            e.detector.queue.push_back(c);
            e.feed(sample);
        }
    }

    fn state_changes(rx: &Receiver<ZoomPanEvent>) -> Vec<HandState> {
        rx.try_iter()
            .filter_map(|e| match e {
                ZoomPanEvent::StateChanged(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    fn collect_for(rx: &Receiver<ZoomPanEvent>, wait: Duration) -> Vec<ZoomPanEvent> {
        let end = Instant::now() + wait;
        let mut out = Vec::new();
        while let Ok(e) = rx.recv_timeout(end.saturating_duration_since(Instant::now())) {
            out.push(e);
        }
        out
    }

    // ── Votes ────────────────────────────────────────────────────────────

    #[test]
    fn votes_decrement_floors_at_zero() {
        let mut v = Votes::default();
        v.cast(HandState::Moving, 10);
        v.cast(HandState::Moving, 10);
        v.cast(HandState::Still, 10);
        assert_eq!(v.get(HandState::Moving), 1);
        assert_eq!(v.get(HandState::Still), 1);
        assert_eq!(v.get(HandState::Adjusting), 0);
    }

    #[test]
    fn votes_win_clears_all() {
        let mut v = Votes::default();
        assert!(!v.cast(HandState::Adjusting, 2));
        assert!(v.cast(HandState::Adjusting, 2));
        assert!(v.is_clear());
    }

    #[test]
    fn interleaved_candidates_slow_each_other_down() {
        let mut v = Votes::default();
        for _ in 0..5 { v.cast(HandState::Moving, 10); }
        for _ in 0..3 { v.cast(HandState::Adjusting, 10); }
        assert_eq!(v.get(HandState::Moving), 2);
        assert_eq!(v.get(HandState::Adjusting), 3);
    }

    // ── Debounce ─────────────────────────────────────────────────────────

    #[test]
    fn starts_invisible() {
        let (e, _rx) = scripted(EngineConfig::default());
        assert_eq!(e.state(), HandState::Invisible);
        assert!(e.reference().is_none());
        assert_eq!(e.base(), Gesture::default());
    }

    #[test]
    fn nine_votes_do_not_commit_tenth_does() {
        let (mut e, rx) = scripted(EngineConfig::default());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 20.0, 0.0));
        assert_eq!(e.state(), HandState::Still);
        assert_eq!(state_changes(&rx), vec![HandState::Still]);

        push(&mut e, Some(HandState::Moving), 9, hand(0.0, 20.0, 0.0));
        assert_eq!(e.state(), HandState::Still);
        assert_eq!(e.votes().get(HandState::Moving), 9);

        push(&mut e, Some(HandState::Moving), 1, hand(0.0, 20.0, 0.0));
        assert_eq!(e.state(), HandState::Moving);
        assert!(e.votes().is_clear());
        assert_eq!(state_changes(&rx), vec![HandState::Moving]);
    }

    #[test]
    fn matching_candidate_does_not_vote() {
        let (mut e, _rx) = scripted(EngineConfig::default());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 20.0, 0.0));
        push(&mut e, Some(HandState::Moving), 4, hand(0.0, 20.0, 0.0));
        push(&mut e, Some(HandState::Still), 3, hand(0.0, 20.0, 0.0));
        push(&mut e, None, 3, hand(0.0, 20.0, 0.0));
        assert_eq!(e.votes().get(HandState::Moving), 4);
    }

    #[test]
    fn detector_is_told_about_commits() {
        let (mut e, _rx) = scripted(EngineConfig::default());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 20.0, 0.0));
        push(&mut e, Some(HandState::Adjusting), 10, hand(0.0, 20.0, 0.0));
        assert_eq!(e.detector().committed, vec![HandState::Still, HandState::Adjusting]);
    }

    // ── Reference & filter ───────────────────────────────────────────────

    #[test]
    fn still_captures_reference_and_stable_alpha() {
        let (mut e, _rx) = scripted(EngineConfig::default());
        push(&mut e, Some(HandState::Still), 10, hand(1.0, 2.0, 3.0));
        assert_eq!(e.reference().map(|r| r.palm), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(e.filter.alpha(), 0.001);
        assert!(e.filter.is_seeded());
    }

    #[test]
    fn adjusting_keeps_reference_and_responsive_alpha() {
        let (mut e, _rx) = scripted(EngineConfig::default());
        push(&mut e, Some(HandState::Still), 10, hand(1.0, 2.0, 3.0));
        push(&mut e, Some(HandState::Adjusting), 10, hand(4.0, 2.0, 3.0));
        assert_eq!(e.reference().map(|r| r.palm), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(e.filter.alpha(), 0.1);
    }

    #[test]
    fn adjusting_from_invisible_has_no_reference() {
        let (mut e, _rx) = scripted(unfiltered());
        push(&mut e, Some(HandState::Adjusting), 10, hand(0.0, 0.0, 0.0));
        push(&mut e, None, 5, hand(0.0, -4.0, 0.0));
        assert!(e.reference().is_none());
        assert_eq!(e.adjusted(), Gesture::default());
    }

    #[test]
    fn moving_clears_reference_and_filter() {
        let (mut e, _rx) = scripted(EngineConfig::default());
        push(&mut e, Some(HandState::Still), 10, hand(1.0, 2.0, 3.0));
        push(&mut e, Some(HandState::Moving), 10, hand(1.0, 2.0, 3.0));
        assert!(e.reference().is_none());
        assert!(!e.filter.is_seeded());
        assert_eq!(e.filter.alpha(), 0.1);
    }

    #[test]
    fn empty_sample_is_not_captured_as_reference() {
        let (mut e, _rx) = scripted(EngineConfig::default());
        push(&mut e, Some(HandState::Still), 9, hand(1.0, 2.0, 3.0));
        push(&mut e, Some(HandState::Still), 1, HandLocation::empty());
        assert_eq!(e.state(), HandState::Still);
        assert!(e.reference().is_none());
        push(&mut e, None, 2, HandLocation::empty());
        assert!(e.reference().is_none());
    }

    #[test]
    fn still_committed_on_empty_frame_captures_next_visible_sample() {
        let (mut e, _rx) = scripted(unfiltered());
        push(&mut e, Some(HandState::Still), 9, hand(1.0, 2.0, 3.0));
        push(&mut e, Some(HandState::Still), 1, HandLocation::empty());

        push(&mut e, None, 1, hand(4.0, 0.0, 0.0));
        assert_eq!(e.reference().map(|r| r.palm), Some(Vec3::new(4.0, 0.0, 0.0)));
        assert!(e.filter.is_seeded());
        assert_eq!(e.adjusted(), Gesture::default());

        push(&mut e, None, 1, hand(5.0, 0.0, 0.0));
        assert!((e.adjusted().offset_x - 10.0).abs() < 1e-12);
    }

    #[test]
    fn adjusting_without_reference_does_not_capture() {
        let (mut e, _rx) = scripted(unfiltered());
        push(&mut e, Some(HandState::Adjusting), 10, HandLocation::empty());
        push(&mut e, None, 3, hand(1.0, 0.0, 0.0));
        assert!(e.reference().is_none());
    }

    // ── Projection ───────────────────────────────────────────────────────

    #[test]
    fn displacement_drives_adjusted_gesture() {
        let (mut e, _rx) = scripted(unfiltered());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 0.0, 0.0));
        push(&mut e, None, 1, hand(1.0, 2.0, 0.5));
        let g = e.adjusted();
        assert!((g.scale - 0.9).abs() < 1e-12);
        assert!((g.offset_x - 10.0).abs() < 1e-12);
        assert!((g.offset_y - 5.0).abs() < 1e-12);
        assert_eq!(e.base(), Gesture::default());
    }

    #[test]
    fn empty_sample_does_not_move_gesture() {
        let (mut e, _rx) = scripted(unfiltered());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 0.0, 0.0));
        push(&mut e, None, 1, hand(0.0, -2.0, 0.0));
        let before = e.adjusted();
        push(&mut e, None, 1, HandLocation::empty());
        assert_eq!(e.adjusted(), before);
    }

    #[test]
    fn stable_alpha_damps_displacement() {
        let (mut e, _rx) = scripted(EngineConfig::default());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 0.0, 0.0));
        push(&mut e, None, 1, hand(0.0, 10.0, 0.0));
        // filtered y = 0.001 * 10 = 0.01 → scale 1 − 0.01 × 0.05
        assert!((e.adjusted().scale - 0.9995).abs() < 1e-12);
    }

    #[test]
    fn freeze_on_exit_keeps_adjusted_scale() {
        let (mut e, _rx) = scripted(unfiltered());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 0.0, 0.0));
        push(&mut e, Some(HandState::Adjusting), 10, hand(0.0, -4.0, 0.0));
        assert_eq!(e.state(), HandState::Adjusting);
        push(&mut e, None, 1, hand(0.0, -4.0, 0.0));
        assert!((e.adjusted().scale - 1.2).abs() < 1e-12);

        push(&mut e, Some(HandState::Moving), 10, hand(0.0, -4.0, 0.0));
        assert_eq!(e.state(), HandState::Moving);
        assert!((e.base().scale - 1.2).abs() < 1e-12);
    }

    #[test]
    fn next_gesture_starts_from_frozen_base() {
        let (mut e, _rx) = scripted(unfiltered());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 0.0, 0.0));
        push(&mut e, None, 1, hand(2.0, 0.0, 0.0));
        push(&mut e, Some(HandState::Invisible), 10, HandLocation::empty());
        assert!((e.base().offset_x - 20.0).abs() < 1e-12);

        // New reference 50 cm away; offset continues from 20, not from 0.
        push(&mut e, Some(HandState::Still), 10, hand(50.0, 0.0, 0.0));
        push(&mut e, None, 1, hand(51.0, 0.0, 0.0));
        assert!((e.adjusted().offset_x - 30.0).abs() < 1e-12);
    }

    // ── Zoom curve ───────────────────────────────────────────────────────

    #[test]
    fn zoom_curve_passes_zoom_out_through() {
        assert_eq!(zoom_curve(0.8, 1.5), 0.8);
    }

    #[test]
    fn zoom_curve_stretches_zoom_in() {
        assert!((zoom_curve(1.2, 1.5) - 1.314534).abs() < 1e-6);
        assert_eq!(zoom_curve(1.0, 1.5), 1.0);
    }

    // ── Throttled channels ───────────────────────────────────────────────

    #[test]
    fn projection_emits_all_three_channels() {
        let (mut e, rx) = scripted(unfiltered());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 0.0, 0.0));
        push(&mut e, None, 1, hand(1.0, 2.0, 0.5));

        let events = collect_for(&rx, Duration::from_millis(300));
        assert!(events.contains(&ZoomPanEvent::StateChanged(HandState::Still)));
        assert!(events.iter().any(|ev| matches!(ev,
            ZoomPanEvent::ScaleChanged(s) if (s - 0.9).abs() < 1e-12)));
        assert!(events.iter().any(|ev| matches!(ev,
            ZoomPanEvent::OffsetChanged { x, y }
                if (x - 10.0).abs() < 1e-12 && (y - 5.0).abs() < 1e-12)));
        assert!(events.iter().any(|ev| matches!(ev,
            ZoomPanEvent::CursorMoved { dx, dy, dz }
                if (dx - 1.0).abs() < 1e-12 && (dy - 2.0).abs() < 1e-12 && (dz - 0.5).abs() < 1e-12)));
    }

    #[test]
    fn offset_burst_is_coalesced() {
        let (mut e, rx) = scripted(unfiltered());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 0.0, 0.0));
        let _ = collect_for(&rx, Duration::from_millis(50));

        for i in 1..=10 {
            push(&mut e, None, 1, hand(i as f64, 0.0, 0.0));
            std::thread::sleep(Duration::from_millis(5));
        }
        let offsets: Vec<f64> = collect_for(&rx, Duration::from_millis(450))
            .into_iter()
            .filter_map(|ev| match ev {
                ZoomPanEvent::OffsetChanged { x, .. } => Some(x),
                _ => None,
            })
            .collect();
        assert_eq!(offsets.len(), 2);
        assert!((offsets[0] - 10.0).abs() < 1e-9);
        assert!((offsets[1] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_in_is_remapped_on_delivery() {
        let (mut e, rx) = scripted(unfiltered());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 0.0, 0.0));
        push(&mut e, None, 1, hand(0.0, -4.0, 0.0));
        let scales: Vec<f64> = collect_for(&rx, Duration::from_millis(300))
            .into_iter()
            .filter_map(|ev| match ev {
                ZoomPanEvent::ScaleChanged(s) => Some(s),
                _ => None,
            })
            .collect();
        assert_eq!(scales.len(), 1);
        assert!((scales[0] - 1.2f64.powf(1.5)).abs() < 1e-9);
    }

    #[test]
    fn trailing_scale_suppressed_after_moving() {
        let (mut e, rx) = scripted(unfiltered());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 0.0, 0.0));
        push(&mut e, None, 1, hand(0.0, 1.0, 0.0));
        std::thread::sleep(Duration::from_millis(50));
        // Lands inside the window and is held back...
        push(&mut e, None, 1, hand(0.0, 2.0, 0.0));
        // ...then the hand starts moving before the window closes.
        push(&mut e, Some(HandState::Moving), 10, hand(0.0, 2.0, 0.0));

        let scales: Vec<f64> = collect_for(&rx, Duration::from_millis(400))
            .into_iter()
            .filter_map(|ev| match ev {
                ZoomPanEvent::ScaleChanged(s) => Some(s),
                _ => None,
            })
            .collect();
        assert_eq!(scales.len(), 1);
        assert!((scales[0] - 0.95).abs() < 1e-12);
    }

    fn cursor_dx(events: &[ZoomPanEvent]) -> Vec<f64> {
        events.iter()
            .filter_map(|ev| match ev {
                ZoomPanEvent::CursorMoved { dx, .. } => Some(*dx),
                _ => None,
            })
            .collect()
    }

    fn offset_x(events: &[ZoomPanEvent]) -> Vec<f64> {
        events.iter()
            .filter_map(|ev| match ev {
                ZoomPanEvent::OffsetChanged { x, .. } => Some(*x),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn trailing_cursor_still_delivered_while_moving() {
        let (mut e, rx) = scripted(unfiltered());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 0.0, 0.0));
        push(&mut e, None, 1, hand(1.0, 0.0, 0.0));
        std::thread::sleep(Duration::from_millis(10));
        // Held by both the cursor and the offset windows.
        push(&mut e, None, 1, hand(2.0, 0.0, 0.0));
        push(&mut e, Some(HandState::Moving), 10, hand(2.0, 0.0, 0.0));
        assert_eq!(e.state(), HandState::Moving);

        let events = collect_for(&rx, Duration::from_millis(400));
        let cursor = cursor_dx(&events);
        assert_eq!(cursor.len(), 2);
        assert!((cursor[0] - 1.0).abs() < 1e-12);
        assert!((cursor[1] - 2.0).abs() < 1e-12);

        let offsets = offset_x(&events);
        assert_eq!(offsets.len(), 1);
        assert!((offsets[0] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn trailing_cursor_suppressed_after_invisible() {
        let (mut e, rx) = scripted(unfiltered());
        push(&mut e, Some(HandState::Still), 10, hand(0.0, 0.0, 0.0));
        push(&mut e, None, 1, hand(1.0, 0.0, 0.0));
        std::thread::sleep(Duration::from_millis(10));
        push(&mut e, None, 1, hand(2.0, 0.0, 0.0));
        push(&mut e, Some(HandState::Invisible), 10, HandLocation::empty());
        assert_eq!(e.state(), HandState::Invisible);

        let events = collect_for(&rx, Duration::from_millis(400));
        let cursor = cursor_dx(&events);
        assert_eq!(cursor.len(), 1);
        assert!((cursor[0] - 1.0).abs() < 1e-12);
        assert_eq!(offset_x(&events).len(), 1);
    }
}
