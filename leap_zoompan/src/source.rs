//! Hand sample sources — LeapMotion hardware or a scripted simulation.
//!
//! The public interface is [`SourceEvent`] delivered over a `mpsc` channel.
//! The run loop doesn't need to know whether samples came from real hardware
//! or the simulator.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};
use zoompan_engine::{HandLocation, Vec3};

use crate::viewport::ViewCommand;

// ════════════════════════════════════════════════════════════════════════════
// SourceEvent
// ════════════════════════════════════════════════════════════════════════════

/// What a source delivers to the run loop.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    /// One tracking frame (possibly empty).
    Sample(HandLocation),
    /// A discrete view adjustment.
    Command(ViewCommand),
    /// The source is finished.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// SampleSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`SourceEvent`]s over a channel.
pub trait SampleSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>);
}

/// Spawn a sample source on its own thread and return the receiving end.
pub fn spawn_sample_source<S: SampleSource>(source: S) -> Receiver<SourceEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// Frame conversion
// ════════════════════════════════════════════════════════════════════════════

/// Build a sample from sensor points given in millimetres.
///
/// Palms at or beyond `max_distance_cm` from the sensor origin count as
/// "no hand".
pub fn sample_from_points(
    palm_mm:   Vec3,
    thumb_mm:  Vec3,
    index_mm:  Vec3,
    middle_mm: Vec3,
    max_distance_cm: f64,
) -> HandLocation {
    let palm = palm_mm / 10.0;
    if palm.norm() >= max_distance_cm {
        return HandLocation::empty();
    }
    HandLocation::new(palm, thumb_mm / 10.0, index_mm / 10.0, middle_mm / 10.0)
}

// ════════════════════════════════════════════════════════════════════════════
// LeapSampleSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Sample source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Only the left hand is tracked; every tracking frame without one yields an
/// empty sample so the engine can see the hand leave.
#[cfg(feature = "leap")]
pub struct LeapSampleSource {
    pub max_distance_cm: f64,
}

#[cfg(feature = "leap")]
impl SampleSource for LeapSampleSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        use leaprs::*;
        use tracing::{error, trace};

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                error!("failed to create LeapC connection: {:?}", e);
                let _ = tx.send(SourceEvent::Quit);
                return;
            }
        };
        if let Err(e) = connection.open() {
            error!("failed to open LeapMotion device: {:?}", e);
            let _ = tx.send(SourceEvent::Quit);
            return;
        }
        info!("LeapC connection open");

        let v3 = |x: f32, y: f32, z: f32| Vec3::new(x as f64, y as f64, z as f64);

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(e) => {
                    trace!("LeapC poll returned no message: {:?}", e);
                    continue;
                }
            };

            if let Event::Tracking(frame) = msg.event() {
                let hands: Vec<_> = frame.hands().collect();
                let left = hands.iter().find(|h| h.hand_type() == HandType::Left);

                let sample = match left {
                    Some(hand) => {
                        let p = hand.palm().position();
                        let palm = v3(p.x, p.y, p.z);
                        let digits: Vec<_> = hand.digits().collect();
                        let tips: Vec<Vec3> = digits.iter()
                            .map(|d| {
                                let t = d.distal().next_joint();
                                v3(t.x, t.y, t.z)
                            })
                            .collect();
                        let tip = |i: usize| tips.get(i).copied().unwrap_or(palm);
                        sample_from_points(palm, tip(0), tip(1), tip(2), self.max_distance_cm)
                    }
                    None => HandLocation::empty(),
                };

                if tx.send(SourceEvent::Sample(sample)).is_err() {
                    return;
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimSampleSource — scripted hand session (always available)
// ════════════════════════════════════════════════════════════════════════════

/// One step of a scripted session.
#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    /// No hand in view.
    Absent { frames: usize },
    /// Hand held near `at`, with a slight tremor.
    Hold { at: Vec3, frames: usize },
    /// Hand travelling in a straight line.
    Glide { from: Vec3, to: Vec3, frames: usize },
    /// Issue a view command between frames.
    Command(ViewCommand),
}

/// Peak tremor displacement while holding (cm).
const TREMOR_AMPLITUDE: f64 = 0.03;
/// Tremor period in frames.
const TREMOR_PERIOD: f64 = 120.0;

fn tremor(frame: usize) -> Vec3 {
    let phase = frame as f64 / TREMOR_PERIOD * std::f64::consts::TAU;
    Vec3::new(TREMOR_AMPLITUDE * phase.sin(), 0.0, TREMOR_AMPLITUDE * 0.5 * phase.cos())
}

/// Fingertips sit at a fixed offset from the palm.
fn hand_at(palm: Vec3) -> HandLocation {
    HandLocation::new(
        palm,
        palm + Vec3::new(4.0, 2.0, 0.0),
        palm + Vec3::new(1.5, 8.0, 0.0),
        palm + Vec3::new(-0.5, 8.5, 0.0),
    )
}

/// Replays a list of [`Phase`]s at a fixed frame interval.
pub struct SimSampleSource {
    pub script:         Vec<Phase>,
    pub frame_interval: Duration,
}

impl SimSampleSource {
    pub fn new(script: Vec<Phase>, frame_interval: Duration) -> Self {
        SimSampleSource { script, frame_interval }
    }

    /// A short session: hand appears, zooms in, pans right, swipes away,
    /// then two keyboard-style corrections.
    pub fn demo(frame_interval: Duration) -> Self {
        let rest  = Vec3::new(0.0, 20.0, 0.0);
        let near  = Vec3::new(0.0, 17.0, 0.0);
        let right = Vec3::new(4.0, 17.0, 0.0);
        let away  = Vec3::new(20.0, 25.0, 5.0);
        SimSampleSource::new(vec![
            Phase::Absent { frames: 50 },
            Phase::Hold   { at: rest, frames: 150 },
            Phase::Glide  { from: rest, to: near, frames: 500 },
            Phase::Hold   { at: near, frames: 150 },
            Phase::Glide  { from: near, to: right, frames: 600 },
            Phase::Hold   { at: right, frames: 100 },
            Phase::Glide  { from: right, to: away, frames: 40 },
            Phase::Absent { frames: 60 },
            Phase::Command(ViewCommand::ZoomOut),
            Phase::Command(ViewCommand::PanLeft),
        ], frame_interval)
    }

    /// Expand the script into the exact event sequence it produces.
    pub fn events(&self) -> Vec<SourceEvent> {
        let mut out = Vec::new();
        let mut frame = 0usize;
        for phase in &self.script {
            match *phase {
                Phase::Absent { frames } => {
                    for _ in 0..frames {
                        out.push(SourceEvent::Sample(HandLocation::empty()));
                        frame += 1;
                    }
                }
                Phase::Hold { at, frames } => {
                    for _ in 0..frames {
                        out.push(SourceEvent::Sample(hand_at(at + tremor(frame))));
                        frame += 1;
                    }
                }
                Phase::Glide { from, to, frames } => {
                    let steps = frames.max(1) as f64;
                    for i in 1..=frames {
                        let p = from + (to - from) * (i as f64 / steps);
                        out.push(SourceEvent::Sample(hand_at(p)));
                        frame += 1;
                    }
                }
                Phase::Command(cmd) => out.push(SourceEvent::Command(cmd)),
            }
        }
        out
    }
}

impl SampleSource for SimSampleSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        let events = self.events();
        info!(frames = events.len(), "simulated session started");
        for event in events {
            let is_sample = matches!(event, SourceEvent::Sample(_));
            if tx.send(event).is_err() {
                debug!("run loop hung up, stopping simulation");
                return;
            }
            if is_sample && !self.frame_interval.is_zero() {
                thread::sleep(self.frame_interval);
            }
        }
        let _ = tx.send(SourceEvent::Quit);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
