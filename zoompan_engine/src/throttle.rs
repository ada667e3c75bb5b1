//! Rate-limited delivery on a worker thread.
//!
//! A [`Throttle`] forwards payloads to a delivery closure at most once per
//! interval.  A payload arriving after the interval has fully elapsed is
//! delivered straight away; payloads arriving sooner overwrite a single
//! pending slot, which is delivered when the interval runs out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{error, trace, warn};

// ════════════════════════════════════════════════════════════════════════════
// Throttle — handle
// ════════════════════════════════════════════════════════════════════════════

/// Handle to a throttled output channel.
///
/// Dropping the handle stops the worker once any pending payload has been
/// delivered.
pub struct Throttle<T: Send + 'static> {
    name: String,
    tx:   Sender<T>,
    /// Set once the worker is found gone; payloads are dropped from then on.
    lost: AtomicBool,
}

impl<T: Send + 'static> Throttle<T> {
    /// Spawn the worker thread.  `deliver` runs on that thread.
    pub fn spawn<F>(name: &str, interval: Duration, deliver: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<T>();
        let label = name.to_string();
        let builder = thread::Builder::new().name(format!("throttle-{}", name));
        let spawned = builder.spawn(move || throttle_thread(&label, interval, rx, deliver));
        if let Err(e) = spawned {
            error!(channel = name, "failed to spawn throttle worker: {}", e);
        }
        Throttle { name: name.to_string(), tx, lost: AtomicBool::new(false) }
    }

    /// Offer a payload.  Never blocks.
    ///
    /// If the worker is not running the payload is dropped; this is logged
    /// the first time it happens.
    pub fn invoke(&self, payload: T) {
        if self.tx.send(payload).is_err() && !self.lost.swap(true, Ordering::Relaxed) {
            warn!(channel = %self.name, "throttle worker is gone, dropping output");
        }
    }

    /// Whether a payload has been dropped because the worker is gone.
    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::Relaxed)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// throttle_thread — the actual loop
// ════════════════════════════════════════════════════════════════════════════

fn throttle_thread<T, F>(name: &str, interval: Duration, rx: Receiver<T>, mut deliver: F)
where
    F: FnMut(T),
{
    let mut last_fire: Option<Instant> = None;
    let mut pending: Option<T> = None;

    loop {
        match pending.take() {
            // ── idle: wait for the next payload ───────────────────────────
            None => {
                let payload = match rx.recv() {
                    Ok(p)  => p,
                    Err(_) => return,
                };
                let now = Instant::now();
                match last_fire {
                    Some(t) if now.duration_since(t) < interval => {
                        pending = Some(payload);
                    }
                    _ => {
                        trace!(channel = name, "leading delivery");
                        deliver(payload);
                        last_fire = Some(now);
                    }
                }
            }

            // ── holding a payload: coalesce until the window closes ───────
            Some(held) => {
                let deadline = last_fire.map_or_else(Instant::now, |t| t + interval);
                let wait = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(newer) => pending = Some(newer),
                    Err(RecvTimeoutError::Timeout) => {
                        trace!(channel = name, "trailing delivery");
                        deliver(held);
                        last_fire = Some(Instant::now());
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        thread::sleep(deadline.saturating_duration_since(Instant::now()));
                        deliver(held);
                        return;
                    }
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
