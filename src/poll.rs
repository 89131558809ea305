//! Polling lifecycle manager.
//!
//! At most one active timer ever: starting while already polling stops the
//! previous timer first. Ticks fire on a fixed wall-clock interval; the tick
//! callback is expected to spawn its own work so a slow request never blocks
//! the next tick.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default refresh cadence for the joining party's view.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Owns the single poll timer handle.
pub struct Poller {
    interval: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            handle: Mutex::new(None),
        }
    }

    /// Start the timer, replacing any previous one (idempotent start).
    /// `tick` runs once per interval, first firing one interval from now.
    pub fn start(&self, tick: impl Fn() + Send + 'static) {
        let mut guard = self.handle.lock();
        if let Some(previous) = guard.take() {
            previous.abort();
        }

        let interval = self.interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval() fires immediately; consume that so the first real
            // tick lands one full interval after activation
            ticker.tick().await;
            loop {
                ticker.tick().await;
                tick();
            }
        });
        *guard = Some(handle);
        log::info!("Polling started ({}ms interval)", interval.as_millis());
    }

    /// Stop the timer synchronously. Work already spawned by a past tick is
    /// not cancelled; only future ticks are.
    pub fn stop(&self) {
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
            log::info!("Polling stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
    }
}
