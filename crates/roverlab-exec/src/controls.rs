//! Shared run-control state: pause/resume and cooperative stop.
//!
//! The controls are wrapped in [`std::sync::Arc`] and shared between
//! the executor task and whatever drives it (UI handlers, the headless
//! engine, tests). Flags are atomics so checks on the instruction hot
//! path take no locks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

/// Pause/resume and stop state for one executor.
#[derive(Debug, Default)]
pub struct RunControls {
    /// Whether execution is currently paused.
    paused: AtomicBool,
    /// Wakes the executor when resumed (or stopped while paused).
    resume_notify: Notify,
    /// Whether a stop has been requested.
    stop_requested: AtomicBool,
    /// Interrupts in-flight pacing sleeps on stop.
    stop_notify: Notify,
}

impl RunControls {
    /// Fresh controls: not paused, no stop pending.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Whether execution is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause execution. Takes effect at the next instruction boundary;
    /// the in-flight instruction finishes first.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume execution and wake the executor.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until no longer paused. Returns immediately when not
    /// paused, and also when a stop is requested (the stop wins).
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_stop_requested() {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a cooperative stop. The executor halts at the next
    /// instruction boundary and in-flight pacing sleeps are cut short.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.stop_notify.notify_waiters();
        // A paused executor must wake to observe the stop.
        self.resume_notify.notify_one();
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Clear a pending stop ahead of a new run. A pause set before the
    /// run is preserved, so a program can be started paused.
    pub fn clear_stop(&self) {
        self.stop_requested.store(false, Ordering::Release);
    }

    /// Clear both flags (used on reset).
    pub fn clear(&self) {
        self.paused.store(false, Ordering::Release);
        self.stop_requested.store(false, Ordering::Release);
    }

    /// Sleep for `duration`, waking early on stop. Returns `false` if
    /// the sleep was cut short.
    pub async fn pacing_sleep(&self, duration: Duration) -> bool {
        let stopped = self.stop_notify.notified();
        tokio::pin!(stopped);
        // Register interest before the flag check so a stop landing in
        // between still wakes the select below.
        stopped.as_mut().enable();
        if self.is_stop_requested() {
            return false;
        }
        tokio::select! {
            () = tokio::time::sleep(duration) => true,
            () = stopped => false,
        }
    }
}
