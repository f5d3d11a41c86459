//! Hall-effect rotation counter.
//!
//! The sensor produces one falling edge per shaft rotation.  The GPIO ISR
//! calls [`hall_isr_handler`], which bumps two counters:
//!
//! - the **window** counter, drained by the rate estimator once per
//!   sampling window;
//! - the **lifetime** counter, never reset from either side, read by the
//!   usage accumulator as a wrapping snapshot.
//!
//! Each counter is a single `AtomicU32`.  The ISR only ever performs
//! `fetch_add`, so a concurrent main-loop read can never observe a torn
//! value and a drain (`swap(0)`) can never lose an increment.  Anything
//! multi-step (persistence in particular) lives in the main loop.

use core::sync::atomic::{AtomicU32, Ordering};

/// Lock-free single-producer / single-consumer rotation counter.
#[derive(Debug)]
pub struct RotationCounter {
    window: AtomicU32,
    lifetime: AtomicU32,
}

impl RotationCounter {
    pub const fn new() -> Self {
        Self {
            window: AtomicU32::new(0),
            lifetime: AtomicU32::new(0),
        }
    }

    /// Record one rotation.  ISR-safe: two atomic increments, no locks,
    /// no allocation, no blocking.
    #[inline]
    pub fn on_event(&self) {
        self.window.fetch_add(1, Ordering::Release);
        self.lifetime.fetch_add(1, Ordering::Release);
    }

    /// Rotations since the last drain, without resetting.
    #[inline]
    pub fn window_count(&self) -> u32 {
        self.window.load(Ordering::Acquire)
    }

    /// Atomically read and zero the window counter.  Main context only.
    pub fn drain_window_count(&self) -> u32 {
        self.window.swap(0, Ordering::AcqRel)
    }

    /// Rotations since boot, wrapping at `u32::MAX`.  Consumers diff
    /// successive snapshots with `wrapping_sub`.
    #[inline]
    pub fn lifetime_count(&self) -> u32 {
        self.lifetime.load(Ordering::Acquire)
    }
}

impl Default for RotationCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter fed by the hall-sensor ISR.
/// `static` because ISR callbacks in ESP-IDF cannot capture closures.
pub static HALL_COUNTER: RotationCounter = RotationCounter::new();

/// Called from the GPIO ISR on each falling edge.
pub fn hall_isr_handler() {
    HALL_COUNTER.on_event();
}
