//! Rotation-rate estimation over a bounded sampling window.
//!
//! A window opens, the main loop busy-polls the [`RotationCounter`] until
//! either enough rotations have arrived or the deadline passes, and the
//! drained count is converted to a rate.  A deadline close is not an
//! error: it is the normal outcome when the shaft turns slowly, and
//! yields a lower-confidence estimate flagged with `timed_out`.

use core::time::Duration;

use log::{debug, trace};

use crate::app::ports::Clock;
use crate::config::SECONDS_PER_MINUTE;
use crate::sensors::rotation::RotationCounter;

const MICROS_PER_SEC: f64 = 1_000_000.0;
/// Windows shorter than this report the sentinel rate 0.
pub const MIN_ELAPSED_US: u64 = 1_000;

/// The bounded interval one rate estimate is taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingWindow {
    start_us: u64,
    deadline: Duration,
    required: u32,
}

impl SamplingWindow {
    pub fn open(start_us: u64, deadline: Duration, required: u32) -> Self {
        Self {
            start_us,
            deadline,
            required,
        }
    }

    pub fn elapsed_us(&self, now_us: u64) -> u64 {
        now_us.saturating_sub(self.start_us)
    }

    /// True once strictly more than `deadline` has passed.
    pub fn is_expired(&self, now_us: u64) -> bool {
        u128::from(self.elapsed_us(now_us)) > self.deadline.as_micros()
    }

    pub fn is_satisfied(&self, count: u32) -> bool {
        count >= self.required
    }
}

/// Outcome of one sampling window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    /// Events per rate unit (per minute by default).
    pub rate: f64,
    pub elapsed_secs: f64,
    pub window_count: u32,
    /// The deadline closed the window before `required` events arrived.
    pub timed_out: bool,
}

impl RateSample {
    /// Rate truncated toward zero, the form used for mapping and display.
    pub fn whole_rate(&self) -> i64 {
        self.rate as i64
    }
}

/// Converts a window's event count and duration into a rate.
#[derive(Debug, Clone, Copy)]
pub struct RateEstimator {
    /// Seconds per reported unit (60 → events per minute).
    scale: f64,
}

impl RateEstimator {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    pub fn per_minute() -> Self {
        Self::new(SECONDS_PER_MINUTE)
    }

    /// Run one sampling window.
    ///
    /// Counts left over from before the window opened are discarded.
    /// `idle` is invoked on every poll that does not close the window;
    /// the control loop uses it to keep the display refreshed.
    pub fn measure<C: Clock + ?Sized>(
        &self,
        counter: &RotationCounter,
        clock: &C,
        required: u32,
        timeout: Duration,
        mut idle: impl FnMut(),
    ) -> RateSample {
        let stale = counter.drain_window_count();
        if stale > 0 {
            trace!("rate: discarded {} stale rotations", stale);
        }

        let window = SamplingWindow::open(clock.now_us(), timeout, required);
        let timed_out = loop {
            let now = clock.now_us();
            if window.is_satisfied(counter.window_count()) {
                break false;
            }
            if window.is_expired(now) {
                break true;
            }
            idle();
        };

        let elapsed_us = window.elapsed_us(clock.now_us());
        let window_count = counter.drain_window_count();
        let elapsed_secs = elapsed_us as f64 / MICROS_PER_SEC;
        let rate = if elapsed_us < MIN_ELAPSED_US {
            0.0
        } else {
            f64::from(window_count) / elapsed_secs * self.scale
        };

        if timed_out {
            debug!(
                "rate: window timed out after {:.3}s with {}/{} events, rate={:.1}",
                elapsed_secs, window_count, required, rate
            );
        }

        RateSample {
            rate,
            elapsed_secs,
            window_count,
            timed_out,
        }
    }
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::per_minute()
    }
}
