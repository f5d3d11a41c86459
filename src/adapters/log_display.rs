//! Log-based display adapter.
//!
//! Implements [`DisplayPort`] by writing the two gauge-panel text lines to
//! the ESP-IDF logger (which goes to UART in production).  The control
//! cycle calls `present` on every poll of the sampling window, so output
//! is rate-limited: a line is logged only when the telemetry changed and
//! the refresh interval has passed.  A panel driver would implement the
//! same trait using [`format_lines`].

use core::fmt::Write;

use heapless::String;
use log::info;

use crate::app::ports::{Clock, DisplayPort};
use crate::app::telemetry::Telemetry;

/// Characters per display line.
pub const LINE_CAPACITY: usize = 32;

pub type DisplayLine = String<LINE_CAPACITY>;

/// Panel layout: line 1 the rate, line 2 lifetime rotations and
/// temperature.  Text that does not fit is cut at the line capacity.
pub fn format_lines(t: &Telemetry) -> (DisplayLine, DisplayLine) {
    let mut rate = DisplayLine::new();
    let mut detail = DisplayLine::new();
    // A full line is the only possible error; the text is simply cut.
    let _ = write!(rate, "{}", t.rate);
    let _ = write!(detail, "{} {}", t.lifetime_rotations, t.temperature_c);
    (rate, detail)
}

/// Adapter that logs telemetry changes to the serial console.
pub struct LogDisplay<C: Clock> {
    clock: C,
    refresh_us: u64,
    last_shown: Option<Telemetry>,
    last_log_us: u64,
    presented: u64,
}

impl<C: Clock> LogDisplay<C> {
    pub fn new(clock: C, refresh_ms: u32) -> Self {
        Self {
            clock,
            refresh_us: u64::from(refresh_ms) * 1_000,
            last_shown: None,
            last_log_us: 0,
            presented: 0,
        }
    }

    /// Telemetry most recently written to the log.
    pub fn last_shown(&self) -> Option<Telemetry> {
        self.last_shown
    }

    /// Number of `present` calls, logged or not.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl<C: Clock> DisplayPort for LogDisplay<C> {
    fn present(&mut self, telemetry: &Telemetry) {
        self.presented += 1;
        if self.last_shown.as_ref() == Some(telemetry) {
            return;
        }
        let now = self.clock.now_us();
        if self.last_shown.is_some() && now.saturating_sub(self.last_log_us) < self.refresh_us {
            return;
        }
        let (line1, line2) = format_lines(telemetry);
        info!(
            "PANEL | {} | {} | active={}ms",
            line1, line2, telemetry.lifetime_active_ms
        );
        self.last_shown = Some(*telemetry);
        self.last_log_us = now;
    }
}
