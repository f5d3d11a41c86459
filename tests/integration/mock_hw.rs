//! Mock adapters for integration tests.
//!
//! Records every gauge write, display refresh and store write so tests
//! can assert on the full command history without touching real
//! GPIO/PWM/NVS.

use std::cell::Cell;
use std::collections::HashMap;

use motorgauge::app::ports::{
    Clock, CounterStore, DisplayPort, GaugeDriver, GaugeId, StorageError, TemperaturePort,
};
use motorgauge::app::telemetry::Telemetry;
use motorgauge::sensors::rotation::RotationCounter;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub writes: Vec<(GaugeId, i32)>,
    pub celsius: i32,
    pub temperature_reads: u32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(celsius: i32) -> Self {
        Self {
            writes: Vec::new(),
            celsius,
            temperature_reads: 0,
        }
    }

    pub fn last_angle(&self, id: GaugeId) -> Option<i32> {
        self.writes
            .iter()
            .rev()
            .find(|(g, _)| *g == id)
            .map(|(_, deg)| *deg)
    }

    pub fn writes_for(&self, id: GaugeId) -> usize {
        self.writes.iter().filter(|(g, _)| *g == id).count()
    }
}

impl GaugeDriver for MockHardware {
    fn write_angle(&mut self, id: GaugeId, degrees: i32) {
        self.writes.push((id, degrees));
    }
}

impl TemperaturePort for MockHardware {
    fn read_celsius(&mut self) -> i32 {
        self.temperature_reads += 1;
        self.celsius
    }
}

// ── MockDisplay ───────────────────────────────────────────────

/// Records presented telemetry.  Optionally plays the hall sensor: each
/// refresh fires one rotation on `counter` until `events_left` runs out.
pub struct MockDisplay<'a> {
    pub shown: Vec<Telemetry>,
    pub counter: Option<&'a RotationCounter>,
    pub events_left: u32,
}

#[allow(dead_code)]
impl<'a> MockDisplay<'a> {
    pub fn new() -> Self {
        Self {
            shown: Vec::new(),
            counter: None,
            events_left: 0,
        }
    }

    pub fn firing(counter: &'a RotationCounter, events: u32) -> Self {
        Self {
            shown: Vec::new(),
            counter: Some(counter),
            events_left: events,
        }
    }

    pub fn last(&self) -> Option<&Telemetry> {
        self.shown.last()
    }
}

impl DisplayPort for MockDisplay<'_> {
    fn present(&mut self, telemetry: &Telemetry) {
        self.shown.push(*telemetry);
        if let Some(counter) = self.counter {
            if self.events_left > 0 {
                self.events_left -= 1;
                counter.on_event();
            }
        }
    }
}

// ── MockStore ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockStore {
    pub data: HashMap<String, u64>,
    pub writes: Vec<(String, u64)>,
    pub fail: bool,
}

#[allow(dead_code)]
impl MockStore {
    pub fn with(entries: &[(&str, u64)]) -> Self {
        Self {
            data: entries.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect(),
            ..Self::default()
        }
    }

    pub fn writes_to(&self, key: &str) -> usize {
        self.writes.iter().filter(|(k, _)| k == key).count()
    }
}

impl CounterStore for MockStore {
    fn get_int(&self, key: &str, default: u64) -> u64 {
        self.data.get(key).copied().unwrap_or(default)
    }

    fn put_int(&mut self, key: &str, value: u64) -> Result<(), StorageError> {
        if self.fail {
            return Err(StorageError::Io(-1));
        }
        self.data.insert(key.to_owned(), value);
        self.writes.push((key.to_owned(), value));
        Ok(())
    }
}

// ── SteppingClock ─────────────────────────────────────────────

/// Clock that advances by a fixed step on every read, standing in for
/// the wall time a busy-poll iteration takes.
pub struct SteppingClock {
    now: Cell<u64>,
    step_us: u64,
}

#[allow(dead_code)]
impl SteppingClock {
    pub fn new(step_us: u64) -> Self {
        Self {
            now: Cell::new(0),
            step_us,
        }
    }

    pub fn peek(&self) -> u64 {
        self.now.get()
    }
}

impl Clock for SteppingClock {
    fn now_us(&self) -> u64 {
        let t = self.now.get();
        self.now.set(t + self.step_us);
        t
    }
}
