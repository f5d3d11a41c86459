//! Port traits: the hexagonal boundary between the control core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlCycle (domain)
//! ```
//!
//! Driven adapters (thermistor, servos, display, NVS, timer) implement
//! these traits.  The [`ControlCycle`](super::cycle::ControlCycle) takes
//! them as generic parameters at call sites, so the core never touches
//! hardware directly and every collaborator can be mocked on the host.

use super::telemetry::Telemetry;

pub use crate::error::StorageError;

// ───────────────────────────────────────────────────────────────
// Gauge identity
// ───────────────────────────────────────────────────────────────

/// Which physical needle a command is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GaugeId {
    Speed,
    Temperature,
}

// ───────────────────────────────────────────────────────────────
// Temperature source (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Linearised, averaged temperature reading.
///
/// May block briefly while averaging.  There is no failure path: an
/// implementation always returns a value.
pub trait TemperaturePort {
    fn read_celsius(&mut self) -> i32;
}

// ───────────────────────────────────────────────────────────────
// Gauge driver (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget servo angle output.
///
/// Callers only ever pass angles that a
/// [`ClampedGauge`](crate::drivers::gauge::ClampedGauge) has already
/// range-checked.
pub trait GaugeDriver {
    fn write_angle(&mut self, id: GaugeId, degrees: i32);
}

// ───────────────────────────────────────────────────────────────
// Display presenter (driven adapter: domain → UI)
// ───────────────────────────────────────────────────────────────

/// Shows the current telemetry values.
///
/// Called once per control cycle and on every poll of the sampling
/// window, so implementations must be cheap at high call rates.
pub trait DisplayPort {
    fn present(&mut self, telemetry: &Telemetry);
}

// ───────────────────────────────────────────────────────────────
// Counter storage (driven adapter: domain ↔ NVS)
// ───────────────────────────────────────────────────────────────

/// Persistent integer key-value storage, scoped to this application's
/// namespace.
///
/// Writes MUST be atomic per key: after a power loss the key holds either
/// the previous or the new value, never a mix.  ESP-IDF NVS guarantees this
/// per `nvs_commit()`.
pub trait CounterStore {
    /// Read `key`, or `default` if it has never been written.
    fn get_int(&self, key: &str, default: u64) -> u64;

    /// Write `key` atomically.
    fn put_int(&mut self, key: &str, value: u64) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Monotonic clock
// ───────────────────────────────────────────────────────────────

pub trait Clock {
    /// Microseconds since boot.  Never goes backwards.
    fn now_us(&self) -> u64;
}
