//! Application core: control-loop orchestration, zero direct I/O.
//!
//! All interaction with hardware happens through the **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod cycle;
pub mod ports;
pub mod telemetry;
