//! Sensor subsystem.
//!
//! - [`rotation`]: ISR-fed hall-effect rotation counter
//! - [`rate`]: bounded-window rotation-rate estimator
//! - [`temperature`]: averaged NTC thermistor reading

pub mod rate;
pub mod rotation;
pub mod temperature;
