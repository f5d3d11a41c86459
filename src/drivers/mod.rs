//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod button;
pub mod gauge;
pub mod hw_init;
pub mod servo;
