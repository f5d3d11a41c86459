//! Signal processing between measurement and actuation.

pub mod mapping;
