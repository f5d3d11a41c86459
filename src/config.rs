//! System configuration parameters
//!
//! All tunable parameters for the motor gauge. Values are compile-time
//! defaults; the only state persisted across power cycles is the pair of
//! lifetime usage counters (see [`crate::usage`]).

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Rotations that close a sampling window early.
pub const DEFAULT_SAMPLE_SIZE: u32 = 8;
/// Sampling window deadline.
pub const DEFAULT_SAMPLE_TIMEOUT_US: u64 = 2_000_000;
/// Rate scale for events per minute.
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// NTC thermistor wiring and averaging.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThermistorConfig {
    /// Fixed divider resistor (ohms).
    pub reference_ohms: f32,
    /// Thermistor resistance at `nominal_celsius` (ohms).
    pub nominal_ohms: f32,
    pub nominal_celsius: f32,
    /// B-parameter (kelvin).
    pub beta: f32,
    /// Full-scale ADC count.
    pub adc_max: u16,
    /// ADC reference voltage (millivolts).
    pub vref_mv: u16,
    /// Readings averaged per reported temperature.
    pub average_samples: u8,
    /// Delay between averaged readings (milliseconds).
    pub average_delay_ms: u32,
}

impl Default for ThermistorConfig {
    fn default() -> Self {
        Self {
            reference_ohms: 10_000.0,
            nominal_ohms: 10_000.0,
            nominal_celsius: 25.0,
            beta: 3950.0,
            adc_max: 4095,
            vref_mv: 3300,
            average_samples: 10,
            average_delay_ms: 10,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaugeConfig {
    // --- Rate sampling ---
    /// Rotations required to close a sampling window before its deadline.
    pub sample_size: u32,
    /// Sampling window deadline (microseconds).
    pub sample_timeout_us: u64,
    /// Seconds per reported rate unit (60 = events per minute).
    pub rate_scale: f64,

    // --- Gauges (degrees) ---
    pub speed_min_deg: i32,
    pub speed_max_deg: i32,
    /// Speed needle position written before the first measurement.
    pub speed_boot_deg: i32,
    pub temp_min_deg: i32,
    pub temp_max_deg: i32,
    /// Temperature needle position written before the first measurement.
    pub temp_boot_deg: i32,

    // --- Persistence ---
    /// Unpersisted active time (ms) that triggers a write of the
    /// active-duration counter.
    pub min_persist_interval_ms: u64,

    // --- Display ---
    /// Minimum interval between logged telemetry lines (milliseconds).
    pub display_refresh_ms: u32,

    // --- Temperature sensing ---
    pub thermistor: ThermistorConfig,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            // Rate sampling
            sample_size: DEFAULT_SAMPLE_SIZE,
            sample_timeout_us: DEFAULT_SAMPLE_TIMEOUT_US,
            rate_scale: SECONDS_PER_MINUTE,

            // Gauges
            speed_min_deg: 0,
            speed_max_deg: 150,
            speed_boot_deg: 0,
            temp_min_deg: 11,
            temp_max_deg: 110,
            temp_boot_deg: 110,

            // Persistence
            min_persist_interval_ms: 1,

            // Display
            display_refresh_ms: 250,

            // Temperature sensing
            thermistor: ThermistorConfig::default(),
        }
    }
}

impl GaugeConfig {
    /// Sampling window deadline as a [`Duration`].
    pub fn sample_timeout(&self) -> Duration {
        Duration::from_micros(self.sample_timeout_us)
    }

    /// Range-check every field that the control loop relies on.
    pub fn validate(&self) -> Result<()> {
        if self.sample_timeout_us == 0 {
            return Err(Error::Config("sample_timeout_us must be > 0"));
        }
        if self.rate_scale.is_nan() || self.rate_scale <= 0.0 {
            return Err(Error::Config("rate_scale must be > 0"));
        }
        if self.speed_min_deg > self.speed_max_deg {
            return Err(Error::Config("speed_min_deg must be <= speed_max_deg"));
        }
        if self.temp_min_deg > self.temp_max_deg {
            return Err(Error::Config("temp_min_deg must be <= temp_max_deg"));
        }
        if !(self.speed_min_deg..=self.speed_max_deg).contains(&self.speed_boot_deg) {
            return Err(Error::Config("speed_boot_deg outside speed gauge range"));
        }
        if !(self.temp_min_deg..=self.temp_max_deg).contains(&self.temp_boot_deg) {
            return Err(Error::Config("temp_boot_deg outside temperature gauge range"));
        }
        if self.thermistor.average_samples == 0 {
            return Err(Error::Config("thermistor.average_samples must be > 0"));
        }
        if self.thermistor.adc_max == 0 || self.thermistor.vref_mv == 0 {
            return Err(Error::Config("thermistor ADC scale must be non-zero"));
        }
        Ok(())
    }
}
