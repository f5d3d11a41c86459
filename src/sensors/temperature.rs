//! NTC thermistor temperature sensor (10 kOhm @ 25 C, B = 3950).
//!
//! Wired as the low side of a voltage divider with a fixed resistor on
//! the supply side, read via ADC1.  The simplified Beta (Steinhart-Hart)
//! equation converts resistance to temperature.  Each reported value is
//! the mean of several readings spaced by a short delay.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection.

use core::sync::atomic::AtomicU16;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

use embedded_hal::delay::DelayNs;
use log::trace;

use crate::app::ports::TemperaturePort;
use crate::config::ThermistorConfig;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg_attr(target_os = "espidf", allow(dead_code))]
static SIM_TEMP_ADC: AtomicU16 = AtomicU16::new(2048);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_adc(raw: u16) {
    SIM_TEMP_ADC.store(raw, Ordering::Relaxed);
}

const KELVIN_OFFSET: f32 = 273.15;
/// Reported when the divider reads as open or shorted.
pub const FAULT_CELSIUS: f32 = -40.0;
/// Rail margin (volts) inside which a reading is treated as a wiring fault.
const RAIL_MARGIN_V: f32 = 0.01;

/// Convert a raw ADC count to degrees Celsius.
pub fn adc_to_celsius(config: &ThermistorConfig, raw: u16) -> f32 {
    let v_ref = f32::from(config.vref_mv) / 1000.0;
    let voltage = (f32::from(raw) / f32::from(config.adc_max)) * v_ref;
    if voltage <= RAIL_MARGIN_V || voltage >= (v_ref - RAIL_MARGIN_V) {
        return FAULT_CELSIUS;
    }
    let r_ntc = config.reference_ohms * voltage / (v_ref - voltage);
    let t0_k = config.nominal_celsius + KELVIN_OFFSET;
    let inv_t = (1.0 / t0_k) + (1.0 / config.beta) * (r_ntc / config.nominal_ohms).ln();
    if inv_t <= 0.0 {
        return FAULT_CELSIUS;
    }
    (1.0 / inv_t) - KELVIN_OFFSET
}

/// Averaging thermistor reader.
pub struct ThermistorSensor<D: DelayNs> {
    config: ThermistorConfig,
    channel: u32,
    delay: D,
}

impl<D: DelayNs> ThermistorSensor<D> {
    pub fn new(config: ThermistorConfig, channel: u32, delay: D) -> Self {
        Self {
            config,
            channel,
            delay,
        }
    }

    /// Mean of `average_samples` conversions, in degrees Celsius.
    pub fn read_average(&mut self) -> f32 {
        let samples = self.config.average_samples.max(1);
        let mut sum = 0.0f32;
        for i in 0..samples {
            if i > 0 {
                self.delay.delay_ms(self.config.average_delay_ms);
            }
            sum += adc_to_celsius(&self.config, self.read_adc());
        }
        let mean = sum / f32::from(samples);
        trace!("thermistor: ch{} mean={:.2}C over {}", self.channel, mean, samples);
        mean
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(self.channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_TEMP_ADC.load(Ordering::Relaxed)
    }
}

impl<D: DelayNs> TemperaturePort for ThermistorSensor<D> {
    /// Averaged reading truncated toward zero.
    fn read_celsius(&mut self) -> i32 {
        self.read_average() as i32
    }
}
