//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns both gauge servos and the thermistor, exposing them through
//! [`GaugeDriver`] and [`TemperaturePort`].  On non-espidf targets the
//! PWM channels are whatever `SetDutyCycle` implementation the caller
//! supplies and the thermistor reads its simulated ADC value.

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{GaugeDriver, GaugeId, TemperaturePort};
use crate::drivers::servo::ServoOutput;
use crate::sensors::temperature::ThermistorSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P: SetDutyCycle, D: DelayNs> {
    speed_servo: ServoOutput<P>,
    temp_servo: ServoOutput<P>,
    thermistor: ThermistorSensor<D>,
}

impl<P: SetDutyCycle, D: DelayNs> HardwareAdapter<P, D> {
    pub fn new(speed_pwm: P, temp_pwm: P, thermistor: ThermistorSensor<D>) -> Self {
        Self {
            speed_servo: ServoOutput::new(speed_pwm),
            temp_servo: ServoOutput::new(temp_pwm),
            thermistor,
        }
    }

    fn servo(&self, id: GaugeId) -> &ServoOutput<P> {
        match id {
            GaugeId::Speed => &self.speed_servo,
            GaugeId::Temperature => &self.temp_servo,
        }
    }

    /// Pulse width last written to the servo behind `id`.
    pub fn last_pulse_us(&self, id: GaugeId) -> Option<u32> {
        self.servo(id).last_pulse_us()
    }
}

// ── GaugeDriver implementation ────────────────────────────────

impl<P: SetDutyCycle, D: DelayNs> GaugeDriver for HardwareAdapter<P, D> {
    fn write_angle(&mut self, id: GaugeId, degrees: i32) {
        let servo = match id {
            GaugeId::Speed => &mut self.speed_servo,
            GaugeId::Temperature => &mut self.temp_servo,
        };
        if let Err(e) = servo.write_angle(degrees) {
            warn!("servo {:?}: duty update failed: {:?}", id, e);
        }
    }
}

// ── TemperaturePort implementation ────────────────────────────

impl<P: SetDutyCycle, D: DelayNs> TemperaturePort for HardwareAdapter<P, D> {
    fn read_celsius(&mut self) -> i32 {
        self.thermistor.read_celsius()
    }
}
