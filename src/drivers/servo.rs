//! Hobby-servo output over a PWM channel.
//!
//! Standard 50 Hz servo framing: a 544–2400 µs pulse every 20 ms maps
//! linearly onto 0–180°.  The PWM channel is anything implementing
//! `embedded_hal::pwm::SetDutyCycle`; on target that is an LEDC channel.

use embedded_hal::pwm::SetDutyCycle;

pub const SERVO_PERIOD_US: u32 = 20_000;
pub const MIN_PULSE_US: u32 = 544;
pub const MAX_PULSE_US: u32 = 2400;
pub const MAX_DEGREES: i32 = 180;

/// Pulse width for `degrees`, clamped to the servo's mechanical travel.
pub fn angle_to_pulse_us(degrees: i32) -> u32 {
    let d = degrees.clamp(0, MAX_DEGREES) as u32;
    MIN_PULSE_US + d * (MAX_PULSE_US - MIN_PULSE_US) / MAX_DEGREES as u32
}

/// Duty count for a pulse of `pulse_us` within one servo period.
pub fn pulse_to_duty(pulse_us: u32, max_duty: u16) -> u16 {
    let duty = u64::from(pulse_us.min(SERVO_PERIOD_US)) * u64::from(max_duty)
        / u64::from(SERVO_PERIOD_US);
    duty as u16
}

pub struct ServoOutput<P: SetDutyCycle> {
    pwm: P,
    last_pulse_us: Option<u32>,
}

impl<P: SetDutyCycle> ServoOutput<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            last_pulse_us: None,
        }
    }

    pub fn write_angle(&mut self, degrees: i32) -> Result<(), P::Error> {
        let pulse = angle_to_pulse_us(degrees);
        let duty = pulse_to_duty(pulse, self.pwm.max_duty_cycle());
        self.pwm.set_duty_cycle(duty)?;
        self.last_pulse_us = Some(pulse);
        Ok(())
    }

    pub fn last_pulse_us(&self) -> Option<u32> {
        self.last_pulse_us
    }
}
