//! GPIO / peripheral pin assignments for the motor gauge board (ESP32).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  `main()` ties the typed HAL pins it takes to
//! these constants with compile-time assertions.

// ---------------------------------------------------------------------------
// Rotation sensing
// ---------------------------------------------------------------------------

/// Hall-effect sensor output, one falling edge per shaft rotation.
pub const HALL_SENSOR_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Temperature (NTC thermistor, ADC1)
// ---------------------------------------------------------------------------

/// NTC thermistor voltage divider. ADC1 channel 6 (GPIO 34 on ESP32).
pub const NTC_ADC_GPIO: i32 = 34;
/// ADC1 channel matching [`NTC_ADC_GPIO`].
pub const NTC_ADC1_CHANNEL: u32 = match adc1_channel(NTC_ADC_GPIO) {
    Some(ch) => ch,
    None => panic!("NTC_ADC_GPIO is not an ADC1 pin"),
};

/// ESP32 ADC1 channel wired to `gpio`, if any.
pub const fn adc1_channel(gpio: i32) -> Option<u32> {
    match gpio {
        36 => Some(0),
        37 => Some(1),
        38 => Some(2),
        39 => Some(3),
        32 => Some(4),
        33 => Some(5),
        34 => Some(6),
        35 => Some(7),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Gauge servos (LEDC PWM)
// ---------------------------------------------------------------------------

/// Speed gauge servo signal.
pub const SPEED_SERVO_GPIO: i32 = 15;
/// Temperature gauge servo signal.
pub const TEMP_SERVO_GPIO: i32 = 4;

/// Hobby-servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC timer resolution (bits) for the servo timer.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;

// ---------------------------------------------------------------------------
// Boot-time reset input
// ---------------------------------------------------------------------------

/// Active-low push button (the ESP32 BOOT button). Held at power-on, it
/// clears the lifetime usage counters.
pub const RESET_BUTTON_GPIO: i32 = 0;
