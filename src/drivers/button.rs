//! Boot-time reset button.
//!
//! Active-low momentary switch with pull-up.  Sampled only once, at boot,
//! to decide whether the lifetime usage counters are cleared.  A press is
//! accepted only if every one of several spaced samples reads low, which
//! rejects contact bounce and a floating line during power-up.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::info;

const DEBOUNCE_SAMPLES: u8 = 5;
const DEBOUNCE_INTERVAL_MS: u32 = 10;

pub struct BootButton;

impl BootButton {
    /// `true` if the button is held down for the whole sampling period.
    /// A pin read error counts as "not held".
    pub fn is_held(pin: &mut impl InputPin, delay: &mut impl DelayNs) -> bool {
        for i in 0..DEBOUNCE_SAMPLES {
            if i > 0 {
                delay.delay_ms(DEBOUNCE_INTERVAL_MS);
            }
            if !pin.is_low().unwrap_or(false) {
                return false;
            }
        }
        info!("button: held at boot");
        true
    }
}
