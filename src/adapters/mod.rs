//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                 |
//! |----------------|--------------------|-----------------------------|
//! | `hardware`     | GaugeDriver        | LEDC PWM (servos)           |
//! |                | TemperaturePort    | ADC1 (NTC thermistor)       |
//! | `log_display`  | DisplayPort        | Serial log output           |
//! | `nvs`          | CounterStore       | NVS / in-memory store       |
//! | `time`         | Clock              | ESP32 high-resolution timer |

pub mod hardware;
pub mod log_display;
pub mod nvs;
pub mod time;
