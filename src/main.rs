//! Motor Gauge Firmware: Main Entry Point
//!
//! Hexagonal architecture around a single busy-polling control cycle.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        LogDisplay    NvsAdapter   Esp32Time   │
//! │  (Gauge+Temperature)    (Display)     (Counters)   (Clock)     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ControlCycle (pure logic)                   │    │
//! │  │  Rate · Mapping · Clamped gauges · Usage               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Hall ISR ──▶ HALL_COUNTER (lock-free, atomics only)           │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::FromValueType;

use motorgauge::adapters::hardware::HardwareAdapter;
use motorgauge::adapters::log_display::LogDisplay;
use motorgauge::adapters::nvs::NvsAdapter;
use motorgauge::adapters::time::Esp32TimeAdapter;
use motorgauge::app::cycle::ControlCycle;
use motorgauge::app::ports::Clock;
use motorgauge::config::GaugeConfig;
use motorgauge::drivers::button::BootButton;
use motorgauge::drivers::hw_init;
use motorgauge::pins;
use motorgauge::sensors::rotation::HALL_COUNTER;
use motorgauge::sensors::temperature::ThermistorSensor;
use motorgauge::usage::UsageAccumulator;

// Typed HAL pins below are tied to the pin map at compile time.
const _: () = assert!(pins::RESET_BUTTON_GPIO == 0);
const _: () = assert!(pins::SPEED_SERVO_GPIO == 15);
const _: () = assert!(pins::TEMP_SERVO_GPIO == 4);

const SERVO_RESOLUTION: Resolution = match pins::SERVO_PWM_RESOLUTION_BITS {
    10 => Resolution::Bits10,
    12 => Resolution::Bits12,
    13 => Resolution::Bits13,
    14 => Resolution::Bits14,
    _ => panic!("unsupported servo PWM resolution"),
};

fn halt(what: &str, e: &dyn core::fmt::Display) -> ! {
    // Fatal bring-up failure; the task watchdog resets the chip.
    error!("{} failed: {}, halting", what, e);
    #[allow(clippy::empty_loop)]
    loop {}
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  MotorGauge v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = GaugeConfig::default();
    if let Err(e) = config.validate() {
        halt("config validation", &e);
    }
    match serde_json::to_string(&config) {
        Ok(json) => info!("Config: {}", json),
        Err(e) => warn!("Config dump failed: {}", e),
    }

    // ── 3. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        halt("HAL init", &e);
    }
    let peripherals = Peripherals::take()?;
    let clock = Esp32TimeAdapter::new();

    // ── 4. Boot-time reset request ────────────────────────────
    let mut reset_pin = PinDriver::input(peripherals.pins.gpio0)?;
    reset_pin.set_pull(Pull::Up)?;
    let reset_requested = BootButton::is_held(&mut reset_pin, &mut FreeRtos);
    info!("Reset button (GPIO{}) held at boot: {}", pins::RESET_BUTTON_GPIO, reset_requested);
    drop(reset_pin);

    // ── 5. Usage counters from NVS ────────────────────────────
    let mut nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running without persistence", e);
            NvsAdapter::default()
        }
    };
    let mut usage = UsageAccumulator::load(&nvs, config.min_persist_interval_ms);
    usage.reset_if_requested(reset_requested, &mut nvs);

    // ── 6. Gauge servos + thermistor ──────────────────────────
    let servo_timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default()
            .frequency(pins::SERVO_PWM_FREQ_HZ.Hz().into())
            .resolution(SERVO_RESOLUTION),
    )?;
    let speed_pwm = LedcDriver::new(peripherals.ledc.channel0, &servo_timer, peripherals.pins.gpio15)?;
    let temp_pwm = LedcDriver::new(peripherals.ledc.channel1, &servo_timer, peripherals.pins.gpio4)?;
    let thermistor = ThermistorSensor::new(config.thermistor, hw_init::ADC1_CH_THERMISTOR, FreeRtos);
    let mut hw = HardwareAdapter::new(speed_pwm, temp_pwm, thermistor);
    info!(
        "Gauge servos on GPIO{} (speed) and GPIO{} (temperature), {} Hz / {}-bit",
        pins::SPEED_SERVO_GPIO,
        pins::TEMP_SERVO_GPIO,
        pins::SERVO_PWM_FREQ_HZ,
        pins::SERVO_PWM_RESOLUTION_BITS
    );

    // ── 7. Hall-sensor interrupt ──────────────────────────────
    if let Err(e) = hw_init::init_isr_service() {
        halt("ISR service init", &e);
    }

    // ── 8. Control loop ───────────────────────────────────────
    let mut display = LogDisplay::new(clock, config.display_refresh_ms);
    let mut cycle = match ControlCycle::new(config, &HALL_COUNTER, usage, clock.now_us()) {
        Ok(c) => c,
        Err(e) => halt("control cycle setup", &e),
    };
    cycle.start(&mut hw);
    cycle.run_forever(&mut hw, &mut display, &mut nvs, &clock)
}
