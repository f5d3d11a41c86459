//! Control cycle: the hexagonal core.
//!
//! [`ControlCycle`] owns both gauges, the rate estimator and the usage
//! accumulator, and borrows the ISR-fed rotation counter.  All I/O flows
//! through port traits injected at call sites, so the whole loop runs
//! against mock adapters on the host.
//!
//! ```text
//!  RotationCounter ──▶ ┌───────────────────────────┐ ──▶ GaugeDriver
//!  TemperaturePort ──▶ │        ControlCycle        │ ──▶ DisplayPort
//!            Clock ──▶ │ Rate · Mapping · Usage     │ ◀─▶ CounterStore
//!                      └───────────────────────────┘
//! ```

use log::{debug, info, trace};

use crate::config::GaugeConfig;
use crate::control::mapping::{map_speed_to_angle, map_temperature_to_angle};
use crate::drivers::gauge::ClampedGauge;
use crate::error::Result;
use crate::sensors::rate::{RateEstimator, RateSample};
use crate::sensors::rotation::RotationCounter;
use crate::usage::UsageAccumulator;

use super::ports::{Clock, CounterStore, DisplayPort, GaugeDriver, GaugeId, TemperaturePort};
use super::telemetry::Telemetry;

// ───────────────────────────────────────────────────────────────
// ControlCycle
// ───────────────────────────────────────────────────────────────

pub struct ControlCycle<'c> {
    config: GaugeConfig,
    counter: &'c RotationCounter,
    estimator: RateEstimator,
    speed: ClampedGauge,
    temperature: ClampedGauge,
    usage: UsageAccumulator,
    /// Start of the not-yet-accounted active time (µs since boot).
    last_tick_us: u64,
    telemetry: Telemetry,
    last_sample: Option<RateSample>,
    cycles: u64,
}

impl<'c> ControlCycle<'c> {
    /// Build the cycle.  Fails only if a configured gauge range is
    /// inverted.  `usage` keeps whatever rotation baseline it carries
    /// (0 after `load`), so rotations the boot-zeroed counter saw before
    /// construction still reach the lifetime total.
    pub fn new(
        config: GaugeConfig,
        counter: &'c RotationCounter,
        usage: UsageAccumulator,
        now_us: u64,
    ) -> Result<Self> {
        let speed = ClampedGauge::new(GaugeId::Speed, config.speed_min_deg, config.speed_max_deg)?;
        let temperature =
            ClampedGauge::new(GaugeId::Temperature, config.temp_min_deg, config.temp_max_deg)?;

        let telemetry = Telemetry {
            lifetime_rotations: usage.total_rotations(),
            lifetime_active_ms: usage.active_ms(),
            ..Telemetry::default()
        };

        Ok(Self {
            estimator: RateEstimator::new(config.rate_scale),
            config,
            counter,
            speed,
            temperature,
            usage,
            last_tick_us: now_us,
            telemetry,
            last_sample: None,
            cycles: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Park both needles at their boot positions.
    pub fn start(&mut self, hw: &mut impl GaugeDriver) {
        let t = self.temperature.set_position(self.config.temp_boot_deg, hw);
        let s = self.speed.set_position(self.config.speed_boot_deg, hw);
        info!("ControlCycle started (temperature={}°, speed={}°)", t, s);
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full cycle: account time → measure rate → map → actuate →
    /// present → persist.
    ///
    /// The `hw` parameter satisfies **both** [`GaugeDriver`] and
    /// [`TemperaturePort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn run_once(
        &mut self,
        hw: &mut (impl GaugeDriver + TemperaturePort),
        display: &mut impl DisplayPort,
        store: &mut impl CounterStore,
        clock: &impl Clock,
    ) -> Telemetry {
        self.cycles += 1;

        // 1. Active time, whole milliseconds; the remainder carries over.
        let elapsed_ms = clock.now_us().saturating_sub(self.last_tick_us) / 1_000;
        self.last_tick_us += elapsed_ms * 1_000;
        self.usage.tick(elapsed_ms, store);

        // 2. Bounded sampling window; keep the display alive meanwhile.
        let shown = self.telemetry;
        let sample = self.estimator.measure(
            self.counter,
            clock,
            self.config.sample_size,
            self.config.sample_timeout(),
            || display.present(&shown),
        );
        let rate = sample.whole_rate();

        // 3. Map
        let celsius = hw.read_celsius();
        let speed_angle = map_speed_to_angle(rate);
        let temp_angle = map_temperature_to_angle(celsius);

        // 4. Actuate
        let speed_deg = self.speed.set_position(speed_angle, hw);
        let temp_deg = self.temperature.set_position(temp_angle, hw);
        trace!(
            "cycle {}: rate={} speed={}° temp={}C → {}°",
            self.cycles, rate, speed_deg, celsius, temp_deg
        );
        if sample.timed_out {
            debug!("cycle {}: degraded rate from {} events", self.cycles, sample.window_count);
        }

        // 5. Present
        self.usage.sync_rotations(self.counter.lifetime_count());
        self.telemetry = Telemetry {
            rate,
            temperature_c: celsius,
            lifetime_rotations: self.usage.total_rotations(),
            lifetime_active_ms: self.usage.active_ms(),
        };
        display.present(&self.telemetry);

        // 6. Persist
        self.usage.persist_rotations(store);

        self.last_sample = Some(sample);
        self.telemetry
    }

    /// Run cycles back to back, forever.
    pub fn run_forever(
        &mut self,
        hw: &mut (impl GaugeDriver + TemperaturePort),
        display: &mut impl DisplayPort,
        store: &mut impl CounterStore,
        clock: &impl Clock,
    ) -> ! {
        info!("ControlCycle: entering main loop");
        loop {
            self.run_once(hw, display, store, clock);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn telemetry(&self) -> Telemetry {
        self.telemetry
    }

    pub fn last_sample(&self) -> Option<RateSample> {
        self.last_sample
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn speed_gauge(&self) -> &ClampedGauge {
        &self.speed
    }

    pub fn temperature_gauge(&self) -> &ClampedGauge {
        &self.temperature
    }

    pub fn usage(&self) -> &UsageAccumulator {
        &self.usage
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }
}
