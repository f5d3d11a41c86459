//! ControlCycle integration tests.
//!
//! Drive full cycles against mock adapters: a stepping clock stands in for
//! busy-poll wall time and the mock display doubles as the hall sensor,
//! firing rotations from inside the sampling window's idle callback.

use crate::mock_hw::{MockDisplay, MockHardware, MockStore, SteppingClock};
use motorgauge::app::cycle::ControlCycle;
use motorgauge::app::ports::{Clock, GaugeId};
use motorgauge::config::GaugeConfig;
use motorgauge::error::{ActuatorError, Error};
use motorgauge::sensors::rotation::RotationCounter;
use motorgauge::usage::{KEY_ACTIVE_MILLIS, KEY_TOTAL_ROTATIONS, UsageAccumulator};

fn make_cycle<'c>(
    counter: &'c RotationCounter,
    store: &MockStore,
    clock: &SteppingClock,
) -> ControlCycle<'c> {
    let config = GaugeConfig::default();
    let usage = UsageAccumulator::load(store, config.min_persist_interval_ms);
    ControlCycle::new(config, counter, usage, clock.now_us()).unwrap()
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn start_parks_needles_at_boot_positions() {
    let counter = RotationCounter::new();
    let store = MockStore::default();
    let clock = SteppingClock::new(1_000);
    let mut cycle = make_cycle(&counter, &store, &clock);
    let mut hw = MockHardware::new(20);

    cycle.start(&mut hw);

    assert_eq!(
        hw.writes,
        vec![(GaugeId::Temperature, 110), (GaugeId::Speed, 0)]
    );
    assert_eq!(cycle.temperature_gauge().position(), Some(110));
    assert_eq!(cycle.speed_gauge().position(), Some(0));
}

#[test]
fn inverted_gauge_range_fails_construction() {
    let counter = RotationCounter::new();
    let store = MockStore::default();
    let config = GaugeConfig {
        speed_min_deg: 200,
        ..GaugeConfig::default()
    };
    let usage = UsageAccumulator::load(&store, 1);

    let result = ControlCycle::new(config, &counter, usage, 0);

    assert_eq!(
        result.err(),
        Some(Error::Actuator(ActuatorError::InvalidRange { min: 200, max: 150 }))
    );
}

// ── Measurement → actuation ───────────────────────────────────

#[test]
fn idle_shaft_at_45c_times_out_and_shows_zero_rate() {
    let counter = RotationCounter::new();
    let mut store = MockStore::default();
    let clock = SteppingClock::new(1_000);
    let mut cycle = make_cycle(&counter, &store, &clock);
    let mut hw = MockHardware::new(45);
    let mut display = MockDisplay::new();

    let telemetry = cycle.run_once(&mut hw, &mut display, &mut store, &clock);

    // Speed maps 0 → -2, clamped to the gauge minimum.
    assert_eq!(hw.writes, vec![(GaugeId::Speed, 0), (GaugeId::Temperature, 80)]);
    assert_eq!(telemetry.rate, 0);
    assert_eq!(telemetry.temperature_c, 45);

    let sample = cycle.last_sample().unwrap();
    assert!(sample.timed_out);
    assert_eq!(sample.window_count, 0);
    assert!(sample.elapsed_secs > 2.0 && sample.elapsed_secs < 2.01);

    assert_eq!(display.last(), Some(&telemetry));
    assert!(display.shown.len() > 1_000, "idle refreshes while waiting");
    assert_eq!(store.writes_to(KEY_TOTAL_ROTATIONS), 0, "unchanged total not rewritten");
}

#[test]
fn full_window_of_rotations_pegs_speed_gauge_and_persists_total() {
    let counter = RotationCounter::new();
    let mut store = MockStore::default();
    let clock = SteppingClock::new(1_000);
    let mut cycle = make_cycle(&counter, &store, &clock);
    let mut hw = MockHardware::new(60);
    let mut display = MockDisplay::firing(&counter, 8);

    let telemetry = cycle.run_once(&mut hw, &mut display, &mut store, &clock);

    let sample = cycle.last_sample().unwrap();
    assert!(!sample.timed_out);
    assert_eq!(sample.window_count, 8);
    assert!(telemetry.rate > 6_000, "8 rotations in ~10ms is far above full scale");

    assert_eq!(hw.last_angle(GaugeId::Speed), Some(150));
    assert_eq!(hw.last_angle(GaugeId::Temperature), Some(73));
    assert_eq!(telemetry.lifetime_rotations, 8);
    assert_eq!(store.data.get(KEY_TOTAL_ROTATIONS), Some(&8));
}

#[test]
fn each_cycle_writes_each_gauge_exactly_once() {
    let counter = RotationCounter::new();
    let mut store = MockStore::default();
    let clock = SteppingClock::new(5_000);
    let mut cycle = make_cycle(&counter, &store, &clock);
    let mut hw = MockHardware::new(100);
    let mut display = MockDisplay::new();

    for _ in 0..3 {
        cycle.run_once(&mut hw, &mut display, &mut store, &clock);
    }

    assert_eq!(cycle.cycles(), 3);
    assert_eq!(hw.writes_for(GaugeId::Speed), 3);
    assert_eq!(hw.writes_for(GaugeId::Temperature), 3);
    assert_eq!(hw.temperature_reads, 3);
    assert_eq!(hw.last_angle(GaugeId::Temperature), Some(29));
}

// ── Usage accounting ──────────────────────────────────────────

#[test]
fn rotations_before_construction_are_counted() {
    // Edges between ISR install and cycle construction.
    let counter = RotationCounter::new();
    for _ in 0..5 {
        counter.on_event();
    }
    let mut store = MockStore::with(&[(KEY_TOTAL_ROTATIONS, 100)]);
    let clock = SteppingClock::new(1_000);
    let mut cycle = make_cycle(&counter, &store, &clock);
    let mut hw = MockHardware::new(20);
    let mut display = MockDisplay::new();

    let telemetry = cycle.run_once(&mut hw, &mut display, &mut store, &clock);

    assert_eq!(telemetry.lifetime_rotations, 105);
    assert_eq!(store.data.get(KEY_TOTAL_ROTATIONS), Some(&105));
    let sample = cycle.last_sample().unwrap();
    assert_eq!(sample.window_count, 0, "early edges stay out of the rate window");
}

#[test]
fn active_time_is_whole_milliseconds_with_carry() {
    let counter = RotationCounter::new();
    let mut store = MockStore::default();
    // 0.7 ms per clock read: the first tick sees less than a millisecond.
    let clock = SteppingClock::new(700);
    let mut cycle = make_cycle(&counter, &store, &clock);
    let mut hw = MockHardware::new(20);
    let mut display = MockDisplay::new();

    let first = cycle.run_once(&mut hw, &mut display, &mut store, &clock);
    assert_eq!(first.lifetime_active_ms, 0);
    assert_eq!(store.writes_to(KEY_ACTIVE_MILLIS), 0, "sub-ms tick must not write");

    let second = cycle.run_once(&mut hw, &mut display, &mut store, &clock);
    assert!(second.lifetime_active_ms >= 2_000);
    assert!(second.lifetime_active_ms * 1_000 <= clock.peek());
    assert_eq!(store.data.get(KEY_ACTIVE_MILLIS), Some(&second.lifetime_active_ms));
}

#[test]
fn persistence_failure_does_not_stop_the_loop() {
    let counter = RotationCounter::new();
    let mut store = MockStore {
        fail: true,
        ..MockStore::default()
    };
    let clock = SteppingClock::new(1_000);
    let mut cycle = make_cycle(&counter, &store, &clock);
    let mut hw = MockHardware::new(20);

    let mut display = MockDisplay::firing(&counter, 8);
    let telemetry = cycle.run_once(&mut hw, &mut display, &mut store, &clock);
    assert_eq!(telemetry.lifetime_rotations, 8, "memory stays authoritative");
    assert!(store.writes.is_empty());

    // Backend recovers: the next cycle catches the store up.
    store.fail = false;
    let mut display = MockDisplay::new();
    cycle.run_once(&mut hw, &mut display, &mut store, &clock);
    assert_eq!(store.data.get(KEY_TOTAL_ROTATIONS), Some(&8));
    assert_eq!(cycle.usage().total_rotations(), 8);
}
