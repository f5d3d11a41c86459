//! Usage counters against the NVS adapter's simulation backend.
//!
//! A "power cycle" is modelled by dropping the accumulator and loading a
//! fresh one from the same store.

use motorgauge::adapters::nvs::NvsAdapter;
use motorgauge::app::ports::CounterStore;
use motorgauge::sensors::rotation::RotationCounter;
use motorgauge::usage::{KEY_ACTIVE_MILLIS, KEY_TOTAL_ROTATIONS, UsageAccumulator};

#[test]
fn totals_survive_a_power_cycle() {
    let mut nvs = NvsAdapter::new().unwrap();
    {
        let mut usage = UsageAccumulator::load(&nvs, 1);
        for _ in 0..25 {
            usage.on_rotation(&mut nvs);
        }
        usage.tick(1_500, &mut nvs);
    }

    let usage = UsageAccumulator::load(&nvs, 1);
    assert_eq!(usage.total_rotations(), 25);
    assert_eq!(usage.active_ms(), 1_500);
}

#[test]
fn held_button_at_boot_clears_both_totals() {
    let mut nvs = NvsAdapter::new().unwrap();
    nvs.put_int(KEY_TOTAL_ROTATIONS, 9_999).unwrap();
    nvs.put_int(KEY_ACTIVE_MILLIS, 123_456).unwrap();

    let mut usage = UsageAccumulator::load(&nvs, 1);
    assert!(usage.reset_if_requested(true, &mut nvs));

    assert_eq!(usage.total_rotations(), 0);
    assert_eq!(usage.active_ms(), 0);
    let reloaded = UsageAccumulator::load(&nvs, 1);
    assert_eq!(reloaded.total_rotations(), 0);
    assert_eq!(reloaded.active_ms(), 0);
}

#[test]
fn counter_sync_adds_each_rotation_exactly_once() {
    let mut nvs = NvsAdapter::new().unwrap();
    let counter = RotationCounter::new();
    let mut usage = UsageAccumulator::load(&nvs, 1);
    usage.set_rotation_baseline(counter.lifetime_count());

    let mut added = 0;
    for burst in [3u32, 0, 7, 1] {
        for _ in 0..burst {
            counter.on_event();
        }
        // Draining the window must not affect the lifetime view.
        counter.drain_window_count();
        added += usage.sync_rotations(counter.lifetime_count());
        usage.persist_rotations(&mut nvs);
    }

    assert_eq!(added, 11);
    assert_eq!(usage.total_rotations(), 11);
    assert_eq!(nvs.get_int(KEY_TOTAL_ROTATIONS, 0), 11);
}
