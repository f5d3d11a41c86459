//! Lifetime usage counters.
//!
//! Two durable totals survive power cycles: rotations and powered-on
//! (active) milliseconds.  They are read once at boot, owned in memory by
//! [`UsageAccumulator`] from then on, and written back through a
//! [`CounterStore`] whenever they change.
//!
//! Writes are idempotent: a value equal to the last one successfully
//! persisted is never rewritten.  A failed write is logged and otherwise
//! ignored; the in-memory total stays authoritative and the next persist
//! retries.  Each key is one atomic store write, so after a power loss
//! the store holds either the previous or the new total.

use log::{info, warn};

use crate::app::ports::CounterStore;

/// Persisted lifetime rotation total.
pub const KEY_TOTAL_ROTATIONS: &str = "totalRotations";
/// Persisted lifetime active-time total (milliseconds).
pub const KEY_ACTIVE_MILLIS: &str = "motoMilliseconds";

/// One durable counter plus its last successfully persisted value.
#[derive(Debug, Clone, Copy)]
struct DurableCounter {
    key: &'static str,
    value: u64,
    persisted: Option<u64>,
}

impl DurableCounter {
    fn load(key: &'static str, store: &impl CounterStore) -> Self {
        let value = store.get_int(key, 0);
        Self {
            key,
            value,
            persisted: Some(value),
        }
    }

    fn unpersisted(&self) -> u64 {
        self.value.saturating_sub(self.persisted.unwrap_or(0))
    }

    /// Write `value` unless the store already holds it.  Returns `true`
    /// if a write was attempted and succeeded.
    fn persist(&mut self, store: &mut impl CounterStore) -> bool {
        if self.persisted == Some(self.value) {
            return false;
        }
        match store.put_int(self.key, self.value) {
            Ok(()) => {
                self.persisted = Some(self.value);
                true
            }
            Err(e) => {
                warn!("usage: persisting {}={} failed: {}", self.key, self.value, e);
                false
            }
        }
    }
}

pub struct UsageAccumulator {
    rotations: DurableCounter,
    active_ms: DurableCounter,
    /// Last lifetime-counter word folded into `rotations`.
    last_lifetime_snapshot: u32,
    min_persist_interval_ms: u64,
}

impl UsageAccumulator {
    /// Read both totals from `store` (missing keys read as 0).
    pub fn load(store: &impl CounterStore, min_persist_interval_ms: u64) -> Self {
        let rotations = DurableCounter::load(KEY_TOTAL_ROTATIONS, store);
        let active_ms = DurableCounter::load(KEY_ACTIVE_MILLIS, store);
        info!(
            "usage: loaded {} rotations, {} ms active",
            rotations.value, active_ms.value
        );
        Self {
            rotations,
            active_ms,
            last_lifetime_snapshot: 0,
            min_persist_interval_ms,
        }
    }

    /// Align the wrapping-delta baseline with a rotation counter whose
    /// lifetime word did not start at 0.  Events before this point are
    /// not counted.
    pub fn set_rotation_baseline(&mut self, lifetime_snapshot: u32) {
        self.last_lifetime_snapshot = lifetime_snapshot;
    }

    /// Zero both totals and persist them.  Intended to run once at boot,
    /// before any other mutation.  Returns whether a reset happened.
    pub fn reset_if_requested(&mut self, requested: bool, store: &mut impl CounterStore) -> bool {
        if !requested {
            return false;
        }
        info!(
            "usage: reset requested, clearing {} rotations and {} ms",
            self.rotations.value, self.active_ms.value
        );
        for counter in [&mut self.rotations, &mut self.active_ms] {
            counter.value = 0;
            // Force the write even if the store already reads 0.
            counter.persisted = None;
            counter.persist(store);
        }
        true
    }

    /// Count one rotation and persist the new total.
    pub fn on_rotation(&mut self, store: &mut impl CounterStore) {
        self.rotations.value = self.rotations.value.saturating_add(1);
        self.rotations.persist(store);
    }

    /// Fold in rotations seen by the lifetime counter since the last call.
    /// The counter word wraps; the delta is computed modulo 2^32.
    /// Returns the number of rotations added.  In-memory only.
    pub fn sync_rotations(&mut self, lifetime_snapshot: u32) -> u32 {
        let delta = lifetime_snapshot.wrapping_sub(self.last_lifetime_snapshot);
        self.last_lifetime_snapshot = lifetime_snapshot;
        self.rotations.value = self.rotations.value.saturating_add(u64::from(delta));
        delta
    }

    /// Persist the rotation total if it changed since the last write.
    pub fn persist_rotations(&mut self, store: &mut impl CounterStore) -> bool {
        self.rotations.persist(store)
    }

    /// Add `elapsed_ms` of active time.  Persists once the unpersisted
    /// amount reaches the minimum interval, so sub-millisecond cycles
    /// (`elapsed_ms == 0`) never write.
    pub fn tick(&mut self, elapsed_ms: u64, store: &mut impl CounterStore) -> bool {
        self.active_ms.value = self.active_ms.value.saturating_add(elapsed_ms);
        if self.active_ms.unpersisted() >= self.min_persist_interval_ms.max(1) {
            self.active_ms.persist(store)
        } else {
            false
        }
    }

    pub fn total_rotations(&self) -> u64 {
        self.rotations.value
    }

    pub fn active_ms(&self) -> u64 {
        self.active_ms.value
    }
}
