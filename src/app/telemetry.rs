//! Telemetry values pushed to the display presenter.

/// A point-in-time snapshot of everything the display shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Telemetry {
    /// Rotation rate in whole events per minute (truncated toward zero).
    pub rate: i64,
    pub temperature_c: i32,
    pub lifetime_rotations: u64,
    pub lifetime_active_ms: u64,
}
