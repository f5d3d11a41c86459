//! Signal → needle-angle mapping.
//!
//! Each mapped quantity has an immutable [`MappingTable`]: an ordered list
//! of guarded linear segments.  The first guard that admits the input
//! selects the segment; inputs beyond the segment's breakpoints are
//! extrapolated along it, never rejected.
//!
//! Arithmetic is integer with truncation toward zero, so an angle computed
//! here never differs by one unit from the value shown on the display.

/// One linear segment: `[in_min, in_max] → [out_min, out_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub in_min: i32,
    pub in_max: i32,
    pub out_min: i32,
    pub out_max: i32,
}

impl Segment {
    pub const fn new(in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> Self {
        Self {
            in_min,
            in_max,
            out_min,
            out_max,
        }
    }

    /// `out_min + (x - in_min) * (out_max - out_min) / (in_max - in_min)`.
    ///
    /// A zero-width input range yields `out_min`.  The result saturates at
    /// the `i32` bounds for absurd inputs.
    pub fn apply(&self, x: i64) -> i32 {
        let run = i64::from(self.in_max) - i64::from(self.in_min);
        if run == 0 {
            return self.out_min;
        }
        let rise = i64::from(self.out_max) - i64::from(self.out_min);
        let delta = x.saturating_sub(i64::from(self.in_min));
        let out = delta.saturating_mul(rise) / run + i64::from(self.out_min);
        out.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

/// Branch selector for a [`MappingTable`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Input strictly greater than the bound.
    Above(i32),
    /// Input strictly less than the bound.
    Below(i32),
    Always,
}

impl Guard {
    fn admits(self, x: i64) -> bool {
        match self {
            Self::Above(bound) => x > i64::from(bound),
            Self::Below(bound) => x < i64::from(bound),
            Self::Always => true,
        }
    }
}

/// Priority-ordered piecewise-linear map.
#[derive(Debug, Clone, Copy)]
pub struct MappingTable {
    branches: &'static [(Guard, Segment)],
}

impl MappingTable {
    pub const fn new(branches: &'static [(Guard, Segment)]) -> Self {
        Self { branches }
    }

    /// Evaluate the first branch whose guard admits `x`.  If no guard
    /// matches, the last segment is extrapolated.
    pub fn map(&self, x: i64) -> i32 {
        self.branches
            .iter()
            .find(|(guard, _)| guard.admits(x))
            .or(self.branches.last())
            .map_or(0, |(_, segment)| segment.apply(x))
    }

    pub fn branches(&self) -> &'static [(Guard, Segment)] {
        self.branches
    }
}

/// Temperature (°C) → temperature needle angle.
///
/// Branch order matters: `t > 90` is tested before `t < 0` and `t < 60`.
/// Segment ends are not guaranteed to meet at the 0 and 90 boundaries.
pub const TEMPERATURE_TABLE: MappingTable = MappingTable::new(&[
    (Guard::Above(90), Segment::new(90, 120, 38, 11)),
    (Guard::Below(0), Segment::new(-20, 0, 110, 98)),
    (Guard::Below(60), Segment::new(0, 60, 98, 73)),
    (Guard::Always, Segment::new(60, 90, 73, 38)),
]);

/// Rotation rate (events/min) → speed needle angle.
pub const SPEED_TABLE: MappingTable =
    MappingTable::new(&[(Guard::Always, Segment::new(100, 6000, 0, 150))]);

pub fn map_temperature_to_angle(celsius: i32) -> i32 {
    TEMPERATURE_TABLE.map(i64::from(celsius))
}

pub fn map_speed_to_angle(rate: i64) -> i32 {
    SPEED_TABLE.map(rate)
}
