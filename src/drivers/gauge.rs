//! Range-clamped gauge needle.
//!
//! Every position command passes through [`ClampedGauge::set_position`],
//! the single mutation point, which clamps into the gauge's immutable
//! `[min, max]` range before anything reaches the servo.  The driver is a
//! dumb actuator; range enforcement lives here.

use log::debug;

use crate::app::ports::{GaugeDriver, GaugeId};
use crate::error::{ActuatorError, Result};

/// Immutable travel limits of one gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeRange {
    pub id: GaugeId,
    pub min: i32,
    pub max: i32,
}

impl GaugeRange {
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

pub struct ClampedGauge {
    range: GaugeRange,
    /// Last position written; `None` until the first command.
    position: Option<i32>,
}

impl ClampedGauge {
    pub fn new(id: GaugeId, min: i32, max: i32) -> Result<Self> {
        if min > max {
            return Err(ActuatorError::InvalidRange { min, max }.into());
        }
        Ok(Self {
            range: GaugeRange { id, min, max },
            position: None,
        })
    }

    /// Clamp `value`, record it, and issue exactly one driver write.
    /// Returns the position actually commanded.
    pub fn set_position(&mut self, value: i32, driver: &mut impl GaugeDriver) -> i32 {
        let clamped = self.range.clamp(value);
        if clamped != value {
            debug!(
                "gauge {:?}: {} clamped to {} [{}, {}]",
                self.range.id, value, clamped, self.range.min, self.range.max
            );
        }
        self.position = Some(clamped);
        driver.write_angle(self.range.id, clamped);
        clamped
    }

    pub fn position(&self) -> Option<i32> {
        self.position
    }

    pub fn range(&self) -> GaugeRange {
        self.range
    }

    pub fn id(&self) -> GaugeId {
        self.range.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(GaugeId, i32)>,
    }

    impl GaugeDriver for Recorder {
        fn write_angle(&mut self, id: GaugeId, degrees: i32) {
            self.writes.push((id, degrees));
        }
    }

    #[test]
    fn in_range_value_passes_through() {
        let mut g = ClampedGauge::new(GaugeId::Speed, 0, 150).unwrap();
        let mut drv = Recorder::default();
        assert_eq!(g.set_position(73, &mut drv), 73);
        assert_eq!(g.position(), Some(73));
        assert_eq!(drv.writes, vec![(GaugeId::Speed, 73)]);
    }

    #[test]
    fn out_of_range_values_clamp_to_nearest_bound() {
        let mut g = ClampedGauge::new(GaugeId::Temperature, 11, 110).unwrap();
        let mut drv = Recorder::default();
        assert_eq!(g.set_position(-16, &mut drv), 11);
        assert_eq!(g.set_position(122, &mut drv), 110);
        assert_eq!(g.set_position(i32::MIN, &mut drv), 11);
        assert_eq!(
            drv.writes,
            vec![
                (GaugeId::Temperature, 11),
                (GaugeId::Temperature, 110),
                (GaugeId::Temperature, 11),
            ]
        );
    }

    #[test]
    fn repeated_commands_are_not_deduplicated() {
        let mut g = ClampedGauge::new(GaugeId::Speed, 0, 150).unwrap();
        let mut drv = Recorder::default();
        g.set_position(10, &mut drv);
        g.set_position(10, &mut drv);
        assert_eq!(drv.writes.len(), 2);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = ClampedGauge::new(GaugeId::Speed, 5, 1).err();
        assert_eq!(
            err,
            Some(Error::Actuator(ActuatorError::InvalidRange { min: 5, max: 1 }))
        );
    }

    #[test]
    fn degenerate_range_pins_the_needle() {
        let mut g = ClampedGauge::new(GaugeId::Speed, 42, 42).unwrap();
        let mut drv = Recorder::default();
        assert_eq!(g.set_position(0, &mut drv), 42);
        assert_eq!(g.position(), Some(42));
        assert_eq!(g.range().min, g.range().max);
        assert_eq!(g.id(), GaugeId::Speed);
    }
}
