//! Weekly planning horizon.

use crate::error::{Result, TimetableError};

/// Number of teaching weeks covered by the recurring grids.
pub const TEACHING_WEEKS: u32 = 12;

/// Shape of one week: `days_per_week * hours_per_day` local slots.
///
/// A local slot `s` falls on day `s / hours_per_day` at hour
/// `s % hours_per_day`. A grid with week offset `w` maps local slot `s`
/// to absolute slot `s + slots_per_week * w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    days_per_week: u32,
    hours_per_day: u32,
}

impl Horizon {
    pub fn new(days_per_week: u32, hours_per_day: u32) -> Result<Self> {
        if days_per_week == 0 || hours_per_day == 0 {
            return Err(TimetableError::EmptyPlanningHorizon);
        }
        Ok(Self {
            days_per_week,
            hours_per_day,
        })
    }

    #[inline]
    pub fn days_per_week(&self) -> u32 {
        self.days_per_week
    }

    #[inline]
    pub fn hours_per_day(&self) -> u32 {
        self.hours_per_day
    }

    #[inline]
    pub fn slots_per_week(&self) -> u32 {
        self.days_per_week * self.hours_per_day
    }

    /// Day index of a local or absolute slot within its week.
    #[inline]
    pub fn day_of(&self, slot: u32) -> u32 {
        (slot % self.slots_per_week()) / self.hours_per_day
    }

    /// Zero-based hour of a slot within its day.
    #[inline]
    pub fn hour_of(&self, slot: u32) -> u32 {
        slot % self.hours_per_day
    }

    #[inline]
    pub fn absolute_slot(&self, local_slot: u32, week_offset: u32) -> u32 {
        local_slot + self.slots_per_week() * week_offset
    }
}

impl Default for Horizon {
    /// Five days of eight teaching hours.
    fn default() -> Self {
        Self {
            days_per_week: 5,
            hours_per_day: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shape() {
        let horizon = Horizon::default();
        assert_eq!(horizon.slots_per_week(), 40);
        assert_eq!(horizon.day_of(17), 2);
        assert_eq!(horizon.hour_of(17), 1);
        assert_eq!(horizon.absolute_slot(17, 3), 137);
        assert_eq!(horizon.day_of(137), 2);
    }

    #[test]
    fn test_empty_horizon_rejected() {
        assert!(matches!(
            Horizon::new(0, 8),
            Err(TimetableError::EmptyPlanningHorizon)
        ));
    }
}
