//! Calendar system for day and season tracking
//!
//! The vault clock only counts ticks; days and seasons are derived from it.
//! Day numbering starts at 1.

use serde::{Deserialize, Serialize};

use crate::core::types::{Season, Tick};

/// Calendar tracks simulation time with day/season granularity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    tick: Tick,
    ticks_per_day: u64,
    days_per_season: u64,
    season: Season,
}

/// What changed when the calendar was advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayChange {
    pub previous_day: u64,
    pub day: u64,
    /// Set when the new day starts a new season
    pub new_season: Option<Season>,
}

impl Calendar {
    pub fn new(ticks_per_day: u64, days_per_season: u64) -> Self {
        Self {
            tick: 0,
            ticks_per_day: ticks_per_day.max(1),
            days_per_season: days_per_season.max(1),
            season: Season::RadBloom,
        }
    }

    /// Advance by `ticks`, returning a single day change if the day number
    /// moved, however many day boundaries were crossed. The clock stops at
    /// `u64::MAX`.
    pub fn advance(&mut self, ticks: u64) -> Option<DayChange> {
        let previous_day = self.current_day();
        self.tick = self.tick.saturating_add(ticks);
        let day = self.current_day();

        if day <= previous_day {
            return None;
        }

        let new_season = if day % self.days_per_season == 0 {
            self.season = self.season.next();
            Some(self.season)
        } else {
            None
        };

        Some(DayChange {
            previous_day,
            day,
            new_season,
        })
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn current_day(&self) -> u64 {
        self.tick / self.ticks_per_day + 1
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn ticks_per_day(&self) -> u64 {
        self.ticks_per_day
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(100, 28)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_starts_on_day_one() {
        let cal = Calendar::default();
        assert_eq!(cal.current_tick(), 0);
        assert_eq!(cal.current_day(), 1);
        assert_eq!(cal.season(), Season::RadBloom);
    }

    #[test]
    fn test_calendar_day_boundary() {
        let mut cal = Calendar::default();
        assert!(cal.advance(99).is_none());
        let change = cal.advance(1).unwrap();
        assert_eq!(change.previous_day, 1);
        assert_eq!(change.day, 2);
        assert!(change.new_season.is_none());
    }

    #[test]
    fn test_large_jump_reports_one_change() {
        let mut cal = Calendar::default();
        let change = cal.advance(250).unwrap();
        assert_eq!(change.previous_day, 1);
        assert_eq!(change.day, 3);
        assert!(cal.advance(10).is_none());
    }

    #[test]
    fn test_season_turns_on_day_28() {
        let mut cal = Calendar::default();
        // Day 27 -> 28 crosses at tick 2700
        cal.advance(2699);
        assert_eq!(cal.current_day(), 27);
        let change = cal.advance(1).unwrap();
        assert_eq!(change.day, 28);
        assert_eq!(change.new_season, Some(Season::SolarFlare));
        assert_eq!(cal.season(), Season::SolarFlare);
    }

    #[test]
    fn test_clock_saturates() {
        let mut cal = Calendar::default();
        cal.advance(10);
        cal.advance(u64::MAX);
        assert_eq!(cal.current_tick(), u64::MAX);
        assert!(cal.advance(1).is_none());
    }
}
