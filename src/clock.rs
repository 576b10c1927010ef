//! Clock Module
//!
//! Minute-resolution game clock over a 1440-minute day. Day rollover is
//! reported to the caller, which owns the autosave and needs-update side
//! effects.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const MINUTES_PER_DAY: u64 = 1440;

/// Coarse band of the day. Fixed boundaries, not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeOfDay::Night => "Night",
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    minutes: u64,
}

impl GameClock {
    pub fn new() -> GameClock {
        GameClock { minutes: 0 }
    }

    pub fn minutes(&self) -> u64 {
        self.minutes
    }

    /// Restore the clock from a persisted minute count.
    pub fn set_minutes(&mut self, minutes: u64) {
        self.minutes = minutes;
    }

    /// Push the clock forward. Returns true when the advance crossed into a
    /// new day, at most once per call however many midnights passed.
    pub fn advance(&mut self, minutes: u64) -> bool {
        let old_day = self.minutes / MINUTES_PER_DAY;
        self.minutes += minutes;
        self.minutes / MINUTES_PER_DAY > old_day
    }

    pub fn hour(&self) -> u64 {
        (self.minutes % MINUTES_PER_DAY) / 60
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        match self.hour() {
            0..=5 => TimeOfDay::Night,
            6..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    /// Wall-clock display, HH:MM.
    pub fn formatted_time(&self) -> String {
        let minutes_today = self.minutes % MINUTES_PER_DAY;
        format!("{:02}:{:02}", minutes_today / 60, minutes_today % 60)
    }

    /// Days are counted from 1.
    pub fn day_number(&self) -> u64 {
        self.minutes / MINUTES_PER_DAY + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollover_reported_once_per_crossing() {
        let mut clock = GameClock::new();
        assert!(!clock.advance(1439));
        assert!(clock.advance(1));
        assert!(!clock.advance(10));
        assert_eq!(clock.day_number(), 2);
    }

    #[test]
    fn multi_day_advance_reports_a_single_rollover() {
        let mut clock = GameClock::new();
        assert!(clock.advance(2 * MINUTES_PER_DAY + 5));
        assert_eq!(clock.day_number(), 3);
        assert!(!clock.advance(5));
    }

    #[test]
    fn bands_change_on_the_hour() {
        let mut clock = GameClock::new();
        assert_eq!(clock.time_of_day(), TimeOfDay::Night);
        clock.set_minutes(5 * 60 + 59);
        assert_eq!(clock.time_of_day(), TimeOfDay::Night);
        clock.set_minutes(6 * 60);
        assert_eq!(clock.time_of_day(), TimeOfDay::Morning);
        clock.set_minutes(12 * 60);
        assert_eq!(clock.time_of_day(), TimeOfDay::Afternoon);
        clock.set_minutes(18 * 60);
        assert_eq!(clock.time_of_day(), TimeOfDay::Evening);
        clock.set_minutes(23 * 60 + 59);
        assert_eq!(clock.time_of_day(), TimeOfDay::Evening);
    }

    #[test]
    fn formatted_time_wraps_at_midnight() {
        let mut clock = GameClock::new();
        clock.set_minutes(MINUTES_PER_DAY + 6 * 60 + 7);
        assert_eq!(clock.formatted_time(), "06:07");
        assert_eq!(clock.day_number(), 2);
    }
}
