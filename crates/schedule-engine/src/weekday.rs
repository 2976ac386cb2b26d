//! Club weekday numbering: 0 = Sunday .. 6 = Saturday.
//!
//! Stored rules and the weekday pickers in the front end use this numbering, so
//! it is kept as-is rather than normalized to ISO 8601.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// A validated weekday number in `0..=6`, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct ClubWeekday(u8);

impl ClubWeekday {
    pub const SUNDAY: Self = Self(0);
    pub const MONDAY: Self = Self(1);
    pub const TUESDAY: Self = Self(2);
    pub const WEDNESDAY: Self = Self(3);
    pub const THURSDAY: Self = Self(4);
    pub const FRIDAY: Self = Self(5);
    pub const SATURDAY: Self = Self(6);

    /// Validate a raw weekday number.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidArgument` when `number` is outside `0..=6`.
    pub fn new(number: i64) -> Result<Self> {
        match u8::try_from(number) {
            Ok(n) if n <= 6 => Ok(Self(n)),
            _ => Err(ScheduleError::invalid(format!(
                "weekday must be between 0 (Sunday) and 6 (Saturday), got {number}"
            ))),
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn to_chrono(self) -> Weekday {
        match self.0 {
            0 => Weekday::Sun,
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            _ => Weekday::Sat,
        }
    }

    /// Two-letter RFC 5545 day code (`SU`, `MO`, ...).
    pub fn ical_code(self) -> &'static str {
        ["SU", "MO", "TU", "WE", "TH", "FR", "SA"][usize::from(self.0)]
    }
}

impl From<Weekday> for ClubWeekday {
    fn from(weekday: Weekday) -> Self {
        // num_days_from_sunday is always in 0..=6
        Self(weekday.num_days_from_sunday() as u8)
    }
}

impl TryFrom<i64> for ClubWeekday {
    type Error = ScheduleError;

    fn try_from(number: i64) -> Result<Self> {
        Self::new(number)
    }
}

impl From<ClubWeekday> for u8 {
    fn from(weekday: ClubWeekday) -> Self {
        weekday.0
    }
}

impl fmt::Display for ClubWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_chrono())
    }
}
