//! Wall-clock time of day, written `HH:MM` on the wire.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// A validated hour/minute pair (seconds are always zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// # Errors
    /// Returns `ScheduleError::InvalidArgument` unless `hour` is in `0..=23` and
    /// `minute` in `0..=59`.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| {
                ScheduleError::invalid(format!("time of day {hour}:{minute:02} is out of range"))
            })
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    pub fn as_naive(self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    /// Accepts `H:MM` or `HH:MM`.
    fn from_str(s: &str) -> Result<Self> {
        let malformed = || ScheduleError::invalid(format!("invalid time of day '{s}', expected HH:MM"));

        let (hours, minutes) = s.trim().split_once(':').ok_or_else(malformed)?;
        let digits = |part: &str, max_len: usize| {
            (1..=max_len).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(hours, 2) || minutes.len() != 2 || !digits(minutes, 2) {
            return Err(malformed());
        }

        let hour: u32 = hours.parse().map_err(|_| malformed())?;
        let minute: u32 = minutes.parse().map_err(|_| malformed())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ScheduleError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}
