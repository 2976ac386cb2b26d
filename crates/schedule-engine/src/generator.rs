//! Recurrence expansion -- turns a weekly rule into the concrete occurrences it denotes.
//!
//! Expansion is a linear scan over the days of the policy window. Horizons are a
//! few hundred days at most, and stepping one day at a time keeps weekday
//! matching correct across month lengths and leap years without any modular
//! arithmetic. No timezone conversion happens here; see [`crate::dst`].

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::period::{PeriodPolicy, Window};
use crate::time_of_day::TimeOfDay;
use crate::weekday::ClubWeekday;

/// A weekly repetition rule, built per request and consumed by [`generate_occurrences`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceSpec {
    pub weekday: ClubWeekday,
    pub time_of_day: TimeOfDay,
    pub range_start: NaiveDate,
    #[serde(default)]
    pub range_end: Option<NaiveDate>,
    pub period: PeriodPolicy,
}

impl RecurrenceSpec {
    /// Build a spec from unvalidated request fields.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidArgument` for a weekday outside `0..=6` or a
    /// time that is not `HH:MM`.
    pub fn parse(
        weekday: i64,
        time_of_day: &str,
        range_start: NaiveDate,
        range_end: Option<NaiveDate>,
        period: PeriodPolicy,
    ) -> Result<Self> {
        Ok(Self {
            weekday: ClubWeekday::new(weekday)?,
            time_of_day: time_of_day.parse()?,
            range_start,
            range_end,
            period,
        })
    }

    pub fn window(&self) -> Result<Window> {
        self.period.window(self.range_start, self.range_end)
    }
}

/// One concrete local date and time produced by expanding a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Occurrence(NaiveDateTime);

impl Occurrence {
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    pub fn at(&self) -> NaiveDateTime {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn time(&self) -> NaiveTime {
        self.0.time()
    }

    pub fn weekday(&self) -> ClubWeekday {
        ClubWeekday::from(self.0.weekday())
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

/// Expand a weekly rule into its ordered occurrences.
///
/// Every returned occurrence falls on `spec.weekday` at `spec.time_of_day`, lies
/// inside the policy window, and the list is strictly ascending. An empty window
/// (end before start) or a window with no matching weekday yields an empty list.
///
/// # Errors
/// Returns `ScheduleError::InvalidArgument` if an explicit-range policy has no
/// end date. Nothing is returned on error.
pub fn generate_occurrences(spec: &RecurrenceSpec) -> Result<Vec<Occurrence>> {
    let window = spec.window()?;
    let target = spec.weekday.to_chrono();
    let time = spec.time_of_day.as_naive();

    let occurrences: Vec<Occurrence> = window
        .days()
        .filter(|day| day.weekday() == target)
        .map(|day| day.and_time(time))
        .filter(|at| window.contains(*at))
        .map(Occurrence)
        .collect();

    debug!(
        weekday = spec.weekday.number(),
        start = %window.start,
        end = %window.end,
        count = occurrences.len(),
        "expanded recurrence"
    );

    Ok(occurrences)
}
