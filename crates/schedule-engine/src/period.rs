//! Period policies and the date window each one expands over.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Horizon used by [`PeriodPolicy::RollingWindow`] when none is given.
pub const DEFAULT_HORIZON_MONTHS: u32 = 6;

/// How far a weekly rule expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodPolicy {
    /// The calendar month containing the range start, from the start onwards.
    #[serde(alias = "monthly")]
    MonthOf,
    /// The caller's start and end dates. The end date is required.
    #[serde(alias = "seasonal")]
    ExplicitRange,
    /// From the range start for `horizon_months` months; any end date is ignored.
    #[serde(alias = "continuous")]
    RollingWindow {
        #[serde(default)]
        horizon_months: Option<u32>,
    },
}

impl PeriodPolicy {
    pub fn rolling() -> Self {
        Self::RollingWindow {
            horizon_months: None,
        }
    }

    /// Compute the inclusive date window this policy covers.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidArgument` if an explicit range has no end
    /// date, or if the window end cannot be represented.
    pub fn window(self, range_start: NaiveDate, range_end: Option<NaiveDate>) -> Result<Window> {
        let end = match self {
            Self::MonthOf => {
                let month_end = last_day_of_month(range_start).ok_or_else(|| {
                    ScheduleError::invalid(format!("no month end for {range_start}"))
                })?;
                range_end.map_or(month_end, |end| end.min(month_end))
            }
            Self::ExplicitRange => range_end.ok_or_else(|| {
                ScheduleError::invalid("an explicit-range recurrence must have an end date")
            })?,
            Self::RollingWindow { horizon_months } => {
                let months = horizon_months.unwrap_or(DEFAULT_HORIZON_MONTHS);
                range_start
                    .checked_add_months(Months::new(months))
                    .ok_or_else(|| {
                        ScheduleError::invalid(format!(
                            "a {months}-month horizon from {range_start} overflows the calendar"
                        ))
                    })?
            }
        };

        Ok(Window {
            start: range_start,
            end,
        })
    }
}

/// An inclusive range of calendar days. `end < start` means empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Every day of the window in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    /// Whether a local instant falls between the first day's midnight and the
    /// last day's end.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start.and_time(NaiveTime::MIN) && at.date() <= self.end
    }
}

/// Last calendar day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}
