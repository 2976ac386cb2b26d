//! RFC 5545 export of weekly rules.
//!
//! A [`RecurrenceSpec`] maps onto `FREQ=WEEKLY;BYDAY=xx;UNTIL=...` anchored on the
//! first matching day of its window. Calendar clients can import the block, and
//! [`expand_with_rrule`] expands it with the `rrule` crate so the linear scan in
//! [`crate::generator`] can be checked against an independent implementation.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rrule::RRuleSet;

use crate::error::{Result, ScheduleError};
use crate::generator::RecurrenceSpec;
use crate::period::Window;

const ICAL_FORMAT: &str = "%Y%m%dT%H%M%S";

/// First day in `window` falling on the spec's weekday, if any.
fn first_matching_day(spec: &RecurrenceSpec, window: &Window) -> Option<NaiveDate> {
    if window.is_empty() {
        return None;
    }
    let target = spec.weekday.to_chrono().num_days_from_sunday();
    let current = window.start.weekday().num_days_from_sunday();
    let offset = (7 + target - current) % 7;
    let first = window.start + Duration::days(i64::from(offset));
    (first <= window.end).then_some(first)
}

/// Render the rule as a `DTSTART` + `RRULE` block with floating times pinned to UTC.
///
/// Returns `Ok(None)` when the window contains no matching day, since RFC 5545
/// has no way to express an empty recurrence.
///
/// # Errors
/// Returns `ScheduleError::InvalidArgument` for the same inputs
/// [`generate_occurrences`](crate::generate_occurrences) rejects.
pub fn to_rrule(spec: &RecurrenceSpec) -> Result<Option<String>> {
    let window = spec.window()?;
    let Some(first) = first_matching_day(spec, &window) else {
        return Ok(None);
    };

    let dtstart = first.and_time(spec.time_of_day.as_naive());
    let until = window.end.and_time(last_second());

    // The rrule crate requires UNTIL in UTC when DTSTART is pinned to UTC.
    Ok(Some(format!(
        "DTSTART;TZID=UTC:{}\nRRULE:FREQ=WEEKLY;BYDAY={};UNTIL={}Z",
        dtstart.format(ICAL_FORMAT),
        spec.weekday.ical_code(),
        until.format(ICAL_FORMAT),
    )))
}

/// Expand the rule through the `rrule` crate instead of the day scan.
///
/// # Errors
/// Returns `ScheduleError::InvalidArgument` for invalid specs and
/// `ScheduleError::InvalidRule` if the rendered block is rejected by `rrule`.
pub fn expand_with_rrule(spec: &RecurrenceSpec) -> Result<Vec<NaiveDateTime>> {
    let Some(text) = to_rrule(spec)? else {
        return Ok(Vec::new());
    };

    let rrule_set: RRuleSet = text
        .parse()
        .map_err(|e| ScheduleError::InvalidRule(format!("{}", e)))?;

    let window = spec.window()?;
    // One instance per week plus slack; caps the expansion like `.all` requires.
    let weeks = (window.end - window.start).num_days() / 7 + 2;
    let limit = u16::try_from(weeks).unwrap_or(u16::MAX);

    Ok(rrule_set
        .all(limit)
        .dates
        .into_iter()
        .map(|dt| dt.with_timezone(&Utc).naive_utc())
        .collect())
}

fn last_second() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}
