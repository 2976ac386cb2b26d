//! DST handling when local occurrences are pinned to a timezone.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::generator::Occurrence;

/// Policy for occurrences whose wall-clock time does not exist (spring forward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop instances that fall in the DST gap (e.g., 2:30 AM during spring forward)
    Skip,
    /// Move the instance forward by the length of the gap
    #[default]
    ShiftForward,
}

/// Parse an IANA timezone name.
///
/// # Errors
/// Returns `ScheduleError::InvalidTimezone` if `name` is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| ScheduleError::InvalidTimezone(name.to_string()))
}

/// Resolve one local wall-clock time in `tz`.
///
/// Ambiguous times (fall back) take the earlier offset. Returns `None` only for a
/// gap under [`DstPolicy::Skip`].
pub fn resolve_local(at: NaiveDateTime, tz: Tz, policy: DstPolicy) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&at) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => shift_past_gap(at, tz),
        },
    }
}

/// Read a wall-clock time inside a gap with the offset in force before the
/// transition, which moves it forward by exactly the gap length (30 minutes on
/// Lord Howe, two hours at Troll).
fn shift_past_gap(at: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    let before = tz
        .offset_from_local_datetime(&(at - Duration::days(1)))
        .earliest()?;
    let utc = at - Duration::seconds(i64::from(before.fix().local_minus_utc()));
    Some(tz.from_utc_datetime(&utc))
}

/// Pin local occurrences to UTC instants in the named zone.
///
/// # Errors
/// Returns `ScheduleError::InvalidTimezone` if `timezone` is not a valid IANA identifier.
pub fn localize(
    occurrences: &[Occurrence],
    timezone: &str,
    policy: DstPolicy,
) -> Result<Vec<DateTime<Utc>>> {
    let tz = parse_timezone(timezone)?;
    Ok(occurrences
        .iter()
        .filter_map(|occurrence| resolve_local(occurrence.at(), tz, policy))
        .map(|dt| dt.with_timezone(&Utc))
        .collect())
}
