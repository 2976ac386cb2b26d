//! Tests for pinning local occurrences to a timezone.

use chrono::{NaiveDate, TimeZone, Utc};
use schedule_engine::{
    generate_occurrences, localize, DstPolicy, Occurrence, PeriodPolicy, RecurrenceSpec,
    ScheduleError,
};

fn sundays_at(time: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> Vec<Occurrence> {
    let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let spec = RecurrenceSpec::parse(
        0,
        time,
        date(start),
        Some(date(end)),
        PeriodPolicy::ExplicitRange,
    )
    .unwrap();
    generate_occurrences(&spec).unwrap()
}

#[test]
fn offset_changes_with_summer_time() {
    // Paris: 10:00 CET is 09:00 UTC, 10:00 CEST is 08:00 UTC. Switch on 2024-03-31.
    let occurrences = sundays_at("10:00", (2024, 3, 24), (2024, 3, 31));
    let instants = localize(&occurrences, "Europe/Paris", DstPolicy::default()).unwrap();

    assert_eq!(
        instants,
        vec![
            Utc.with_ymd_and_hms(2024, 3, 24, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 31, 8, 0, 0).unwrap(),
        ]
    );
}

#[test]
fn gap_is_shifted_forward_by_default() {
    // 02:30 does not exist in Paris on 2024-03-31; it becomes 03:30 CEST = 01:30 UTC.
    let occurrences = sundays_at("02:30", (2024, 3, 31), (2024, 3, 31));
    let instants = localize(&occurrences, "Europe/Paris", DstPolicy::ShiftForward).unwrap();

    assert_eq!(instants, vec![Utc.with_ymd_and_hms(2024, 3, 31, 1, 30, 0).unwrap()]);
}

#[test]
fn gap_is_dropped_under_skip() {
    let occurrences = sundays_at("02:30", (2024, 3, 24), (2024, 4, 7));
    let instants = localize(&occurrences, "Europe/Paris", DstPolicy::Skip).unwrap();

    assert_eq!(
        instants,
        vec![
            Utc.with_ymd_and_hms(2024, 3, 24, 1, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 7, 0, 30, 0).unwrap(),
        ]
    );
}

#[test]
fn ambiguous_time_takes_earlier_offset() {
    // 02:30 happens twice in Paris on 2024-10-27; the first is CEST (UTC+2).
    let occurrences = sundays_at("02:30", (2024, 10, 27), (2024, 10, 27));
    let instants = localize(&occurrences, "Europe/Paris", DstPolicy::Skip).unwrap();

    assert_eq!(instants, vec![Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap()]);
}

#[test]
fn unknown_timezone_is_rejected() {
    let occurrences = sundays_at("10:00", (2024, 3, 24), (2024, 3, 31));
    let err = localize(&occurrences, "Mars/Olympus_Mons", DstPolicy::default()).unwrap_err();
    assert_eq!(err, ScheduleError::InvalidTimezone("Mars/Olympus_Mons".to_string()));
}

#[test]
fn half_hour_gap_shifts_by_half_an_hour() {
    // Lord Howe goes from +10:30 to +11:00 at 02:00 on 2024-10-06; 02:10 reads as 02:40.
    let occurrences = sundays_at("02:10", (2024, 10, 6), (2024, 10, 6));
    let instants = localize(&occurrences, "Australia/Lord_Howe", DstPolicy::ShiftForward).unwrap();

    assert_eq!(instants, vec![Utc.with_ymd_and_hms(2024, 10, 5, 15, 40, 0).unwrap()]);
}

#[test]
fn two_hour_gap_keeps_the_occurrence() {
    // Troll jumps from +00 to +02 at 01:00 on 2024-03-31; 01:30 reads as 03:30.
    let occurrences = sundays_at("01:30", (2024, 3, 31), (2024, 3, 31));
    let instants = localize(&occurrences, "Antarctica/Troll", DstPolicy::ShiftForward).unwrap();

    assert_eq!(instants, vec![Utc.with_ymd_and_hms(2024, 3, 31, 1, 30, 0).unwrap()]);
}
