//! Property-based tests for recurrence expansion using proptest.
//!
//! These tests verify invariants that should hold for *any* valid rule, not just
//! the specific examples in `generator_tests.rs`.

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;
use schedule_engine::ical::expand_with_rrule;
use schedule_engine::{generate_occurrences, Occurrence, PeriodPolicy, RecurrenceSpec};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_weekday() -> impl Strategy<Value = i64> {
    0i64..=6
}

fn arb_time() -> impl Strategy<Value = String> {
    (0u32..=23, 0u32..=59).prop_map(|(h, m)| format!("{:02}:{:02}", h, m))
}

/// Generate a range start in the 2023-2027 range.
/// Day is capped at 28 to avoid invalid month/day combos.
fn arb_start() -> impl Strategy<Value = NaiveDate> {
    (2023i32..=2027, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Range length in days; negative lengths produce end-before-start ranges.
fn arb_span() -> impl Strategy<Value = i64> {
    -10i64..=400
}

fn arb_policy() -> impl Strategy<Value = PeriodPolicy> {
    prop_oneof![
        Just(PeriodPolicy::MonthOf),
        Just(PeriodPolicy::ExplicitRange),
        Just(PeriodPolicy::rolling()),
        (0u32..=12).prop_map(|m| PeriodPolicy::RollingWindow {
            horizon_months: Some(m)
        }),
    ]
}

fn arb_spec() -> impl Strategy<Value = RecurrenceSpec> {
    (arb_weekday(), arb_time(), arb_start(), arb_span(), arb_policy()).prop_map(
        |(weekday, time, start, span, policy)| {
            RecurrenceSpec::parse(
                weekday,
                &time,
                start,
                Some(start + Duration::days(span)),
                policy,
            )
            .unwrap()
        },
    )
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Every occurrence falls on the requested weekday at the requested time
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn occurrences_match_weekday_and_time(spec in arb_spec()) {
        let occurrences = generate_occurrences(&spec).unwrap();
        for o in &occurrences {
            prop_assert_eq!(o.weekday(), spec.weekday, "{} is on the wrong day", o);
            prop_assert_eq!(o.time(), spec.time_of_day.as_naive(), "{} is at the wrong time", o);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Every occurrence lies inside the effective window
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn occurrences_within_window(spec in arb_spec()) {
        let window = spec.window().unwrap();
        let occurrences = generate_occurrences(&spec).unwrap();
        for o in &occurrences {
            prop_assert!(
                window.start <= o.date() && o.date() <= window.end,
                "{} outside {}..={}",
                o,
                window.start,
                window.end
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Strictly ascending, hence no duplicates
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn occurrences_strictly_ascending(spec in arb_spec()) {
        let occurrences = generate_occurrences(&spec).unwrap();
        for pair in occurrences.windows(2) {
            prop_assert!(pair[0] < pair[1], "{} not before {}", pair[0], pair[1]);
            prop_assert_eq!(pair[1].at() - pair[0].at(), Duration::weeks(1));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Expansion is deterministic
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn expansion_is_deterministic(spec in arb_spec()) {
        prop_assert_eq!(generate_occurrences(&spec).unwrap(), generate_occurrences(&spec).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Property 5: No matching day in the window is missed
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn no_matching_day_is_missed(spec in arb_spec()) {
        let window = spec.window().unwrap();
        let occurrences = generate_occurrences(&spec).unwrap();
        let expected = window
            .days()
            .filter(|d| d.weekday() == spec.weekday.to_chrono())
            .count();
        prop_assert_eq!(occurrences.len(), expected);
    }
}

// ---------------------------------------------------------------------------
// Property 6: Month policy stays inside the start's month
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn month_policy_stays_in_month(
        weekday in arb_weekday(),
        time in arb_time(),
        start in arb_start(),
    ) {
        let spec = RecurrenceSpec::parse(weekday, &time, start, None, PeriodPolicy::MonthOf).unwrap();
        let occurrences = generate_occurrences(&spec).unwrap();
        prop_assert!(!occurrences.is_empty() || start.day() > 21);
        for o in &occurrences {
            prop_assert_eq!((o.date().year(), o.date().month()), (start.year(), start.month()));
            prop_assert!(o.date() >= start);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 7: Every policy agrees with the rrule crate's RFC 5545 expansion
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn expansion_matches_rrule(spec in arb_spec()) {
        let ours: Vec<_> = generate_occurrences(&spec)
            .unwrap()
            .iter()
            .map(Occurrence::at)
            .collect();
        let theirs = expand_with_rrule(&spec).unwrap();
        prop_assert_eq!(ours, theirs, "{:?}", spec.period);
    }
}

// ---------------------------------------------------------------------------
// Property 8: Month-end clamping and long horizons agree with rrule
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn month_end_rolling_windows_match_rrule(
        weekday in arb_weekday(),
        time in arb_time(),
        year in 2023i32..=2027,
        month in 1u32..=12,
        horizon in 0u32..=24,
    ) {
        // Starting on the 31st (or the month's last day) exercises the clamp.
        let start = (28..=31)
            .rev()
            .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
            .unwrap();
        let spec = RecurrenceSpec::parse(
            weekday,
            &time,
            start,
            None,
            PeriodPolicy::RollingWindow { horizon_months: Some(horizon) },
        )
        .unwrap();

        let ours: Vec<_> = generate_occurrences(&spec)
            .unwrap()
            .iter()
            .map(Occurrence::at)
            .collect();
        prop_assert_eq!(ours, expand_with_rrule(&spec).unwrap());
    }
}
