//! Tests for recording and counting guardians' answers.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use schedule_engine::schedule::CustomEventRequest;
use schedule_engine::store::{ChildId, EventId, EventRecord, TeamId};
use schedule_engine::{
    attendance_counts, create_custom_event, delete_event, record_attendance, AttendanceResponse,
    AttendanceStatus, AttendanceStore, ChildProfile, DeleteScope, EventKind, MemoryStore, Roster,
    ScheduleError,
};

fn child(id: &str) -> ChildId {
    ChildId(id.to_string())
}

fn team(id: &str) -> TeamId {
    TeamId(id.to_string())
}

fn roster() -> Roster {
    [
        ChildProfile::new(child("ana"), team("u11")),
        ChildProfile::new(child("ben"), team("u11")),
        ChildProfile::new(child("cleo"), team("u11")),
        ChildProfile::new(child("zoe"), team("u13")),
    ]
    .into_iter()
    .collect()
}

fn add_event(store: &mut MemoryStore, team_id: &str, day: u32) -> EventRecord {
    create_custom_event(
        store,
        &CustomEventRequest {
            kind: EventKind::Match,
            date: NaiveDate::from_ymd_opt(2024, 9, day).unwrap(),
            time: "10:00".to_string(),
            end_time: None,
            location: "Stadium".to_string(),
            team_id: team(team_id),
            selected_children_ids: None,
        },
    )
    .unwrap()
}

fn answer(event: &EventRecord, child_id: &str, status: AttendanceStatus) -> AttendanceResponse {
    AttendanceResponse::new(event.id, child(child_id), status)
}

// ---------------------------------------------------------------------------
// record_attendance
// ---------------------------------------------------------------------------

#[test]
fn answering_again_replaces_the_answer() {
    let mut store = MemoryStore::new();
    let roster = roster();
    let event = add_event(&mut store, "u11", 14);

    record_attendance(&mut store, &roster, answer(&event, "ana", AttendanceStatus::Present))
        .unwrap();
    let mut changed = answer(&event, "ana", AttendanceStatus::Absent);
    changed.comment = "Sick".to_string();
    record_attendance(&mut store, &roster, changed.clone()).unwrap();

    assert_eq!(store.attendance_for(&[event.id]).unwrap(), vec![changed]);
}

#[test]
fn child_from_another_team_is_rejected() {
    let mut store = MemoryStore::new();
    let event = add_event(&mut store, "u11", 14);

    let err = record_attendance(&mut store, &roster(), answer(&event, "zoe", AttendanceStatus::Present))
        .unwrap_err();
    assert_eq!(
        err,
        ScheduleError::ChildNotInTeam {
            child: child("zoe"),
            team: team("u11"),
        }
    );
    assert!(store.attendance_for(&[event.id]).unwrap().is_empty());
}

#[test]
fn unknown_child_or_event_is_rejected() {
    let mut store = MemoryStore::new();
    let roster = roster();
    let event = add_event(&mut store, "u11", 14);

    let err = record_attendance(&mut store, &roster, answer(&event, "ghost", AttendanceStatus::Present))
        .unwrap_err();
    assert_eq!(err, ScheduleError::ChildNotFound(child("ghost")));

    let missing = AttendanceResponse::new(EventId(999), child("ana"), AttendanceStatus::Present);
    let err = record_attendance(&mut store, &roster, missing).unwrap_err();
    assert_eq!(err, ScheduleError::EventNotFound(EventId(999)));
}

#[test]
fn response_json_uses_front_end_names() {
    let json = r#"{"eventId": 3, "childId": "ana", "status": "absent"}"#;
    let parsed: AttendanceResponse = serde_json::from_str(json).unwrap();
    assert_eq!(
        parsed,
        AttendanceResponse::new(EventId(3), child("ana"), AttendanceStatus::Absent)
    );

    let defaulted: AttendanceResponse =
        serde_json::from_str(r#"{"eventId": 3, "childId": "ana"}"#).unwrap();
    assert_eq!(defaulted.status, AttendanceStatus::Pending);
}

// ---------------------------------------------------------------------------
// attendance_counts
// ---------------------------------------------------------------------------

#[test]
fn counts_final_answers_per_event() {
    let mut store = MemoryStore::new();
    let roster = roster();
    let saturday = add_event(&mut store, "u11", 14);
    let sunday = add_event(&mut store, "u11", 15);
    let quiet = add_event(&mut store, "u13", 15);

    for (event, name, status) in [
        (&saturday, "ana", AttendanceStatus::Present),
        (&saturday, "ben", AttendanceStatus::Absent),
        (&saturday, "cleo", AttendanceStatus::Pending),
        (&sunday, "ana", AttendanceStatus::Absent),
    ] {
        record_attendance(&mut store, &roster, answer(event, name, status)).unwrap();
    }

    let counts = attendance_counts(&store, &roster, &[saturday.id, sunday.id, quiet.id]).unwrap();
    assert_eq!(
        counts,
        BTreeMap::from([(saturday.id, 2), (sunday.id, 1), (quiet.id, 0)])
    );
}

#[test]
fn child_who_changed_team_is_not_counted() {
    let mut store = MemoryStore::new();
    let mut roster = roster();
    let event = add_event(&mut store, "u11", 14);
    record_attendance(&mut store, &roster, answer(&event, "ana", AttendanceStatus::Present))
        .unwrap();
    record_attendance(&mut store, &roster, answer(&event, "ben", AttendanceStatus::Present))
        .unwrap();

    roster.insert(ChildProfile::new(child("ana"), team("u13")));

    let counts = attendance_counts(&store, &roster, &[event.id]).unwrap();
    assert_eq!(counts[&event.id], 1);
}

#[test]
fn deleting_an_event_drops_its_answers() {
    let mut store = MemoryStore::new();
    let roster = roster();
    let event = add_event(&mut store, "u11", 14);
    record_attendance(&mut store, &roster, answer(&event, "ana", AttendanceStatus::Present))
        .unwrap();

    delete_event(&mut store, event.id, DeleteScope::This).unwrap();

    assert!(store.attendance_for(&[event.id]).unwrap().is_empty());
    let counts = attendance_counts(&store, &roster, &[event.id]).unwrap();
    assert_eq!(counts[&event.id], 0);
}
