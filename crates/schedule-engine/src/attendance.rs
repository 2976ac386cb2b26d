//! Guardians' answers to "will your child be there?".
//!
//! One answer is kept per (event, child); answering again replaces it. Only
//! children of the event's team may answer, and counts ignore anyone else.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::roster::Roster;
use crate::store::{AttendanceStore, ChildId, EventId, EventStore, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    #[default]
    Pending,
}

impl AttendanceStatus {
    /// Present or absent. Pending is not an answer.
    pub fn is_final(self) -> bool {
        self != Self::Pending
    }
}

/// A guardian's answer for one child and one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub event_id: EventId,
    pub child_id: ChildId,
    #[serde(default)]
    pub status: AttendanceStatus,
    #[serde(default)]
    pub comment: String,
}

impl AttendanceResponse {
    pub fn new(event_id: EventId, child_id: ChildId, status: AttendanceStatus) -> Self {
        Self {
            event_id,
            child_id,
            status,
            comment: String::new(),
        }
    }
}

/// Store `response`, replacing any earlier answer for the same event and child.
///
/// # Errors
/// - `ScheduleError::EventNotFound` if the event does not exist
/// - `ScheduleError::ChildNotFound` if the child is not on the roster
/// - `ScheduleError::ChildNotInTeam` if the child plays in another team
pub fn record_attendance<S: EventStore + AttendanceStore>(
    store: &mut S,
    roster: &Roster,
    response: AttendanceResponse,
) -> Result<AttendanceResponse> {
    let event = store
        .get_event(response.event_id)?
        .ok_or(ScheduleError::EventNotFound(response.event_id))?;
    let child = roster
        .get(&response.child_id)
        .ok_or_else(|| ScheduleError::ChildNotFound(response.child_id.clone()))?;

    if child.team_id != event.event.team_id {
        return Err(ScheduleError::ChildNotInTeam {
            child: child.id.clone(),
            team: event.event.team_id,
        });
    }

    debug!(
        event = %response.event_id,
        child = %response.child_id,
        status = ?response.status,
        "recording attendance"
    );
    store.upsert_attendance(response)
}

/// Number of present or absent answers per event.
///
/// Every requested id gets an entry, zero when nobody answered. Answers from
/// children missing from the roster or outside the event's team are not
/// counted, and each child counts once. An event that no longer exists has no
/// team to check against.
///
/// # Errors
/// Store failures are passed through.
pub fn attendance_counts<S: EventStore + AttendanceStore>(
    store: &S,
    roster: &Roster,
    event_ids: &[EventId],
) -> Result<BTreeMap<EventId, usize>> {
    let mut counts: BTreeMap<EventId, usize> = event_ids.iter().map(|id| (*id, 0)).collect();

    let mut teams: HashMap<EventId, Option<TeamId>> = HashMap::new();
    for id in event_ids {
        let team = store.get_event(*id)?.map(|record| record.event.team_id);
        teams.insert(*id, team);
    }

    let mut seen: BTreeSet<(EventId, ChildId)> = BTreeSet::new();
    for response in store.attendance_for(event_ids)? {
        if !response.status.is_final() {
            continue;
        }
        let Some(child) = roster.get(&response.child_id) else {
            continue;
        };
        let event_team = teams.get(&response.event_id).and_then(Option::as_ref);
        if event_team.is_some_and(|team| *team != child.team_id) {
            continue;
        }
        if seen.insert((response.event_id, response.child_id)) {
            if let Some(count) = counts.get_mut(&response.event_id) {
                *count += 1;
            }
        }
    }

    Ok(counts)
}
