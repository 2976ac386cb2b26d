//! Choosing who gets a reminder before an event.
//!
//! A few days ahead of each event, guardians of children who have not answered
//! yet are nudged. This module only selects the (event, child) pairs; sending
//! the message is someone else's job.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attendance::AttendanceResponse;
use crate::error::Result;
use crate::roster::Roster;
use crate::store::{AttendanceStore, ChildId, EventFilter, EventId, EventRecord, EventStore};

pub const DEFAULT_REMINDER_DAYS_BEFORE: u64 = 2;

/// One reminder to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReminder {
    pub event_id: EventId,
    pub child_id: ChildId,
}

/// The day whose events are reminded about when running on `today`.
pub fn reminder_target_date(today: NaiveDate, days_before: u64) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(days_before))
}

/// Children concerned by `event` who have no answer, or only a pending one.
///
/// An explicit child selection on the event wins over the team roster.
pub fn children_awaiting_reply(
    event: &EventRecord,
    team_members: &[ChildId],
    responses: &[AttendanceResponse],
) -> Vec<ChildId> {
    let concerned = event
        .event
        .selected_children
        .as_deref()
        .unwrap_or(team_members);

    concerned
        .iter()
        .filter(|child| {
            !responses.iter().any(|response| {
                response.event_id == event.id
                    && response.child_id == **child
                    && response.status.is_final()
            })
        })
        .cloned()
        .collect()
}

/// Pair every event on `target` with the children still to remind.
///
/// Children whose guardian turned reminders off, or who are not on the roster,
/// are left out.
///
/// # Errors
/// Store failures are passed through.
pub fn plan_reminders<S: EventStore + AttendanceStore>(
    store: &S,
    target: NaiveDate,
    roster: &Roster,
) -> Result<Vec<PendingReminder>> {
    let events = store.query_events(&EventFilter {
        from: Some(target),
        to: Some(target),
        ..EventFilter::default()
    })?;
    let ids: Vec<EventId> = events.iter().map(|event| event.id).collect();
    let responses = store.attendance_for(&ids)?;

    let reminders: Vec<PendingReminder> = events
        .iter()
        .flat_map(|event| {
            let members = roster.team_members(&event.event.team_id);
            children_awaiting_reply(event, &members, &responses)
                .into_iter()
                .filter(move |child_id| roster.reminders_enabled(child_id))
                .map(move |child_id| PendingReminder {
                    event_id: event.id,
                    child_id,
                })
        })
        .collect();

    debug!(%target, events = events.len(), reminders = reminders.len(), "planned reminders");
    Ok(reminders)
}
