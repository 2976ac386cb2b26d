//! Persistence seam for rules and events.
//!
//! The engine never talks to a database directly. Scheduling and deletion go
//! through [`EventStore`]; [`MemoryStore`] is the in-process implementation used
//! by the CLI and tests.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::attendance::AttendanceResponse;
use crate::error::Result;
use crate::schedule::{EventDraft, RuleDraft};

/// Opaque team reference owned by the account system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

/// Opaque child reference owned by the account system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildId(pub String);

/// Shared by every event generated from one recurrence request for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored recurring rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringRule {
    pub id: RuleId,
    #[serde(flatten)]
    pub rule: RuleDraft,
}

/// A stored event: one occurrence of a rule, or a one-off custom event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    #[serde(flatten)]
    pub event: EventDraft,
}

/// Selection criteria for [`EventStore::query_events`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub team_id: Option<TeamId>,
    pub rule_id: Option<RuleId>,
    /// Only events starting strictly after this instant.
    pub starts_after: Option<NaiveDateTime>,
    /// Inclusive first day.
    pub from: Option<NaiveDate>,
    /// Inclusive last day.
    pub to: Option<NaiveDate>,
}

impl EventFilter {
    pub fn matches(&self, event: &EventDraft) -> bool {
        let day = event.starts_at.date();
        self.team_id.as_ref().is_none_or(|team| *team == event.team_id)
            && self.rule_id.is_none_or(|rule| event.rule_id == Some(rule))
            && self.starts_after.is_none_or(|after| event.starts_at > after)
            && self.from.is_none_or(|from| day >= from)
            && self.to.is_none_or(|to| day <= to)
    }
}

pub trait EventStore {
    fn insert_rule(&mut self, rule: RuleDraft) -> Result<RecurringRule>;

    fn insert_event(&mut self, event: EventDraft) -> Result<EventRecord>;

    fn get_event(&self, id: EventId) -> Result<Option<EventRecord>>;

    /// Remove the given events and their attendance answers, returning how many
    /// events existed.
    fn remove_events(&mut self, ids: &[EventId]) -> Result<usize>;

    /// Matching events ordered by start time, then id.
    fn query_events(&self, filter: &EventFilter) -> Result<Vec<EventRecord>>;
}

/// Guardians' answers, at most one per (event, child).
pub trait AttendanceStore {
    /// Insert the answer, replacing any earlier one for the same event and child.
    fn upsert_attendance(&mut self, response: AttendanceResponse) -> Result<AttendanceResponse>;

    /// Answers for the given events, ordered by event then child.
    fn attendance_for(&self, event_ids: &[EventId]) -> Result<Vec<AttendanceResponse>>;
}

/// Ordered in-memory store with sequential ids.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rules: BTreeMap<RuleId, RecurringRule>,
    events: BTreeMap<EventId, EventRecord>,
    attendance: BTreeMap<(EventId, ChildId), AttendanceResponse>,
    next_rule: u64,
    next_event: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> impl Iterator<Item = &RecurringRule> {
        self.rules.values()
    }

    pub fn rule(&self, id: RuleId) -> Option<&RecurringRule> {
        self.rules.get(&id)
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

impl EventStore for MemoryStore {
    fn insert_rule(&mut self, rule: RuleDraft) -> Result<RecurringRule> {
        self.next_rule += 1;
        let stored = RecurringRule {
            id: RuleId(self.next_rule),
            rule,
        };
        self.rules.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn insert_event(&mut self, event: EventDraft) -> Result<EventRecord> {
        self.next_event += 1;
        let stored = EventRecord {
            id: EventId(self.next_event),
            event,
        };
        self.events.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn get_event(&self, id: EventId) -> Result<Option<EventRecord>> {
        Ok(self.events.get(&id).cloned())
    }

    fn remove_events(&mut self, ids: &[EventId]) -> Result<usize> {
        let removed: BTreeSet<EventId> = ids
            .iter()
            .copied()
            .filter(|id| self.events.remove(id).is_some())
            .collect();
        self.attendance
            .retain(|(event_id, _), _| !removed.contains(event_id));
        Ok(removed.len())
    }

    fn query_events(&self, filter: &EventFilter) -> Result<Vec<EventRecord>> {
        let mut found: Vec<EventRecord> = self
            .events
            .values()
            .filter(|record| filter.matches(&record.event))
            .cloned()
            .collect();
        found.sort_by_key(|record| (record.event.starts_at, record.id));
        Ok(found)
    }
}

impl AttendanceStore for MemoryStore {
    fn upsert_attendance(&mut self, response: AttendanceResponse) -> Result<AttendanceResponse> {
        let key = (response.event_id, response.child_id.clone());
        self.attendance.insert(key, response.clone());
        Ok(response)
    }

    fn attendance_for(&self, event_ids: &[EventId]) -> Result<Vec<AttendanceResponse>> {
        let wanted: BTreeSet<EventId> = event_ids.iter().copied().collect();
        Ok(self
            .attendance
            .iter()
            .filter(|((event_id, _), _)| wanted.contains(event_id))
            .map(|(_, response)| response.clone())
            .collect())
    }
}
