//! Scheduling endpoint contract: turn a recurrence request into stored rules and
//! events, create one-off events, and delete occurrences.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ScheduleError};
use crate::generator::{generate_occurrences, RecurrenceSpec};
use crate::period::PeriodPolicy;
use crate::store::{ChildId, EventFilter, EventId, EventRecord, EventStore, RecurringRule, RuleId, TeamId};
use crate::time_of_day::TimeOfDay;
use crate::weekday::ClubWeekday;

/// What a scheduled slot is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Training,
    Match,
    Tournament,
}

/// Period names as the front end sends them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Monthly,
    Seasonal,
    Continuous,
}

impl PeriodType {
    pub fn policy(self, horizon_months: Option<u32>) -> PeriodPolicy {
        match self {
            Self::Monthly => PeriodPolicy::MonthOf,
            Self::Seasonal => PeriodPolicy::ExplicitRange,
            Self::Continuous => PeriodPolicy::RollingWindow { horizon_months },
        }
    }
}

/// Body of a "create recurring events" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRequest {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub day_of_week: i64,
    pub time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    /// Single-team form, used when `team_ids` is empty.
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub team_ids: Vec<TeamId>,
    pub location: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub period_type: PeriodType,
    #[serde(default)]
    pub horizon_months: Option<u32>,
    #[serde(default)]
    pub selected_children_ids: Option<Vec<ChildId>>,
}

impl RecurrenceRequest {
    /// # Errors
    /// Returns `ScheduleError::InvalidArgument` if `json` does not describe a request.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ScheduleError::invalid(format!("malformed recurrence request: {e}")))
    }

    /// Teams to schedule, preferring `teamIds` over the single `teamId`.
    pub fn teams(&self) -> Vec<TeamId> {
        if self.team_ids.is_empty() {
            self.team_id.iter().cloned().collect()
        } else {
            self.team_ids.clone()
        }
    }

    pub fn spec(&self) -> Result<RecurrenceSpec> {
        RecurrenceSpec::parse(
            self.day_of_week,
            &self.time,
            self.start_date,
            self.end_date,
            self.period_type.policy(self.horizon_months),
        )
    }
}

/// A recurring rule before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    pub kind: EventKind,
    pub weekday: ClubWeekday,
    pub time: TimeOfDay,
    pub end_time: Option<TimeOfDay>,
    pub team_id: TeamId,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub period: PeriodPolicy,
    /// `None` means the whole team.
    pub selected_children: Option<Vec<ChildId>>,
}

/// An event before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub kind: EventKind,
    pub starts_at: NaiveDateTime,
    pub end_time: Option<TimeOfDay>,
    pub location: String,
    pub team_id: TeamId,
    pub rule_id: Option<RuleId>,
    /// Edited after being generated from its rule.
    pub is_exception: bool,
    pub is_custom: bool,
    /// `None` means the whole team.
    pub selected_children: Option<Vec<ChildId>>,
}

/// Result of [`schedule_recurrence`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub rules: Vec<RecurringRule>,
    pub events_created: usize,
}

fn require_location(location: &str) -> Result<String> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err(ScheduleError::invalid("a location is required"));
    }
    Ok(trimmed.to_string())
}

fn parse_end_time(end_time: Option<&str>) -> Result<Option<TimeOfDay>> {
    end_time
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<TimeOfDay>)
        .transpose()
}

fn selection(children: Option<&Vec<ChildId>>) -> Option<Vec<ChildId>> {
    children.filter(|ids| !ids.is_empty()).cloned()
}

/// Expand a recurrence request and persist one rule per team plus one event per
/// occurrence, each stamped with its rule id.
///
/// All validation and expansion happens before the first write, so an invalid
/// request leaves the store untouched.
///
/// # Errors
/// Returns `ScheduleError::InvalidArgument` for a request with no team, a blank
/// location, a bad end time, or anything [`generate_occurrences`] rejects.
/// Store failures are passed through.
pub fn schedule_recurrence<S: EventStore>(
    store: &mut S,
    request: &RecurrenceRequest,
) -> Result<ScheduleSummary> {
    let teams = request.teams();
    if teams.is_empty() {
        return Err(ScheduleError::invalid("at least one team is required"));
    }
    let location = require_location(&request.location)?;
    let end_time = parse_end_time(request.end_time.as_deref())?;
    let spec = request.spec()?;
    let occurrences = generate_occurrences(&spec)?;
    let selected_children = selection(request.selected_children_ids.as_ref());

    debug!(
        teams = teams.len(),
        occurrences = occurrences.len(),
        "scheduling recurrence"
    );

    let mut rules = Vec::with_capacity(teams.len());
    let mut events_created = 0;

    for team_id in teams {
        let rule = store.insert_rule(RuleDraft {
            kind: request.kind,
            weekday: spec.weekday,
            time: spec.time_of_day,
            end_time,
            team_id: team_id.clone(),
            location: location.clone(),
            start_date: spec.range_start,
            end_date: spec.range_end,
            period: spec.period,
            selected_children: selected_children.clone(),
        })?;

        for occurrence in &occurrences {
            store.insert_event(EventDraft {
                kind: request.kind,
                starts_at: occurrence.at(),
                end_time,
                location: location.clone(),
                team_id: team_id.clone(),
                rule_id: Some(rule.id),
                is_exception: false,
                is_custom: false,
                selected_children: selected_children.clone(),
            })?;
        }
        events_created += occurrences.len();

        info!(rule = %rule.id, team = %team_id.0, events = occurrences.len(), "stored recurring rule");
        rules.push(rule);
    }

    Ok(ScheduleSummary {
        rules,
        events_created,
    })
}

/// Body of a "create one event" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomEventRequest {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    pub location: String,
    pub team_id: TeamId,
    #[serde(default)]
    pub selected_children_ids: Option<Vec<ChildId>>,
}

/// Store a one-off event that belongs to no rule.
///
/// # Errors
/// Returns `ScheduleError::InvalidArgument` for a bad time, end time or blank location.
pub fn create_custom_event<S: EventStore>(
    store: &mut S,
    request: &CustomEventRequest,
) -> Result<EventRecord> {
    let time: TimeOfDay = request.time.parse()?;
    let record = store.insert_event(EventDraft {
        kind: request.kind,
        starts_at: request.date.and_time(time.as_naive()),
        end_time: parse_end_time(request.end_time.as_deref())?,
        location: require_location(&request.location)?,
        team_id: request.team_id.clone(),
        rule_id: None,
        is_exception: false,
        is_custom: true,
        selected_children: selection(request.selected_children_ids.as_ref()),
    })?;
    info!(event = %record.id, "stored custom event");
    Ok(record)
}

/// How much of a series a deletion covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteScope {
    /// Only the addressed event.
    #[default]
    This,
    /// The addressed event and every later event of the same rule.
    Future,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted: usize,
    /// The scope actually applied; `Future` on a one-off event degrades to `This`.
    pub scope: DeleteScope,
}

/// Delete one event, or it and all later events sharing its rule id.
///
/// "Later" compares start times, not positions in the series, so events moved
/// by hand are still caught.
///
/// # Errors
/// Returns `ScheduleError::EventNotFound` if `id` is unknown.
pub fn delete_event<S: EventStore>(
    store: &mut S,
    id: EventId,
    scope: DeleteScope,
) -> Result<DeleteOutcome> {
    let record = store.get_event(id)?.ok_or(ScheduleError::EventNotFound(id))?;

    let rule_id = match (scope, record.event.rule_id) {
        (DeleteScope::Future, Some(rule_id)) => rule_id,
        _ => {
            let deleted = store.remove_events(&[id])?;
            info!(event = %id, "deleted single event");
            return Ok(DeleteOutcome {
                deleted,
                scope: DeleteScope::This,
            });
        }
    };

    let later = store.query_events(&EventFilter {
        rule_id: Some(rule_id),
        starts_after: Some(record.event.starts_at),
        ..EventFilter::default()
    })?;
    let mut ids: Vec<EventId> = vec![id];
    ids.extend(later.iter().map(|event| event.id));

    let deleted = store.remove_events(&ids)?;
    info!(event = %id, rule = %rule_id, deleted, "deleted event and following occurrences");
    Ok(DeleteOutcome {
        deleted,
        scope: DeleteScope::Future,
    })
}

/// Events between two days inclusive, optionally for one team, ordered by start.
///
/// # Errors
/// Store failures are passed through.
pub fn events_in_range<S: EventStore>(
    store: &S,
    team_id: Option<&TeamId>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<EventRecord>> {
    store.query_events(&EventFilter {
        team_id: team_id.cloned(),
        from: Some(from),
        to: Some(to),
        ..EventFilter::default()
    })
}
