//! Error types for schedule-engine operations.

use thiserror::Error;

use crate::store::{ChildId, EventId, TeamId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Structurally invalid input: weekday, time of day, missing end date, blank field.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),

    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    #[error("Child not found: {0}")]
    ChildNotFound(ChildId),

    /// An answer was given for a child outside the event's team.
    #[error("Child {child} is not in team {team}")]
    ChildNotInTeam { child: ChildId, team: TeamId },

    /// Raised by [`EventStore`](crate::store::EventStore) backends.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ScheduleError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
