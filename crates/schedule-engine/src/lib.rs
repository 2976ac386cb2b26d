//! # schedule-engine
//!
//! Weekly recurrence expansion for a youth sports club's practice and match calendar.
//!
//! Educators describe a slot once ("Mondays at 18:00 for the season") and the
//! engine expands it into the concrete occurrences that get stored as events.
//! Expansion is a pure local-calendar computation; pinning the results to a
//! timezone is a separate, optional step.
//!
//! ## Modules
//!
//! - [`generator`] — `RecurrenceSpec` → ordered list of `Occurrence`s
//! - [`period`] — period policies (month, explicit range, rolling horizon) and their windows
//! - [`weekday`] / [`time_of_day`] — validated input values (0 = Sunday numbering)
//! - [`dst`] — localize occurrences to an IANA zone with a DST gap policy
//! - [`ical`] — RFC 5545 export and cross-expansion through the `rrule` crate
//! - [`schedule`] — request → stored rules and events, one-off events, scoped deletion
//! - [`store`] — `EventStore` persistence seam and the in-memory store
//! - [`attendance`] — record guardians' answers and count them per event
//! - [`roster`] — children, their team and their guardian's reminder setting
//! - [`reminder`] — select children whose guardians have not replied yet
//! - [`format`] — display helpers
//! - [`error`] — Error types

pub mod attendance;
pub mod dst;
pub mod error;
pub mod format;
pub mod generator;
pub mod ical;
pub mod period;
pub mod reminder;
pub mod roster;
pub mod schedule;
pub mod store;
pub mod time_of_day;
pub mod weekday;

pub use attendance::{attendance_counts, record_attendance, AttendanceResponse, AttendanceStatus};
pub use dst::{localize, DstPolicy};
pub use error::ScheduleError;
pub use generator::{generate_occurrences, Occurrence, RecurrenceSpec};
pub use period::{PeriodPolicy, Window, DEFAULT_HORIZON_MONTHS};
pub use roster::{ChildProfile, Roster};
pub use schedule::{
    create_custom_event, delete_event, events_in_range, schedule_recurrence, DeleteOutcome,
    DeleteScope, EventKind, RecurrenceRequest,
};
pub use store::{AttendanceStore, EventStore, MemoryStore};
pub use time_of_day::TimeOfDay;
pub use weekday::ClubWeekday;
