//! Display helpers for notifications and listings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schedule::EventKind;
use crate::time_of_day::TimeOfDay;

/// A club-defined display name for an event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeLabel {
    /// The kind's wire name, e.g. `"training"`.
    pub key: String,
    pub label: String,
}

impl EventKind {
    /// Wire name, as stored on events.
    pub fn key(self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Match => "match",
            Self::Tournament => "tournament",
        }
    }

    /// Built-in label, used when the club has not renamed the kind.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::Training => "Entraînement",
            Self::Match => "Match",
            Self::Tournament => "Tournoi",
        }
    }

    /// The club's label for this kind if it defined one, else the built-in label.
    pub fn label(self, custom: &[EventTypeLabel]) -> &str {
        custom
            .iter()
            .find(|entry| entry.key == self.key())
            .map_or(self.default_label(), |entry| entry.label.as_str())
    }
}

/// `dd/mm/yyyy`
pub fn format_event_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `dd/mm/yyyy à HH:MM`
pub fn format_event_date_time(date: NaiveDate, time: TimeOfDay) -> String {
    format!("{} à {}", format_event_date(date), time)
}
