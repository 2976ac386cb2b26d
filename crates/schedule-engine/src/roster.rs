//! Children known to the club and the guardian settings that apply to them.
//!
//! Accounts live elsewhere; the engine only needs each child's team and whether
//! the guardian accepts reminders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::{ChildId, TeamId};

fn reminders_on() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildProfile {
    pub id: ChildId,
    pub team_id: TeamId,
    /// The primary guardian's reminder setting. On unless they opted out.
    #[serde(default = "reminders_on")]
    pub reminders_enabled: bool,
}

impl ChildProfile {
    pub fn new(id: ChildId, team_id: TeamId) -> Self {
        Self {
            id,
            team_id,
            reminders_enabled: true,
        }
    }

    pub fn with_reminders(mut self, enabled: bool) -> Self {
        self.reminders_enabled = enabled;
        self
    }
}

/// Lookup of children by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    children: BTreeMap<ChildId, ChildProfile>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a child.
    pub fn insert(&mut self, child: ChildProfile) {
        self.children.insert(child.id.clone(), child);
    }

    pub fn get(&self, id: &ChildId) -> Option<&ChildProfile> {
        self.children.get(id)
    }

    /// Children of `team`, ordered by id.
    pub fn team_members(&self, team: &TeamId) -> Vec<ChildId> {
        self.children
            .values()
            .filter(|child| child.team_id == *team)
            .map(|child| child.id.clone())
            .collect()
    }

    /// Unknown children get no reminders.
    pub fn reminders_enabled(&self, id: &ChildId) -> bool {
        self.get(id).is_some_and(|child| child.reminders_enabled)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl FromIterator<ChildProfile> for Roster {
    fn from_iter<I: IntoIterator<Item = ChildProfile>>(iter: I) -> Self {
        let mut roster = Self::new();
        for child in iter {
            roster.insert(child);
        }
        roster
    }
}
