//! Caller-owned state carried between recomputes.
//!
//! The engine keeps nothing between calls. UI flags and unlocked
//! achievements live here, keyed by the stable item id, and the
//! caller hands them back on the next recompute.

use crate::types::{ItemId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionFlags {
    pub viewed:  bool,
    pub applied: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertFlags {
    pub viewed:    bool,
    pub dismissed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagsState {
    pub suggestions: BTreeMap<ItemId, SuggestionFlags>,
    pub alerts:      BTreeMap<ItemId, AlertFlags>,
}

impl FlagsState {
    pub fn suggestion(&self, id: &str) -> SuggestionFlags {
        self.suggestions.get(id).copied().unwrap_or_default()
    }

    pub fn alert(&self, id: &str) -> AlertFlags {
        self.alerts.get(id).copied().unwrap_or_default()
    }

    pub fn mark_suggestion_viewed(&mut self, id: &str) {
        self.suggestions.entry(id.to_string()).or_default().viewed = true;
    }

    /// Applying a suggestion implies it was seen.
    pub fn mark_suggestion_applied(&mut self, id: &str) {
        let flags = self.suggestions.entry(id.to_string()).or_default();
        flags.viewed = true;
        flags.applied = true;
    }

    pub fn mark_alert_viewed(&mut self, id: &str) {
        self.alerts.entry(id.to_string()).or_default().viewed = true;
    }

    pub fn dismiss_alert(&mut self, id: &str) {
        self.alerts.entry(id.to_string()).or_default().dismissed = true;
    }
}

/// Achievement id → unlock instant. Entries are only ever added.
pub type UnlockedSet = BTreeMap<ItemId, Timestamp>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardState {
    pub flags:    FlagsState,
    pub unlocked: UnlockedSet,
}
