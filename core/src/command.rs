use crate::config::ConfigPatch;
use crate::types::ItemId;
use serde::{Deserialize, Serialize};

/// All caller-issued state mutations.
/// None of them triggers a recompute on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DashboardCommand {
    // ── Suggestions ───────────────────────────────
    MarkSuggestionViewed { id: ItemId },
    MarkSuggestionApplied { id: ItemId },

    // ── Alerts ────────────────────────────────────
    MarkAlertViewed { id: ItemId },
    DismissAlert { id: ItemId },

    // ── Configuration ─────────────────────────────
    UpdateConfiguration { patch: ConfigPatch },
}
