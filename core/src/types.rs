//! Shared primitive types used across the analytics engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock instant. Every timestamp in the engine is UTC.
pub type Timestamp = DateTime<Utc>;

/// Identifier of a caller-owned simulation record.
pub type RecordId = String;

/// Stable identifier of a derived item (suggestion, alert, trend, achievement).
pub type ItemId = String;

/// `value`, or 0 when it is NaN or infinite. Finite inputs can still
/// overflow once summed or divided, and no derived figure carries that out.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Three-step scale shared by suggestion priority, impact level and alert urgency.
/// Declaration order is the sort order: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low    => "low",
            Self::Medium => "medium",
            Self::High   => "high",
        }
    }
}
