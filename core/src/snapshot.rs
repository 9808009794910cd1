//! Dashboard snapshot — the immutable output of one recompute.
//!
//! A snapshot is rebuilt from scratch on every recompute. Only the
//! caller-held flags and unlocked achievements survive between calls.

use crate::{
    alert_engine::Alert,
    behavior_profiler::BehavioralProfile,
    score_engine::{Achievement, UserScore},
    suggestion_generator::Suggestion,
    trend_detector::TrendPattern,
    types::Timestamp,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub total_simulations:    usize,
    pub avg_projected_return: f64,
    pub near_goals_count:     usize,
    pub opportunities_count:  usize,
    /// 0–100 blend of score, consistency and diversification.
    pub overall_score:        f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at:       Timestamp,
    pub trend_patterns:     Vec<TrendPattern>,
    pub suggestions:        Vec<Suggestion>,
    pub alerts:             Vec<Alert>,
    pub behavioral_profile: BehavioralProfile,
    pub achievements:       Vec<Achievement>,
    pub score:              UserScore,
    pub executive_summary:  ExecutiveSummary,
}

impl DashboardSnapshot {
    /// Alerts the user has not dismissed.
    pub fn active_alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| !a.dismissed)
    }

    pub fn suggestion(&self, id: &str) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.id == id)
    }

    pub fn alert(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }
}

/// `min(100, total/10 + 0.2·consistency + 0.1·diversification)`.
pub fn overall_score(score: &UserScore, consistency_score: f64, diversification_score: f64) -> f64 {
    let blended = score.total as f64 / 10.0 + 0.2 * consistency_score + 0.1 * diversification_score;
    if blended.is_finite() { blended.min(100.0) } else { 0.0 }
}
