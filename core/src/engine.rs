//! The dashboard assembler — one pure pipeline, re-run on demand.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Window     newest `analysis_window` records, malformed ones skipped
//!   2. Metrics    aggregate return, modalities, goal proximity
//!   3. Trends     regression per metric, filtered by min_confidence
//!   4. Suggestions over the latest compound-growth record
//!   5. Alerts     unless disabled
//!   6. Profile    behavioral classification
//!   7. Score      achievements (full history) then points and level
//!   8. Summary    executive roll-up
//!
//! RULES:
//!   - The assembler holds no state between calls.
//!   - Caller flags are read, never written; unlocked achievements
//!     are only ever appended.
//!   - "Now" comes from the Clock, nowhere else.

use crate::{
    alert_engine::AlertEngine,
    behavior_profiler,
    clock::Clock,
    config::AnalyticsConfig,
    metrics::HistoryMetrics,
    record::SimulationRecord,
    score_engine,
    snapshot::{overall_score, DashboardSnapshot, ExecutiveSummary},
    state::DashboardState,
    suggestion_generator::SuggestionGenerator,
    trend_detector::{self, MetricKind, TrendPattern},
};
use std::borrow::Cow;

#[derive(Default)]
pub struct DashboardAssembler {
    suggestions: SuggestionGenerator,
    alerts:      AlertEngine,
}

impl DashboardAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build with custom generators (extra rules registered by the caller).
    pub fn with_generators(suggestions: SuggestionGenerator, alerts: AlertEngine) -> Self {
        Self { suggestions, alerts }
    }

    /// Recompute the dashboard. An absent history is treated as empty.
    pub fn recompute(
        &self,
        history: Option<&[SimulationRecord]>,
        config: &AnalyticsConfig,
        state: &mut DashboardState,
        clock: &dyn Clock,
    ) -> DashboardSnapshot {
        let now = clock.now();
        let history = history.unwrap_or(&[]);

        // 1. Window
        let window = analysis_window(history, config.analysis_window);

        // 2. Metrics
        let metrics = HistoryMetrics::compute(&window, config.goal_amount);

        // 3. Trends
        let trend_patterns: Vec<TrendPattern> = MetricKind::ALL
            .iter()
            .filter_map(|metric| trend_detector::detect_history(&window, *metric))
            .filter(|p| p.confidence >= config.min_confidence as f64)
            .collect();

        // 4. Suggestions
        let suggestions = match window.iter().rev().find(|r| r.growth().is_some()) {
            Some(latest) => self.suggestions.generate(
                latest,
                &trend_patterns,
                &state.flags,
                config.max_suggestions_per_kind,
            ),
            None => Vec::new(),
        };

        // 5. Alerts
        let alerts = if config.alerts_enabled {
            self.alerts
                .generate(&window, &metrics, config.goal_amount, &state.flags, now)
        } else {
            Vec::new()
        };

        // 6. Profile
        let behavioral_profile = behavior_profiler::profile(&window);

        // 7. Score
        let achievements = score_engine::update_achievements(history, &mut state.unlocked, now);
        let score = score_engine::score(history, &achievements);

        // 8. Summary
        let executive_summary = ExecutiveSummary {
            total_simulations:    history.len(),
            avg_projected_return: metrics.avg_projected_return,
            near_goals_count:     metrics.near_goals_count,
            opportunities_count:  suggestions.len(),
            overall_score:        overall_score(
                &score,
                behavioral_profile.characteristics.consistency_score,
                behavioral_profile.characteristics.diversification_score,
            ),
        };

        log::debug!(
            "recompute: records={} window={} trends={} suggestions={} alerts={} score={}",
            history.len(),
            window.len(),
            trend_patterns.len(),
            suggestions.len(),
            alerts.len(),
            score.total,
        );

        DashboardSnapshot {
            generated_at: now,
            trend_patterns,
            suggestions,
            alerts,
            behavioral_profile,
            achievements,
            score,
            executive_summary,
        }
    }
}

/// The newest `limit` records that pass validation, oldest first.
/// Borrows when nothing needs to be skipped.
fn analysis_window(history: &[SimulationRecord], limit: Option<usize>) -> Cow<'_, [SimulationRecord]> {
    let start = limit.map_or(0, |limit| history.len().saturating_sub(limit));
    let recent = &history[start..];

    let mut malformed = 0usize;
    for record in recent {
        if let Err(e) = record.validate() {
            log::warn!("skipping record in analysis: {e}");
            malformed += 1;
        }
    }
    if malformed == 0 {
        return Cow::Borrowed(recent);
    }
    Cow::Owned(
        recent
            .iter()
            .filter(|r| r.validate().is_ok())
            .cloned()
            .collect(),
    )
}
