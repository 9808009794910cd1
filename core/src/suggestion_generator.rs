//! Suggestion generator — rule engine over the latest simulation.
//!
//! RULES (fixed order, order is the tie-break for capped slots):
//!   1. increase_contribution  — contribution < 1000, result present
//!   2. extend_period          — period < 60 months, result present
//!   3. reinforce_trend        — confident rising contribution trend
//!
//! Suggestion ids derive from the rule, never from time, so a
//! regenerated suggestion keeps the caller's viewed/applied flags.

use crate::{
    error::AnalyticsResult,
    projector,
    record::{GrowthParameters, SimulationRecord},
    rule::guarded,
    state::FlagsState,
    trend_detector::{MetricKind, TrendPattern},
    types::{ItemId, Level, RecordId},
};
use serde::{Deserialize, Serialize};

pub const CONTRIBUTION_CEILING: f64 = 1000.0;
pub const CONTRIBUTION_STEP: f64 = 1.5;
pub const CONTRIBUTION_CAP: f64 = 2000.0;
pub const PERIOD_CEILING: u32 = 60;
pub const PERIOD_STEP: u32 = 24;
pub const PERIOD_CAP: u32 = 120;
pub const TREND_CONFIDENCE_FLOOR: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    IncreaseContribution,
    ExtendPeriod,
    ReinforceTrend,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncreaseContribution => "increase_contribution",
            Self::ExtendPeriod         => "extend_period",
            Self::ReinforceTrend       => "reinforce_trend",
        }
    }

    /// Stable id of the suggestion this rule produces.
    pub fn suggestion_id(&self) -> ItemId {
        format!("suggestion-{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Contribution,
    TimeHorizon,
    Behavior,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionAction {
    pub description:         String,
    pub proposed_parameters: GrowthParameters,
    /// Final-value gain of the proposed parameters over the current ones.
    pub estimated_impact:    f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id:                 ItemId,
    pub kind:               SuggestionKind,
    pub title:              String,
    pub description:        String,
    pub impact_level:       Level,
    pub priority:           Level,
    pub category:           SuggestionCategory,
    pub actions:            Vec<SuggestionAction>,
    pub based_on_record_ids: Vec<RecordId>,
    pub viewed:             bool,
    pub applied:            bool,
}

impl Suggestion {
    /// Sum of the actions' estimated impacts.
    pub fn total_impact(&self) -> f64 {
        self.actions.iter().map(|a| a.estimated_impact).sum()
    }
}

/// Inputs every suggestion rule sees.
pub struct SuggestionContext<'a> {
    pub latest:         &'a SimulationRecord,
    pub trend_patterns: &'a [TrendPattern],
}

pub trait SuggestionRule: Send + Sync {
    fn kind(&self) -> SuggestionKind;

    fn evaluate(&self, ctx: &SuggestionContext<'_>) -> AnalyticsResult<Option<Suggestion>>;
}

struct IncreaseContribution;

impl SuggestionRule for IncreaseContribution {
    fn kind(&self) -> SuggestionKind { SuggestionKind::IncreaseContribution }

    fn evaluate(&self, ctx: &SuggestionContext<'_>) -> AnalyticsResult<Option<Suggestion>> {
        ctx.latest.validate()?;
        let Some(growth) = ctx.latest.growth() else { return Ok(None) };
        let current = growth.parameters.monthly_contribution;
        if growth.result.is_none() || current >= CONTRIBUTION_CEILING {
            return Ok(None);
        }

        let proposed_contribution = (current * CONTRIBUTION_STEP).min(CONTRIBUTION_CAP);
        let proposed = growth.parameters.with_contribution(proposed_contribution);
        let impact = projector::estimated_impact(growth.parameters, &proposed);

        Ok(Some(Suggestion {
            id:           self.kind().suggestion_id(),
            kind:         self.kind(),
            title:        "Increase your monthly contribution".into(),
            description:  format!(
                "Raising the monthly contribution from {current:.2} to {proposed_contribution:.2} \
                 adds about {impact:.2} to the projected final value."
            ),
            impact_level: Level::High,
            priority:     Level::High,
            category:     SuggestionCategory::Contribution,
            actions:      vec![SuggestionAction {
                description:         format!("Set monthly contribution to {proposed_contribution:.2}"),
                proposed_parameters: proposed,
                estimated_impact:    impact,
            }],
            based_on_record_ids: vec![ctx.latest.id.clone()],
            viewed:       false,
            applied:      false,
        }))
    }
}

struct ExtendPeriod;

impl SuggestionRule for ExtendPeriod {
    fn kind(&self) -> SuggestionKind { SuggestionKind::ExtendPeriod }

    fn evaluate(&self, ctx: &SuggestionContext<'_>) -> AnalyticsResult<Option<Suggestion>> {
        ctx.latest.validate()?;
        let Some(growth) = ctx.latest.growth() else { return Ok(None) };
        let current = growth.parameters.period_months;
        if growth.result.is_none() || current >= PERIOD_CEILING {
            return Ok(None);
        }

        let proposed_period = (current + PERIOD_STEP).min(PERIOD_CAP);
        let proposed = growth.parameters.with_period(proposed_period);
        let impact = projector::estimated_impact(growth.parameters, &proposed);

        Ok(Some(Suggestion {
            id:           self.kind().suggestion_id(),
            kind:         self.kind(),
            title:        "Extend your investment horizon".into(),
            description:  format!(
                "Staying invested for {proposed_period} months instead of {current} \
                 adds about {impact:.2} to the projected final value."
            ),
            impact_level: Level::Medium,
            priority:     Level::Medium,
            category:     SuggestionCategory::TimeHorizon,
            actions:      vec![SuggestionAction {
                description:         format!("Set the period to {proposed_period} months"),
                proposed_parameters: proposed,
                estimated_impact:    impact,
            }],
            based_on_record_ids: vec![ctx.latest.id.clone()],
            viewed:       false,
            applied:      false,
        }))
    }
}

struct ReinforceTrend;

impl SuggestionRule for ReinforceTrend {
    fn kind(&self) -> SuggestionKind { SuggestionKind::ReinforceTrend }

    fn evaluate(&self, ctx: &SuggestionContext<'_>) -> AnalyticsResult<Option<Suggestion>> {
        let rising = ctx.trend_patterns.iter().find(|p| {
            p.metric == MetricKind::MonthlyContribution
                && p.is_increasing()
                && p.confidence > TREND_CONFIDENCE_FLOOR
        });
        let Some(pattern) = rising else { return Ok(None) };

        Ok(Some(Suggestion {
            id:           self.kind().suggestion_id(),
            kind:         self.kind(),
            title:        "Keep growing your contributions".into(),
            description:  format!(
                "Your monthly contributions rose {:.1}% across {} simulations. Keep it up.",
                pattern.magnitude_percent, pattern.occurrence_count
            ),
            impact_level: Level::High,
            priority:     Level::Medium,
            category:     SuggestionCategory::Behavior,
            actions:      Vec::new(),
            based_on_record_ids: vec![ctx.latest.id.clone()],
            viewed:       false,
            applied:      false,
        }))
    }
}

pub struct SuggestionGenerator {
    rules: Vec<Box<dyn SuggestionRule>>,
}

impl Default for SuggestionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionGenerator {
    /// Generator with the built-in rules in their documented order.
    pub fn new() -> Self {
        let mut generator = Self { rules: Vec::new() };
        generator.register(Box::new(IncreaseContribution));
        generator.register(Box::new(ExtendPeriod));
        generator.register(Box::new(ReinforceTrend));
        generator
    }

    /// Append a rule. Later rules lose ties to earlier ones.
    pub fn register(&mut self, rule: Box<dyn SuggestionRule>) {
        self.rules.push(rule);
    }

    /// Evaluate every rule against `latest`, keep at most
    /// `max_per_kind` per kind, merge flags, then rank.
    pub fn generate(
        &self,
        latest: &SimulationRecord,
        trend_patterns: &[TrendPattern],
        previous_flags: &FlagsState,
        max_per_kind: usize,
    ) -> Vec<Suggestion> {
        let ctx = SuggestionContext { latest, trend_patterns };

        let mut kept: Vec<Suggestion> = Vec::new();
        for rule in &self.rules {
            let Some(mut suggestion) = guarded(rule.kind().as_str(), rule.evaluate(&ctx)) else {
                continue;
            };
            let same_kind = kept.iter().filter(|s| s.kind == suggestion.kind).count();
            if same_kind >= max_per_kind {
                log::debug!("suggestion {} dropped: kind cap {max_per_kind} reached", suggestion.id);
                continue;
            }
            let flags = previous_flags.suggestion(&suggestion.id);
            suggestion.viewed = flags.viewed;
            suggestion.applied = flags.applied;
            kept.push(suggestion);
        }

        rank(&mut kept);
        kept
    }
}

/// Priority desc, then impact level desc. Stable, so rule order breaks ties.
pub fn rank(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.impact_level.cmp(&a.impact_level))
    });
}
