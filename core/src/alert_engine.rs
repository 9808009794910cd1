//! Alert engine — goal, risk and opportunity notices.
//!
//! RULES (fixed order):
//!   1. goal_proximity      — latest final value in [80%, 100%) of the goal
//!   2. low_diversification — one modality, more than 5 simulations of any kind
//!   3. attractive_rate     — average projected return above 12%
//!
//! Alerts carry caller flags forward by id. An alert whose expiry has
//! passed is left out of the result; its flags stay with the caller.

use crate::{
    error::AnalyticsResult,
    metrics::{is_near_goal, HistoryMetrics},
    record::SimulationRecord,
    rule::guarded,
    state::FlagsState,
    types::{ItemId, Level, Timestamp},
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const LOW_DIVERSIFICATION_MIN_HISTORY: usize = 5;
pub const ATTRACTIVE_RETURN_PERCENT: f64 = 12.0;
pub const GOAL_ALERT_TTL_DAYS: i64 = 30;
pub const RATE_ALERT_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    GoalProximity,
    LowDiversification,
    AttractiveRate,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoalProximity      => "goal_proximity",
            Self::LowDiversification => "low_diversification",
            Self::AttractiveRate     => "attractive_rate",
        }
    }

    pub fn alert_id(&self) -> ItemId {
        format!("alert-{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    Goal,
    Risk,
    Opportunity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id:                 ItemId,
    pub kind:               AlertKind,
    pub title:              String,
    pub urgency:            Level,
    pub category:           AlertCategory,
    pub expires_at:         Option<Timestamp>,
    pub recommended_action: String,
    pub viewed:             bool,
    pub dismissed:          bool,
}

impl Alert {
    /// Expired once `now` reaches `expires_at`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

pub struct AlertContext<'a> {
    pub history:     &'a [SimulationRecord],
    pub metrics:     &'a HistoryMetrics,
    pub goal_amount: Option<f64>,
}

impl AlertContext<'_> {
    fn latest_created_at(&self) -> Option<Timestamp> {
        self.history.iter().map(|r| r.created_at).max()
    }
}

pub trait AlertRule: Send + Sync {
    fn kind(&self) -> AlertKind;

    fn evaluate(&self, ctx: &AlertContext<'_>) -> AnalyticsResult<Option<Alert>>;
}

fn alert(kind: AlertKind, title: String, urgency: Level, category: AlertCategory) -> Alert {
    Alert {
        id: kind.alert_id(),
        kind,
        title,
        urgency,
        category,
        expires_at: None,
        recommended_action: String::new(),
        viewed: false,
        dismissed: false,
    }
}

struct GoalProximity;

impl AlertRule for GoalProximity {
    fn kind(&self) -> AlertKind { AlertKind::GoalProximity }

    fn evaluate(&self, ctx: &AlertContext<'_>) -> AnalyticsResult<Option<Alert>> {
        let (Some(goal), Some(latest)) = (ctx.goal_amount, ctx.metrics.latest_final_value) else {
            return Ok(None);
        };
        if !is_near_goal(latest, goal) {
            return Ok(None);
        }
        let progress = latest / goal * 100.0;
        let mut notice = alert(
            self.kind(),
            format!("You are {progress:.1}% of the way to your goal"),
            Level::High,
            AlertCategory::Goal,
        );
        notice.expires_at = ctx
            .latest_created_at()
            .map(|at| at + Duration::days(GOAL_ALERT_TTL_DAYS));
        notice.recommended_action = format!(
            "Close the remaining {:.2} with a small contribution increase or a longer period.",
            goal - latest
        );
        Ok(Some(notice))
    }
}

struct LowDiversification;

impl AlertRule for LowDiversification {
    fn kind(&self) -> AlertKind { AlertKind::LowDiversification }

    fn evaluate(&self, ctx: &AlertContext<'_>) -> AnalyticsResult<Option<Alert>> {
        if ctx.metrics.distinct_modalities != 1
            || ctx.metrics.total_simulations <= LOW_DIVERSIFICATION_MIN_HISTORY
        {
            return Ok(None);
        }
        let mut notice = alert(
            self.kind(),
            "All your simulations use a single modality".into(),
            Level::Medium,
            AlertCategory::Risk,
        );
        notice.recommended_action =
            "Simulate other modalities to compare risk and return.".into();
        Ok(Some(notice))
    }
}

struct AttractiveRate;

impl AlertRule for AttractiveRate {
    fn kind(&self) -> AlertKind { AlertKind::AttractiveRate }

    fn evaluate(&self, ctx: &AlertContext<'_>) -> AnalyticsResult<Option<Alert>> {
        let avg = ctx.metrics.avg_projected_return;
        if avg <= ATTRACTIVE_RETURN_PERCENT {
            return Ok(None);
        }
        let mut notice = alert(
            self.kind(),
            format!("Your simulations project an average return of {avg:.1}%"),
            Level::Medium,
            AlertCategory::Opportunity,
        );
        notice.expires_at = ctx
            .latest_created_at()
            .map(|at| at + Duration::days(RATE_ALERT_TTL_DAYS));
        notice.recommended_action =
            "Check that the assumed rate is realistic before committing to it.".into();
        Ok(Some(notice))
    }
}

pub struct AlertEngine {
    rules: Vec<Box<dyn AlertRule>>,
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertEngine {
    pub fn new() -> Self {
        let mut engine = Self { rules: Vec::new() };
        engine.register(Box::new(GoalProximity));
        engine.register(Box::new(LowDiversification));
        engine.register(Box::new(AttractiveRate));
        engine
    }

    pub fn register(&mut self, rule: Box<dyn AlertRule>) {
        self.rules.push(rule);
    }

    pub fn generate(
        &self,
        history: &[SimulationRecord],
        metrics: &HistoryMetrics,
        goal_amount: Option<f64>,
        previous_flags: &FlagsState,
        now: Timestamp,
    ) -> Vec<Alert> {
        let ctx = AlertContext { history, metrics, goal_amount };

        self.rules
            .iter()
            .filter_map(|rule| guarded(rule.kind().as_str(), rule.evaluate(&ctx)))
            .filter(|a| {
                let expired = a.is_expired(now);
                if expired {
                    log::debug!("alert {} expired, left out", a.id);
                }
                !expired
            })
            .map(|mut a| {
                let flags = previous_flags.alert(&a.id);
                a.viewed = flags.viewed;
                a.dismissed = flags.dismissed;
                a
            })
            .collect()
    }
}
