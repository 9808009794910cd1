//! Behavioral profiler — classifies how the user simulates.
//!
//! Classification is first-match over two averages:
//!   aggressive   avg period > 60 months and avg invested > 50 000
//!   moderate     avg period > 36 months and avg invested > 20 000
//!   conservative otherwise
//!
//! An empty history yields the fixed conservative default, never nothing.

use crate::{
    record::{growth_records, GrowthRecord, SimulationRecord},
    trend_detector::{detect_history_with, MetricKind},
    types::finite_or_zero,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Modalities needed for a full diversification score.
pub const DIVERSIFICATION_TARGET: f64 = 5.0;
pub const CONTRIBUTION_TENDENCY_THRESHOLD: f64 = 5.0;
pub const PERIOD_TENDENCY_THRESHOLD: f64 = 10.0;

pub const ONBOARDING_RECOMMENDATION: &str =
    "Run your first investment simulation to unlock personalized insights.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub fn classify(avg_period_months: f64, avg_invested_value: f64) -> Self {
        if avg_period_months > 60.0 && avg_invested_value > 50_000.0 {
            Self::Aggressive
        } else if avg_period_months > 36.0 && avg_invested_value > 20_000.0 {
            Self::Moderate
        } else {
            Self::Conservative
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Characteristics {
    /// Simulations per week over the history span.
    pub simulation_frequency:  f64,
    pub avg_invested_value:    f64,
    pub avg_period_months:     f64,
    pub diversification_score: f64,
    pub consistency_score:     f64,
    pub risk_tolerance:        f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tendencies {
    pub increasing_contributions: bool,
    pub extending_periods:        bool,
    pub diversifying_modalities:  bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralProfile {
    pub risk_profile:    RiskProfile,
    pub characteristics: Characteristics,
    pub tendencies:      Tendencies,
    pub recommendations: Vec<String>,
}

impl Default for BehavioralProfile {
    fn default() -> Self {
        Self {
            risk_profile:    RiskProfile::Conservative,
            characteristics: Characteristics::default(),
            tendencies:      Tendencies::default(),
            recommendations: vec![ONBOARDING_RECOMMENDATION.to_string()],
        }
    }
}

pub fn profile(history: &[SimulationRecord]) -> BehavioralProfile {
    let growth: Vec<GrowthRecord<'_>> = growth_records(history).collect();
    if growth.is_empty() {
        return BehavioralProfile::default();
    }

    let avg_invested_value = mean(
        growth
            .iter()
            .filter(|g| g.result.is_some())
            .map(|g| g.parameters.invested_value()),
    );
    let avg_period_months = mean(growth.iter().map(|g| g.parameters.period_months as f64));
    let diversification_score =
        (distinct_modalities(&growth) as f64 / DIVERSIFICATION_TARGET * 100.0).min(100.0);

    let characteristics = Characteristics {
        simulation_frequency: simulation_frequency(&growth),
        avg_invested_value,
        avg_period_months,
        diversification_score,
        consistency_score: consistency_score(&growth),
        risk_tolerance: risk_tolerance(avg_period_months, avg_invested_value),
    };

    let tendencies = Tendencies {
        increasing_contributions: rising(history, MetricKind::MonthlyContribution, CONTRIBUTION_TENDENCY_THRESHOLD),
        extending_periods:        rising(history, MetricKind::PeriodMonths, PERIOD_TENDENCY_THRESHOLD),
        diversifying_modalities:  diversifying(&growth),
    };

    let risk_profile = RiskProfile::classify(avg_period_months, avg_invested_value);
    log::debug!(
        "profile: {risk_profile:?} over {} simulations (period={avg_period_months:.1} invested={avg_invested_value:.2})",
        growth.len()
    );

    BehavioralProfile {
        risk_profile,
        recommendations: recommendations(&characteristics, &tendencies),
        characteristics,
        tendencies,
    }
}

fn recommendations(c: &Characteristics, t: &Tendencies) -> Vec<String> {
    let mut out = Vec::new();
    if c.diversification_score < 40.0 {
        out.push("Diversify across more investment modalities to spread risk.".to_string());
    }
    if !t.increasing_contributions {
        out.push("Raise your monthly contributions gradually, even by small amounts.".to_string());
    }
    if c.avg_period_months < 24.0 {
        out.push("Consider longer horizons; compounding pays off over years, not months.".to_string());
    }
    out
}

fn rising(history: &[SimulationRecord], metric: MetricKind, threshold: f64) -> bool {
    detect_history_with(history, metric, threshold).is_some_and(|p| p.is_increasing())
}

/// Arithmetic mean; 0 for no values or when the sum overflows.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 { 0.0 } else { finite_or_zero(sum / count as f64) }
}

fn distinct_modalities(growth: &[GrowthRecord<'_>]) -> usize {
    growth
        .iter()
        .map(|g| g.parameters.modality.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Records per week between the first and last simulation.
/// Spans shorter than a week count as one week.
fn simulation_frequency(growth: &[GrowthRecord<'_>]) -> f64 {
    let first = growth.iter().map(|g| g.record.created_at).min();
    let last = growth.iter().map(|g| g.record.created_at).max();
    let span_days = match (first, last) {
        (Some(first), Some(last)) => (last - first).num_seconds() as f64 / 86_400.0,
        _ => 0.0,
    };
    finite_or_zero(growth.len() as f64 / (span_days / 7.0).max(1.0))
}

/// 100 minus the coefficient of variation of the monthly contribution,
/// clamped to 0–100. One record is perfectly consistent; a zero mean, or
/// spread too large to represent, scores 0.
fn consistency_score(growth: &[GrowthRecord<'_>]) -> f64 {
    if growth.len() == 1 {
        return 100.0;
    }
    let values: Vec<f64> = growth.iter().map(|g| g.parameters.monthly_contribution).collect();
    let avg = mean(values.iter().copied());
    if avg <= 0.0 {
        return 0.0;
    }
    let squared: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    let cv = (squared / values.len() as f64).sqrt() / avg;
    if !cv.is_finite() {
        return 0.0;
    }
    (100.0 - cv * 100.0).clamp(0.0, 100.0)
}

fn risk_tolerance(avg_period_months: f64, avg_invested_value: f64) -> f64 {
    let horizon = avg_period_months / 120.0 * 50.0;
    let size = (avg_invested_value / 100_000.0).min(1.0) * 50.0;
    finite_or_zero((horizon + size).min(100.0))
}

/// The later half of the history uses more modalities than the earlier half.
fn diversifying(growth: &[GrowthRecord<'_>]) -> bool {
    if growth.len() < 2 {
        return false;
    }
    let (earlier, later) = growth.split_at(growth.len() / 2);
    distinct_modalities(later) > distinct_modalities(earlier)
}
