//! Volatility and stress scenarios for a compound-growth simulation.
//!
//! Volatility runs are Monte-Carlo over monthly returns drawn around the
//! simulation's own rate. Every draw comes from a seeded stream, so a
//! (parameters, scenario) pair always yields the same outcome.

use crate::{
    error::{AnalyticsError, AnalyticsResult},
    projector::{monthly_rate, project_parameters},
    record::GrowthParameters,
    rng::{RngBank, ScenarioRng, StreamSlot},
    types::finite_or_zero,
};
use serde::{Deserialize, Serialize};

pub const MAX_PATHS: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityScenario {
    /// Annualised standard deviation of returns, in percent.
    pub annual_volatility_percent: f64,
    pub paths: usize,
    pub seed:  u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Closed-form projection with no volatility.
    pub deterministic: f64,
    pub mean:  f64,
    pub p10:   f64,
    pub p50:   f64,
    pub p90:   f64,
    pub worst: f64,
    pub best:  f64,
}

impl VolatilityScenario {
    pub fn run(&self, params: &GrowthParameters) -> AnalyticsResult<ScenarioOutcome> {
        if !self.annual_volatility_percent.is_finite() || self.annual_volatility_percent < 0.0 {
            return Err(AnalyticsError::InvalidScenario(format!(
                "volatility must be a non-negative percent, got {}",
                self.annual_volatility_percent
            )));
        }
        if self.paths == 0 || self.paths > MAX_PATHS {
            return Err(AnalyticsError::InvalidScenario(format!(
                "paths must be within 1..={MAX_PATHS}, got {}",
                self.paths
            )));
        }

        let mut rng = RngBank::new(self.seed).for_stream(StreamSlot::Volatility);
        let base = monthly_rate(params.rate_percent, params.rate_basis);
        let sigma = self.annual_volatility_percent / 100.0 / 12f64.sqrt();

        let mut finals: Vec<f64> = (0..self.paths)
            .map(|_| simulate_path(params, base, sigma, &mut rng))
            .collect();
        finals.sort_by(f64::total_cmp);

        let mean = finite_or_zero(finals.iter().sum::<f64>() / finals.len() as f64);
        log::debug!(
            "volatility scenario: seed={} paths={} vol={:.1}% mean={mean:.2}",
            self.seed,
            self.paths,
            self.annual_volatility_percent
        );

        Ok(ScenarioOutcome {
            deterministic: project_parameters(params),
            mean,
            p10:   percentile(&finals, 10.0),
            p50:   percentile(&finals, 50.0),
            p90:   percentile(&finals, 90.0),
            worst: finals[0],
            best:  finals[finals.len() - 1],
        })
    }
}

/// One month-by-month path. The balance never goes below zero.
fn simulate_path(params: &GrowthParameters, base: f64, sigma: f64, rng: &mut ScenarioRng) -> f64 {
    let mut balance = params.initial_value;
    for _ in 0..params.period_months {
        let rate = base + sigma * rng.standard_normal();
        balance = (balance * (1.0 + rate)).max(0.0) + params.monthly_contribution;
    }
    balance
}

/// Nearest-rank percentile of a sorted, non-empty slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = (p / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressScenario {
    /// Month (1-based) at whose end the drawdown hits.
    pub shock_month:   u32,
    /// Share of the balance lost, in percent.
    pub shock_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressOutcome {
    pub baseline:     f64,
    pub stressed:     f64,
    pub loss:         f64,
    pub loss_percent: f64,
}

impl StressScenario {
    pub fn run(&self, params: &GrowthParameters) -> AnalyticsResult<StressOutcome> {
        if !(0.0..=100.0).contains(&self.shock_percent) {
            return Err(AnalyticsError::InvalidScenario(format!(
                "shock must be within 0..=100 percent, got {}",
                self.shock_percent
            )));
        }

        let rate = monthly_rate(params.rate_percent, params.rate_basis);
        let baseline = stepped_balance(params, rate, None);
        let balance = stepped_balance(params, rate, Some(self));
        let loss = baseline - balance;
        Ok(StressOutcome {
            baseline,
            stressed: balance,
            loss,
            loss_percent: if baseline > 0.0 { finite_or_zero(loss / baseline * 100.0) } else { 0.0 },
        })
    }
}

/// Month-by-month balance, optionally hit by a stress shock.
/// A shock month past the period never fires.
fn stepped_balance(params: &GrowthParameters, rate: f64, shock: Option<&StressScenario>) -> f64 {
    let mut balance = params.initial_value;
    for month in 1..=params.period_months {
        balance = balance * (1.0 + rate) + params.monthly_contribution;
        if let Some(shock) = shock.filter(|s| s.shock_month == month) {
            balance *= 1.0 - shock.shock_percent / 100.0;
        }
    }
    balance
}
