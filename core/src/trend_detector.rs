//! Trend detection — least-squares regression over a metric series.
//!
//! A series is regressed against its index (0..n-1). The detected
//! variation is measured on the fitted line, not the raw endpoints,
//! so a single outlier at either end cannot fake a trend.

use crate::{
    record::{growth_records, GrowthParameters, SimulationRecord},
    types::{ItemId, Timestamp},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    InitialValue,
    MonthlyContribution,
    PeriodMonths,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [
        MetricKind::InitialValue,
        MetricKind::MonthlyContribution,
        MetricKind::PeriodMonths,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialValue        => "initial_value",
            Self::MonthlyContribution => "monthly_contribution",
            Self::PeriodMonths        => "period_months",
        }
    }

    /// Minimum |variation| (percent) for a trend on this metric to count.
    pub fn default_threshold(&self) -> f64 {
        match self {
            Self::InitialValue        => 5.0,
            Self::MonthlyContribution => 10.0,
            Self::PeriodMonths        => 15.0,
        }
    }

    pub fn value_of(&self, params: &GrowthParameters) -> f64 {
        match self {
            Self::InitialValue        => params.initial_value,
            Self::MonthlyContribution => params.monthly_contribution,
            Self::PeriodMonths        => params.period_months as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPattern {
    pub id:                ItemId,
    pub metric:            MetricKind,
    pub direction:         TrendDirection,
    pub magnitude_percent: f64,
    /// R² scaled to 0–100.
    pub confidence:        f64,
    pub occurrence_count:  usize,
    pub last_observed_at:  Option<Timestamp>,
}

impl TrendPattern {
    pub fn is_increasing(&self) -> bool {
        self.direction == TrendDirection::Increasing
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub slope:     f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl Regression {
    pub fn value_at(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }
}

/// Ordinary least squares of `series` against its index.
/// `None` for fewer than two points. A flat series has R² = 0.
pub fn linear_regression(series: &[f64]) -> Option<Regression> {
    let n = series.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean_x = (nf - 1.0) / 2.0;
    let mean_y = series.iter().sum::<f64>() / nf;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, y) in series.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
    }
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let intercept = mean_y - slope * mean_x;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (i, y) in series.iter().enumerate() {
        let fitted = intercept + slope * i as f64;
        ss_res += (y - fitted).powi(2);
        ss_tot += (y - mean_y).powi(2);
    }
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    Some(Regression { slope, intercept, r_squared })
}

/// Detect a trend in `series`. `threshold` is the minimum |variation| in percent.
/// A series with no variation never yields a pattern.
pub fn detect(series: &[f64], metric: MetricKind, threshold: f64) -> Option<TrendPattern> {
    let regression = linear_regression(series)?;
    let first = series[0];
    let last_index = series.len() - 1;

    let variation = if first == 0.0 {
        0.0
    } else {
        (regression.value_at(last_index) - regression.value_at(0)) / first * 100.0
    };
    if !variation.is_finite() || variation == 0.0 || variation.abs() < threshold {
        return None;
    }

    let confidence = if regression.r_squared.is_finite() {
        regression.r_squared.clamp(0.0, 1.0) * 100.0
    } else {
        0.0
    };

    Some(TrendPattern {
        id:                format!("trend-{}", metric.as_str()),
        metric,
        direction:         if variation > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        },
        magnitude_percent: variation.abs(),
        confidence,
        occurrence_count:  series.len(),
        last_observed_at:  None,
    })
}

/// The metric's values across the compound-growth records of `history`.
pub fn metric_series(history: &[SimulationRecord], metric: MetricKind) -> Vec<f64> {
    growth_records(history)
        .map(|g| metric.value_of(g.parameters))
        .collect()
}

/// Detect a trend over `history` using the metric's default threshold.
pub fn detect_history(history: &[SimulationRecord], metric: MetricKind) -> Option<TrendPattern> {
    detect_history_with(history, metric, metric.default_threshold())
}

pub fn detect_history_with(
    history: &[SimulationRecord],
    metric: MetricKind,
    threshold: f64,
) -> Option<TrendPattern> {
    let series = metric_series(history, metric);
    let mut pattern = detect(&series, metric, threshold)?;
    pattern.last_observed_at = growth_records(history).last().map(|g| g.record.created_at);
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_series_has_zero_fit() {
        let reg = linear_regression(&[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(reg.slope, 0.0);
        assert_eq!(reg.r_squared, 0.0);
    }

    #[test]
    fn single_point_has_no_regression() {
        assert!(linear_regression(&[1.0]).is_none());
    }
}
