//! TrendDetector: regression, thresholds and degenerate series.

use chrono::Duration;
use wealthpulse_core::trend_detector::{
    detect, detect_history, linear_regression, MetricKind, TrendDirection,
};

mod common;
use common::{assert_close, daily_history, params, t0};

#[test]
fn linear_contribution_series_is_fully_confident() {
    let series = [100.0, 150.0, 200.0, 250.0, 300.0];
    let pattern = detect(&series, MetricKind::MonthlyContribution, 10.0)
        .expect("a 200% rise must clear the 10% threshold");

    assert_eq!(pattern.direction, TrendDirection::Increasing);
    assert_close(pattern.confidence, 100.0, 1e-9);
    assert_close(pattern.magnitude_percent, 200.0, 1e-9);
    assert_eq!(pattern.occurrence_count, 5);
    assert_eq!(pattern.id, "trend-monthly_contribution");
}

#[test]
fn constant_series_never_yields_a_pattern() {
    let series = [500.0; 6];
    for threshold in [0.0, 5.0, 50.0] {
        assert!(
            detect(&series, MetricKind::InitialValue, threshold).is_none(),
            "flat series produced a pattern at threshold {threshold}"
        );
    }
}

#[test]
fn decreasing_series_reports_direction() {
    let series = [1200.0, 1000.0, 800.0, 600.0];
    let pattern = detect(&series, MetricKind::InitialValue, 5.0).unwrap();
    assert_eq!(pattern.direction, TrendDirection::Decreasing);
    assert_close(pattern.magnitude_percent, 50.0, 1e-9);
}

#[test]
fn variation_below_threshold_is_ignored() {
    // Fitted line moves 1000 -> 1080: 8%, under the 15% period threshold.
    let series = [1000.0, 1040.0, 1080.0];
    assert!(detect(&series, MetricKind::PeriodMonths, 15.0).is_none());
    assert!(detect(&series, MetricKind::InitialValue, 5.0).is_some());
}

#[test]
fn short_series_yields_nothing() {
    assert!(detect(&[], MetricKind::InitialValue, 0.0).is_none());
    assert!(detect(&[42.0], MetricKind::InitialValue, 0.0).is_none());
}

#[test]
fn zero_first_value_resolves_to_no_variation() {
    let series = [0.0, 100.0, 200.0];
    assert!(detect(&series, MetricKind::MonthlyContribution, 0.0).is_none());
}

#[test]
fn noisy_series_has_partial_confidence() {
    let series = [100.0, 180.0, 140.0, 260.0, 220.0];
    let reg = linear_regression(&series).unwrap();
    assert!(reg.r_squared > 0.0 && reg.r_squared < 1.0);

    let pattern = detect(&series, MetricKind::MonthlyContribution, 10.0).unwrap();
    assert!(pattern.confidence > 0.0 && pattern.confidence < 100.0);
}

#[test]
fn history_detection_stamps_last_observation() {
    let end = t0();
    let history = daily_history(4, end, |i| params(1_000.0, 100.0 + 50.0 * i as f64, 12, "cdb"));

    let pattern = detect_history(&history, MetricKind::MonthlyContribution).unwrap();
    assert_eq!(pattern.last_observed_at, Some(end));
    assert_eq!(history[0].created_at, end - Duration::days(3));

    // Initial value never moved.
    assert!(detect_history(&history, MetricKind::InitialValue).is_none());
}
