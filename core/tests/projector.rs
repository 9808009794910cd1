//! Projector: closed-form compound growth and impact deltas.

use wealthpulse_core::{
    projector::{estimated_impact, monthly_rate, project, project_parameters},
    record::RateBasis,
};

mod common;
use common::{assert_close, params};

#[test]
fn zero_rate_is_linear() {
    assert_eq!(project(1000.0, 0.0, 0.0, 12), 1000.0);
    assert_eq!(project(1000.0, 100.0, 0.0, 12), 2200.0);
}

#[test]
fn closed_form_matches_month_by_month() {
    let rate = 0.01;
    let mut balance = 5_000.0;
    for _ in 0..36 {
        balance = balance * (1.0 + rate) + 250.0;
    }
    assert_close(project(5_000.0, 250.0, rate, 36), balance, 1e-6);
}

#[test]
fn zero_periods_returns_principal() {
    assert_eq!(project(1234.5, 300.0, 0.02, 0), 1234.5);
}

#[test]
fn annual_basis_converts_to_effective_monthly() {
    let monthly = monthly_rate(12.0, RateBasis::Annual);
    assert_close((1.0 + monthly).powi(12), 1.12, 1e-12);
    assert_eq!(monthly_rate(1.0, RateBasis::Monthly), 0.01);
}

#[test]
fn higher_contribution_has_positive_impact() {
    let original = params(1_000.0, 500.0, 12, "cdb");
    let proposed = original.with_contribution(750.0);
    let impact = estimated_impact(&original, &proposed);

    assert!(impact > 250.0 * 12.0, "impact should exceed the raw extra deposits: {impact}");
    assert_close(
        impact,
        project_parameters(&proposed) - project_parameters(&original),
        1e-9,
    );
}
