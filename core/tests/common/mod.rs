//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use wealthpulse_core::{
    clock::FixedClock,
    projector,
    record::{GrowthParameters, GrowthResult, RateBasis, SimulationPayload, SimulationRecord},
    types::Timestamp,
};

/// Route library logs through env_logger; honours RUST_LOG.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fixed reference instant for every test.
pub fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

pub fn clock_at(now: Timestamp) -> FixedClock {
    FixedClock::new(now)
}

pub fn params(initial: f64, contribution: f64, period_months: u32, modality: &str) -> GrowthParameters {
    GrowthParameters {
        initial_value:        initial,
        monthly_contribution: contribution,
        rate_percent:         10.0,
        rate_basis:           RateBasis::Annual,
        period_months,
        modality:             modality.to_string(),
    }
}

/// A compound-growth record whose result matches the projector.
pub fn growth_record(id: &str, created_at: Timestamp, parameters: GrowthParameters) -> SimulationRecord {
    let final_value = projector::project_parameters(&parameters);
    let total_invested = parameters.invested_value();
    SimulationRecord {
        id: id.to_string(),
        created_at,
        payload: SimulationPayload::CompoundGrowth {
            result: Some(GrowthResult {
                final_value,
                total_invested,
                total_interest: final_value - total_invested,
            }),
            parameters,
        },
    }
}

/// Same as `growth_record` but with no computed result.
pub fn pending_record(id: &str, created_at: Timestamp, parameters: GrowthParameters) -> SimulationRecord {
    SimulationRecord {
        id: id.to_string(),
        created_at,
        payload: SimulationPayload::CompoundGrowth { parameters, result: None },
    }
}

/// Records one day apart, ending at `end`, built from `f(index)`.
pub fn daily_history(
    n: usize,
    end: Timestamp,
    f: impl Fn(usize) -> GrowthParameters,
) -> Vec<SimulationRecord> {
    (0..n)
        .map(|i| {
            let created_at = end - Duration::days((n - 1 - i) as i64);
            growth_record(&format!("rec-{i:03}"), created_at, f(i))
        })
        .collect()
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
