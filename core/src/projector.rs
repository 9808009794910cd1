//! Financial projector — compound growth with monthly contributions.
//!
//! Pure functions, no state. Every impact figure in the engine is a
//! difference of two projections.

use crate::record::{GrowthParameters, RateBasis};

/// Future value of `principal` plus `monthly_contribution` paid at the end
/// of each of `periods` months, compounding at `monthly_rate`.
///
/// `FV = P(1+r)^n + C((1+r)^n - 1)/r`, and `P + C·n` when `r == 0`.
/// A non-finite result resolves to 0.
pub fn project(principal: f64, monthly_contribution: f64, monthly_rate: f64, periods: u32) -> f64 {
    let n = periods as f64;
    let value = if monthly_rate == 0.0 {
        principal + monthly_contribution * n
    } else {
        let growth = (1.0 + monthly_rate).powf(n);
        principal * growth + monthly_contribution * ((growth - 1.0) / monthly_rate)
    };
    if value.is_finite() { value } else { 0.0 }
}

/// Monthly rate (as a fraction) for a percentage on the given basis.
/// Annual rates convert to the equivalent effective monthly rate.
pub fn monthly_rate(rate_percent: f64, basis: RateBasis) -> f64 {
    let rate = rate_percent / 100.0;
    match basis {
        RateBasis::Monthly => rate,
        RateBasis::Annual  => (1.0 + rate).powf(1.0 / 12.0) - 1.0,
    }
}

pub fn project_parameters(params: &GrowthParameters) -> f64 {
    project(
        params.initial_value,
        params.monthly_contribution,
        monthly_rate(params.rate_percent, params.rate_basis),
        params.period_months,
    )
}

/// Final-value gain of `proposed` over `original`.
pub fn estimated_impact(original: &GrowthParameters, proposed: &GrowthParameters) -> f64 {
    project_parameters(proposed) - project_parameters(original)
}
