//! Simulation records — the caller-owned history the engine reads.
//!
//! RULE: The engine never mutates a record.
//! Each simulation kind is its own variant; analytics narrow to
//! compound-growth records through `SimulationRecord::growth()`.

use crate::{
    error::{AnalyticsError, AnalyticsResult},
    types::{finite_or_zero, RecordId, Timestamp},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBasis {
    Monthly,
    Annual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthParameters {
    pub initial_value:        f64,
    pub monthly_contribution: f64,
    pub rate_percent:         f64,
    pub rate_basis:           RateBasis,
    pub period_months:        u32,
    /// Investment modality label ("cdb", "treasury", "index_fund", ...).
    pub modality:             String,
}

impl GrowthParameters {
    pub fn with_contribution(&self, monthly_contribution: f64) -> Self {
        Self { monthly_contribution, ..self.clone() }
    }

    pub fn with_period(&self, period_months: u32) -> Self {
        Self { period_months, ..self.clone() }
    }

    /// Principal plus every scheduled contribution.
    pub fn invested_value(&self) -> f64 {
        self.initial_value + self.monthly_contribution * self.period_months as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthResult {
    pub final_value:    f64,
    pub total_invested: f64,
    pub total_interest: f64,
}

impl GrowthResult {
    /// Interest as a percentage of the amount invested; 0 when nothing was
    /// invested or the ratio overflows.
    pub fn return_percent(&self) -> f64 {
        if self.total_invested > 0.0 {
            finite_or_zero(self.total_interest / self.total_invested * 100.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulationPayload {
    CompoundGrowth {
        parameters: GrowthParameters,
        #[serde(default)]
        result: Option<GrowthResult>,
    },
    DebtPayoff {
        balance:         f64,
        monthly_payment: f64,
        rate_percent:    f64,
        #[serde(default)]
        months_to_payoff: Option<u32>,
    },
    BudgetSplit {
        monthly_income: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub id:         RecordId,
    pub created_at: Timestamp,
    pub payload:    SimulationPayload,
}

/// Borrowed view of a compound-growth record.
#[derive(Debug, Clone, Copy)]
pub struct GrowthRecord<'a> {
    pub record:     &'a SimulationRecord,
    pub parameters: &'a GrowthParameters,
    pub result:     Option<&'a GrowthResult>,
}

impl SimulationRecord {
    pub fn growth(&self) -> Option<GrowthRecord<'_>> {
        match &self.payload {
            SimulationPayload::CompoundGrowth { parameters, result } => Some(GrowthRecord {
                record: self,
                parameters,
                result: result.as_ref(),
            }),
            _ => None,
        }
    }

    /// Reject records whose numbers cannot feed the analytics.
    pub fn validate(&self) -> AnalyticsResult<()> {
        let amounts: Vec<(&str, f64)> = match &self.payload {
            SimulationPayload::CompoundGrowth { parameters, result } => {
                if !parameters.rate_percent.is_finite() || parameters.rate_percent <= -100.0 {
                    return Err(self.malformed(format!(
                        "rate_percent out of range: {}",
                        parameters.rate_percent
                    )));
                }
                let mut amounts = vec![
                    ("initial_value", parameters.initial_value),
                    ("monthly_contribution", parameters.monthly_contribution),
                ];
                if let Some(result) = result {
                    amounts.push(("final_value", result.final_value));
                    amounts.push(("total_invested", result.total_invested));
                    if !result.total_interest.is_finite() {
                        return Err(self.malformed("total_interest is not finite".into()));
                    }
                }
                amounts
            }
            SimulationPayload::DebtPayoff { balance, monthly_payment, rate_percent, .. } => {
                if !rate_percent.is_finite() {
                    return Err(self.malformed("rate_percent is not finite".into()));
                }
                vec![("balance", *balance), ("monthly_payment", *monthly_payment)]
            }
            SimulationPayload::BudgetSplit { monthly_income } => {
                vec![("monthly_income", *monthly_income)]
            }
        };

        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(self.malformed(format!("{field} must be a non-negative amount, got {value}")));
            }
        }
        Ok(())
    }

    fn malformed(&self, reason: String) -> AnalyticsError {
        AnalyticsError::MalformedRecord { id: self.id.clone(), reason }
    }
}

/// Compound-growth records of `history`, in history order.
pub fn growth_records(history: &[SimulationRecord]) -> impl Iterator<Item = GrowthRecord<'_>> {
    history.iter().filter_map(SimulationRecord::growth)
}
