//! Aggregate metrics over the analysed history window.

use crate::{
    record::{growth_records, SimulationRecord},
    types::finite_or_zero,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Share of the goal at which a simulation counts as "near" it.
pub const NEAR_GOAL_RATIO: f64 = 0.80;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryMetrics {
    pub total_simulations:    usize,
    pub growth_simulations:   usize,
    /// Mean of interest / invested (percent) over records with a result.
    pub avg_projected_return: f64,
    pub distinct_modalities:  usize,
    /// Final value of the newest compound-growth record that has a result.
    pub latest_final_value:   Option<f64>,
    /// Records whose final value lies in [80%, 100%) of the goal.
    pub near_goals_count:     usize,
}

impl HistoryMetrics {
    pub fn compute(history: &[SimulationRecord], goal_amount: Option<f64>) -> Self {
        let mut returns = Vec::new();
        let mut modalities = BTreeSet::new();
        let mut latest_final_value = None;
        let mut near_goals_count = 0;
        let mut growth_simulations = 0;

        for growth in growth_records(history) {
            growth_simulations += 1;
            modalities.insert(growth.parameters.modality.as_str());
            if let Some(result) = growth.result {
                returns.push(result.return_percent());
                latest_final_value = Some(result.final_value);
                if goal_amount.is_some_and(|goal| is_near_goal(result.final_value, goal)) {
                    near_goals_count += 1;
                }
            }
        }

        let avg_projected_return = if returns.is_empty() {
            0.0
        } else {
            finite_or_zero(returns.iter().sum::<f64>() / returns.len() as f64)
        };

        Self {
            total_simulations: history.len(),
            growth_simulations,
            avg_projected_return,
            distinct_modalities: modalities.len(),
            latest_final_value,
            near_goals_count,
        }
    }
}

/// `value` within [80%, 100%) of `goal`.
pub fn is_near_goal(value: f64, goal: f64) -> bool {
    goal > 0.0 && value >= goal * NEAR_GOAL_RATIO && value < goal
}
