//! Analytics configuration — loaded from JSON, patched by the caller.
//!
//! Every field has a default so a partial (or empty) JSON file is valid.
//! `apply()` is the only way the caller changes configuration at runtime;
//! it validates the merged result before committing it.

use crate::error::{AnalyticsError, AnalyticsResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

pub const DEFAULT_ANALYSIS_WINDOW: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisFrequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub alerts_enabled: bool,
    /// Informational only; recompute is always driven by the caller.
    pub analysis_frequency: AnalysisFrequency,
    pub max_suggestions_per_kind: usize,
    /// Trend patterns below this confidence (0–100) are not surfaced.
    pub min_confidence: u8,
    /// Reserved weights (0–100). Accepted and validated, not consulted by any rule.
    pub profitability_focus: u8,
    pub safety_focus: u8,
    pub liquidity_focus: u8,
    /// Target amount for the goal-proximity alert. No goal, no alert.
    pub goal_amount: Option<f64>,
    /// Only the newest `analysis_window` records feed trends, profile and alerts.
    pub analysis_window: Option<usize>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            alerts_enabled:           true,
            analysis_frequency:       AnalysisFrequency::Weekly,
            max_suggestions_per_kind: 1,
            min_confidence:           50,
            profitability_focus:      50,
            safety_focus:             50,
            liquidity_focus:          50,
            goal_amount:              None,
            analysis_window:          Some(DEFAULT_ANALYSIS_WINDOW),
        }
    }
}

impl AnalyticsConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> AnalyticsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: AnalyticsConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("config loaded from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        let percent_fields = [
            ("min_confidence",      self.min_confidence),
            ("profitability_focus", self.profitability_focus),
            ("safety_focus",        self.safety_focus),
            ("liquidity_focus",     self.liquidity_focus),
        ];
        for (field, value) in percent_fields {
            if value > 100 {
                return Err(AnalyticsError::InvalidConfig {
                    field,
                    reason: format!("must be within 0..=100, got {value}"),
                });
            }
        }
        if let Some(goal) = self.goal_amount {
            if !goal.is_finite() || goal <= 0.0 {
                return Err(AnalyticsError::InvalidConfig {
                    field: "goal_amount",
                    reason: format!("must be a positive amount, got {goal}"),
                });
            }
        }
        if self.analysis_window == Some(0) {
            return Err(AnalyticsError::InvalidConfig {
                field: "analysis_window",
                reason: "must keep at least one record".into(),
            });
        }
        Ok(())
    }

    /// Merge a partial update. The config is left untouched if the
    /// merged result does not validate.
    pub fn apply(&mut self, patch: ConfigPatch) -> AnalyticsResult<()> {
        let mut next = self.clone();
        if let Some(v) = patch.alerts_enabled           { next.alerts_enabled = v; }
        if let Some(v) = patch.analysis_frequency       { next.analysis_frequency = v; }
        if let Some(v) = patch.max_suggestions_per_kind { next.max_suggestions_per_kind = v; }
        if let Some(v) = patch.min_confidence           { next.min_confidence = v; }
        if let Some(v) = patch.profitability_focus      { next.profitability_focus = v; }
        if let Some(v) = patch.safety_focus             { next.safety_focus = v; }
        if let Some(v) = patch.liquidity_focus          { next.liquidity_focus = v; }
        if let Some(v) = patch.goal_amount              { next.goal_amount = v; }
        if let Some(v) = patch.analysis_window          { next.analysis_window = v; }
        next.validate()?;
        *self = next;
        log::info!("configuration updated: {self:?}");
        Ok(())
    }
}

/// A partial configuration update. `None` leaves the field as is.
/// The nullable fields take `Some(None)` to clear them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub alerts_enabled: Option<bool>,
    pub analysis_frequency: Option<AnalysisFrequency>,
    pub max_suggestions_per_kind: Option<usize>,
    pub min_confidence: Option<u8>,
    pub profitability_focus: Option<u8>,
    pub safety_focus: Option<u8>,
    pub liquidity_focus: Option<u8>,
    #[serde(deserialize_with = "nullable")]
    pub goal_amount: Option<Option<f64>>,
    #[serde(deserialize_with = "nullable")]
    pub analysis_window: Option<Option<usize>>,
}

/// Absent field stays `None`; an explicit `null` becomes `Some(None)`.
fn nullable<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
