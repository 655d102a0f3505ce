use crate::rebalance::RebalanceConfig;
use allocation_core::analytics::RiskLimits;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_max_drawdown() -> f64 {
    0.25
}

/// Tunable guardrail constants for the planner.
///
/// Every field has a house-view default, so a config file only needs to
/// state its overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub rebalance: RebalanceConfig,
    #[serde(default)]
    pub limits: RiskLimits,
    /// Maximum acceptable expected drawdown before the seatbelt engages
    /// (0.25 = 25%).
    #[serde(default = "default_max_drawdown")]
    pub max_drawdown: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            rebalance: RebalanceConfig::default(),
            limits: RiskLimits::default(),
            max_drawdown: default_max_drawdown(),
        }
    }
}

impl PlannerConfig {
    /// Loads a config from a JSON file, filling omitted fields with the
    /// defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading planner config {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing planner config {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_yields_defaults() {
        let config: PlannerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_drawdown, 0.25);
        assert_eq!(config.rebalance.drift_threshold, 0.05);
    }

    #[test]
    fn test_partial_override() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"max_drawdown": 0.15}"#).unwrap();
        assert_eq!(config.max_drawdown, 0.15);
        assert_eq!(config.rebalance.max_turnover, 0.20);
    }
}
