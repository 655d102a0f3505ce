//! Drift monitoring and rebalance planning.
//!
//! Compares a live allocation against its target, filters trades below the
//! minimum ticket size, and checks the plan against the turnover cap.

use allocation_core::{AssetClass, Weights};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

// Weight differences below this are noise, not trades.
const WEIGHT_EPSILON: f64 = 1e-3;

fn default_drift_threshold() -> f64 {
    0.05
}

fn default_min_trade_size() -> f64 {
    100.0
}

fn default_max_turnover() -> f64 {
    0.20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceConfig {
    /// Per-class drift (absolute weight difference) that flags action.
    #[serde(default = "default_drift_threshold")]
    pub drift_threshold: f64,
    /// Minimum trade ticket in dollars.
    #[serde(default = "default_min_trade_size")]
    pub min_trade_size: f64,
    /// Maximum portfolio turnover per rebalance, as a fraction.
    #[serde(default = "default_max_turnover")]
    pub max_turnover: f64,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            drift_threshold: default_drift_threshold(),
            min_trade_size: default_min_trade_size(),
            max_turnover: default_max_turnover(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    Buy,
    Sell,
}

/// One candidate rebalancing trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeInstruction {
    pub asset_class: AssetClass,
    pub action: TradeAction,
    /// Signed dollar amount; positive buys, negative sells.
    pub dollar_amount: f64,
    pub current_weight: f64,
    pub target_weight: f64,
}

impl TradeInstruction {
    pub fn size(&self) -> f64 {
        self.dollar_amount.abs()
    }

    pub fn weight_delta(&self) -> f64 {
        self.target_weight - self.current_weight
    }
}

/// Result of comparing a live allocation against its target.
///
/// Transient computation result; it has no identity beyond the call that
/// produced it. Note `action_needed` reflects the pre-filter drift check,
/// so it can be true even when every trade fell below the minimum ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    /// Signed drift per class: current minus target.
    pub drift: HashMap<AssetClass, f64>,
    /// Classes whose absolute drift exceeds the threshold.
    pub violations: HashMap<AssetClass, bool>,
    /// Emitted trades, largest first.
    pub trades: Vec<TradeInstruction>,
    pub total_turnover: f64,
    /// Turnover as a fraction of portfolio value.
    pub turnover_percentage: f64,
    pub within_turnover_limit: bool,
    pub action_needed: bool,
    pub created_at: DateTime<Utc>,
}

impl DriftReport {
    /// Human-readable rebalance summary for display.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        if !self.action_needed {
            out.push_str("No rebalancing needed - portfolio within target allocation\n");
            return out;
        }

        out.push_str("REBALANCING REQUIRED\n");
        out.push_str(&"=".repeat(40));
        out.push('\n');

        out.push_str("Current drift:\n");
        for class in AssetClass::ALL {
            let drift = self.drift.get(&class).copied().unwrap_or(0.0);
            if drift.abs() > 0.01 {
                let _ = writeln!(out, "  {class}: {:+.1}%", drift * 100.0);
            }
        }

        if self.trades.is_empty() {
            out.push_str("No trades needed (below minimum size)\n");
        } else {
            out.push_str("Required trades:\n");
            for trade in &self.trades {
                let action = match trade.action {
                    TradeAction::Buy => "BUY",
                    TradeAction::Sell => "SELL",
                };
                let _ = writeln!(
                    out,
                    "  {action} {}: ${:.2}",
                    trade.asset_class,
                    trade.size()
                );
            }
        }

        let _ = writeln!(
            out,
            "Total turnover: {:.1}% ({} trades)",
            self.turnover_percentage * 100.0,
            self.trades.len()
        );
        out
    }
}

/// Builds drift reports from (current, target) weight pairs.
pub struct RebalanceDriftEngine {
    config: RebalanceConfig,
}

impl Default for RebalanceDriftEngine {
    fn default() -> Self {
        Self::new(RebalanceConfig::default())
    }
}

impl RebalanceDriftEngine {
    pub fn new(config: RebalanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RebalanceConfig {
        &self.config
    }

    /// Creates the full rebalance plan for a portfolio of `portfolio_value`
    /// dollars.
    pub fn create_rebalance_plan(
        &self,
        current: &Weights,
        target: &Weights,
        portfolio_value: f64,
    ) -> DriftReport {
        let mut drift = HashMap::new();
        let mut violations = HashMap::new();
        for class in AssetClass::ALL {
            let delta = current.get(class) - target.get(class);
            drift.insert(class, delta);
            // Strict comparison: drift of exactly the threshold does not
            // violate.
            violations.insert(class, delta.abs() > self.config.drift_threshold);
        }

        let mut trades: Vec<TradeInstruction> = AssetClass::ALL
            .iter()
            .filter_map(|&class| {
                let current_weight = current.get(class);
                let target_weight = target.get(class);
                let weight_diff = target_weight - current_weight;
                if weight_diff.abs() <= WEIGHT_EPSILON {
                    return None;
                }
                let dollar_amount = weight_diff * portfolio_value;
                if dollar_amount.abs() < self.config.min_trade_size {
                    return None;
                }
                Some(TradeInstruction {
                    asset_class: class,
                    action: if dollar_amount > 0.0 {
                        TradeAction::Buy
                    } else {
                        TradeAction::Sell
                    },
                    dollar_amount,
                    current_weight,
                    target_weight,
                })
            })
            .collect();

        // Largest tickets first: a simple, deterministic prioritization.
        trades.sort_by(|a, b| b.size().total_cmp(&a.size()));

        let total_turnover: f64 = trades.iter().map(TradeInstruction::size).sum();
        let turnover_percentage = if portfolio_value > 0.0 {
            total_turnover / portfolio_value
        } else {
            0.0
        };

        let action_needed = violations.values().any(|&v| v);
        if action_needed {
            info!(
                "rebalance: {} trades, turnover {:.1}%",
                trades.len(),
                turnover_percentage * 100.0
            );
        }

        DriftReport {
            drift,
            violations,
            trades,
            total_turnover,
            turnover_percentage,
            within_turnover_limit: turnover_percentage <= self.config.max_turnover,
            action_needed,
            created_at: Utc::now(),
        }
    }

    /// Applies a report's trades to a live allocation, returning the
    /// simulated post-rebalance vector.
    pub fn simulate(&self, current: &Weights, report: &DriftReport) -> Weights {
        let mut simulated = *current;
        for trade in &report.trades {
            simulated.add(trade.asset_class, trade.weight_delta());
        }
        simulated.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RebalanceDriftEngine {
        RebalanceDriftEngine::default()
    }

    fn target() -> Weights {
        Weights::new(0.10, 0.25, 0.55, 0.10, 0.0)
    }

    #[test]
    fn test_no_drift_means_no_action() {
        let report = engine().create_rebalance_plan(&target(), &target(), 100_000.0);
        assert!(!report.action_needed);
        assert!(report.trades.is_empty());
        assert_eq!(report.turnover_percentage, 0.0);
        assert!(report.within_turnover_limit);
    }

    #[test]
    fn test_drift_over_threshold_flags_action() {
        let current = Weights::new(0.08, 0.19, 0.62, 0.11, 0.0);
        let report = engine().create_rebalance_plan(&current, &target(), 100_000.0);
        assert!(report.action_needed);
        assert!(report.violations[&AssetClass::Shares]);
        assert!(report.violations[&AssetClass::Bonds]);
        assert!(!report.violations[&AssetClass::Cash]);
    }

    #[test]
    fn test_exact_threshold_drift_does_not_violate() {
        // Shares drift by exactly the 5% threshold.
        let mut current = target();
        current.set(AssetClass::Shares, target().get(AssetClass::Shares) + 0.05);
        current.set(AssetClass::Cash, target().get(AssetClass::Cash) - 0.05);
        let report = engine().create_rebalance_plan(&current, &target(), 100_000.0);
        assert!(!report.violations[&AssetClass::Shares]);
        assert!(!report.action_needed);
    }

    #[test]
    fn test_small_portfolio_filters_trades_but_keeps_action_flag() {
        // 6% drift violates, but on a $1,000 book the $60 ticket is under
        // the $100 minimum: action needed with zero trades.
        let current = Weights::new(0.10, 0.19, 0.61, 0.10, 0.0);
        let report = engine().create_rebalance_plan(&current, &target(), 1_000.0);
        assert!(report.action_needed);
        assert!(report.trades.is_empty());
    }

    #[test]
    fn test_trades_sorted_largest_first() {
        let current = Weights::new(0.02, 0.15, 0.70, 0.13, 0.0);
        let report = engine().create_rebalance_plan(&current, &target(), 50_000.0);
        assert!(report.trades.len() >= 2);
        for pair in report.trades.windows(2) {
            assert!(pair[0].size() >= pair[1].size());
        }
        // Biggest dislocation is shares, a sell.
        assert_eq!(report.trades[0].asset_class, AssetClass::Shares);
        assert_eq!(report.trades[0].action, TradeAction::Sell);
    }

    #[test]
    fn test_turnover_limit_flag() {
        // Wholesale reshuffle: turnover far beyond the 20% cap.
        let current = Weights::new(0.60, 0.30, 0.05, 0.05, 0.0);
        let report = engine().create_rebalance_plan(&current, &target(), 100_000.0);
        assert!(!report.within_turnover_limit);
        assert!(report.turnover_percentage > 0.20);
    }

    #[test]
    fn test_simulate_restores_target() {
        let engine = engine();
        let current = Weights::new(0.02, 0.15, 0.70, 0.13, 0.0);
        let report = engine.create_rebalance_plan(&current, &target(), 100_000.0);
        let simulated = engine.simulate(&current, &report);
        simulated.validate().unwrap();
        for (class, w) in target().iter() {
            assert!((simulated.get(class) - w).abs() < 1e-9);
        }
    }

    #[test]
    fn test_summary_mentions_trades() {
        let current = Weights::new(0.02, 0.15, 0.70, 0.13, 0.0);
        let report = engine().create_rebalance_plan(&current, &target(), 100_000.0);
        let summary = report.summary();
        assert!(summary.contains("REBALANCING REQUIRED"));
        assert!(summary.contains("SELL shares"));
    }
}
