//! Portfolio planning pipeline.
//!
//! Turns a user request (horizon, risk level, budget, volatility tolerance)
//! into a fully sized plan: policy weights, risk-budget capping, safety
//! adjustments, a risk report, and a buy list. The heavy lifting lives in
//! `allocation-core`; this crate wires the stages together and owns the
//! operator-facing surfaces (config, CLI, reports).

pub mod model;
pub mod rebalance;
pub mod safety;
pub mod trade;

pub use model::PlannerConfig;
pub use rebalance::{DriftReport, RebalanceDriftEngine};
pub use trade::BuyList;

use allocation_core::analytics::{RiskAnalytics, RiskReport};
use allocation_core::tables::ReturnAssumptions;
use allocation_core::{
    CovarianceModel, Horizon, Percent, PolicyWeightEngine, RiskBudgetAdjuster, RiskLevel, Weights,
};
use chrono::{DateTime, Utc};
use log::info;
use safety::{DrawdownSeatbelt, SafetyChain, SleepBetterShift};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A planning request, as it arrives from the CLI or a config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlanRequest {
    pub horizon: Horizon,
    pub risk_level: RiskLevel,
    /// Cash to deploy, in dollars.
    pub budget: f64,
    /// Volatility tolerance, annualized.
    pub max_volatility: Percent,
    /// 0 = aggressive (no shift), 1 = most conservative.
    pub sleep_dial: f64,
}

/// Whether the risk budget had to intervene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskStatus {
    /// Policy weights landed inside the volatility tolerance as-is.
    WithinBudget,
    /// Risky weight was scaled back to honor the tolerance.
    Capped,
}

/// The finished plan, ready for display or serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioPlan {
    pub created_at: DateTime<Utc>,
    pub request: PlanRequest,
    pub weights: Weights,
    pub predicted_volatility: Percent,
    pub risk_status: RiskStatus,
    pub safety_messages: Vec<String>,
    pub risk_report: RiskReport,
    pub buy_list: BuyList,
}

impl PortfolioPlan {
    /// Operator-facing text rendering of the plan.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Portfolio plan ({})", self.created_at.to_rfc3339());
        let _ = writeln!(
            out,
            "  horizon {} / risk level {} / tolerance {}",
            self.request.horizon, self.request.risk_level, self.request.max_volatility
        );
        out.push_str("Target allocation:\n");
        for (class, weight) in self.weights.iter() {
            if weight > 0.0 {
                let _ = writeln!(out, "  {:<12} {:>5.1}%", class.to_string(), weight * 100.0);
            }
        }
        let _ = writeln!(out, "Predicted volatility: {}", self.predicted_volatility);
        if self.risk_status == RiskStatus::Capped {
            out.push_str("Risk budget: allocation was capped to honor the tolerance\n");
        }
        for message in &self.safety_messages {
            let _ = writeln!(out, "Safety: {message}");
        }
        let _ = writeln!(
            out,
            "Expected return {:.1}%/yr, expected drawdown {:.1}%",
            self.risk_report.expected_return * 100.0,
            self.risk_report.expected_drawdown * 100.0
        );
        out.push('\n');
        out.push_str(&self.buy_list.summary());
        out
    }
}

/// End-to-end planner: policy engine, risk budget, safety chain, analytics.
pub struct PortfolioPlanner {
    engine: PolicyWeightEngine,
    covariance: CovarianceModel,
    risk_budget: RiskBudgetAdjuster,
    analytics: RiskAnalytics,
    config: PlannerConfig,
}

impl Default for PortfolioPlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl PortfolioPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        let covariance = CovarianceModel::default();
        Self {
            engine: PolicyWeightEngine::default(),
            covariance: covariance.clone(),
            risk_budget: RiskBudgetAdjuster::new(
                covariance.clone(),
                allocation_core::risk_budget::DEFAULT_TOLERANCE,
            ),
            analytics: RiskAnalytics::new(
                covariance,
                ReturnAssumptions::default(),
                config.limits.clone(),
            ),
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Drift engine configured from this planner's config, for rebalance
    /// checks against an existing book.
    pub fn rebalance_engine(&self) -> RebalanceDriftEngine {
        RebalanceDriftEngine::new(self.config.rebalance.clone())
    }

    /// Runs the full pipeline for one request.
    pub fn create_plan(&self, request: &PlanRequest) -> PortfolioPlan {
        // Stage 1: policy weights from the request profile.
        let policy_weights =
            self.engine
                .compute_policy_weights(request.horizon, request.risk_level, request.max_volatility);
        let policy_vol = self.covariance.portfolio_volatility(&policy_weights);
        info!("policy weights computed, predicted volatility {policy_vol}");

        // Stage 2: cap to the volatility tolerance if the policy vector
        // overshoots it.
        let (budgeted, risk_status) = if policy_vol.value() > request.max_volatility.value() {
            let capped = self
                .risk_budget
                .adjust_for_target(&policy_weights, request.max_volatility);
            info!(
                "risk budget capped allocation: {policy_vol} -> {}",
                self.covariance.portfolio_volatility(&capped)
            );
            (capped, RiskStatus::Capped)
        } else {
            (policy_weights, RiskStatus::WithinBudget)
        };

        // Stage 3: safety chain, dial shift before the seatbelt.
        let mut chain = SafetyChain::new();
        chain.add_stage(Box::new(SleepBetterShift::new(request.sleep_dial)));
        chain.add_stage(Box::new(DrawdownSeatbelt::with_defaults(
            self.config.max_drawdown,
        )));
        let (final_weights, safety_messages) = chain.run(&budgeted);

        // Stage 4: analytics and trade sizing on the final vector.
        let predicted_volatility = self.covariance.portfolio_volatility(&final_weights);
        let risk_report = self
            .analytics
            .risk_report(&final_weights, request.max_volatility);
        let buy_list = BuyList::build(&final_weights, request.budget);

        PortfolioPlan {
            created_at: Utc::now(),
            request: *request,
            weights: final_weights,
            predicted_volatility,
            risk_status,
            safety_messages,
            risk_report,
            buy_list,
        }
    }
}
