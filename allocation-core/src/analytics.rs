//! Risk analytics over a weight vector.
//!
//! Everything here is derived arithmetic for reporting: attribution,
//! parametric VaR/CVaR, limit checks, stress scenarios and the aggregate
//! risk report the planner attaches to each plan.

use crate::covariance::CovarianceModel;
use crate::model::{AssetClass, Percent, Weights};
use crate::tables::ReturnAssumptions;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const TRADING_DAYS: f64 = 252.0;
// Rough Expected Shortfall multiple on parametric VaR.
const CVAR_MULTIPLE: f64 = 1.3;

fn default_max_single_class() -> f64 {
    0.70
}

fn default_max_volatility() -> Percent {
    Percent(30.0)
}

fn default_min_volatility() -> Percent {
    Percent(2.0)
}

/// Hard limits an allocation is checked against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskLimits {
    #[serde(default = "default_max_single_class")]
    pub max_single_class: f64,
    #[serde(default = "default_max_volatility")]
    pub max_volatility: Percent,
    #[serde(default = "default_min_volatility")]
    pub min_volatility: Percent,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_single_class: default_max_single_class(),
            max_volatility: default_max_volatility(),
            min_volatility: default_min_volatility(),
        }
    }
}

/// Outcome of the limit checks. `true` means the limit is violated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitCheck {
    pub max_single_class: bool,
    pub max_volatility: bool,
    pub min_volatility: bool,
    pub negative_weight: bool,
    pub unnormalized_sum: bool,
}

impl LimitCheck {
    pub fn any_violated(&self) -> bool {
        self.max_single_class
            || self.max_volatility
            || self.min_volatility
            || self.negative_weight
            || self.unnormalized_sum
    }
}

/// Parametric VaR/CVaR under a normal assumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarMetrics {
    /// One-day loss quantile, as a (negative) fraction.
    pub var_1d: f64,
    /// Annual loss quantile, as a (negative) fraction.
    pub var_1y: f64,
    pub cvar_1d: f64,
    pub cvar_1y: f64,
    pub confidence: f64,
    pub portfolio_volatility: Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressSeverity {
    Mild,
    Moderate,
    Severe,
    Extreme,
}

/// Portfolio outcome under one stress scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressResult {
    /// Weighted portfolio return under the scenario, as a fraction.
    pub portfolio_return: f64,
    pub severity: StressSeverity,
}

/// Aggregate risk report for one allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub portfolio_volatility: Percent,
    pub target_volatility: Percent,
    pub volatility_deviation: Percent,
    pub within_risk_budget: bool,
    pub expected_return: f64,
    pub expected_drawdown: f64,
    pub attribution: HashMap<AssetClass, f64>,
    pub var: VarMetrics,
    pub limits: LimitCheck,
    /// 0 (calm) to 1 (at the volatility ceiling).
    pub risk_score: f64,
    pub recommendations: Vec<String>,
}

/// Computes the analytics bundle from the shared fixed tables.
pub struct RiskAnalytics {
    covariance: CovarianceModel,
    assumptions: ReturnAssumptions,
    limits: RiskLimits,
}

impl Default for RiskAnalytics {
    fn default() -> Self {
        Self::new(
            CovarianceModel::default(),
            ReturnAssumptions::default(),
            RiskLimits::default(),
        )
    }
}

impl RiskAnalytics {
    pub fn new(
        covariance: CovarianceModel,
        assumptions: ReturnAssumptions,
        limits: RiskLimits,
    ) -> Self {
        Self {
            covariance,
            assumptions,
            limits,
        }
    }

    /// Share of sigma-weighted risk contributed by each class. Sums to 1
    /// for any allocation with at least one risky dollar.
    pub fn risk_attribution(&self, weights: &Weights) -> HashMap<AssetClass, f64> {
        let mut attribution = HashMap::new();
        let mut total = 0.0;
        for (class, weight) in weights.iter() {
            let contribution = weight * self.covariance.class_volatility(class);
            attribution.insert(class, contribution);
            total += contribution;
        }
        if total > 0.0 {
            for value in attribution.values_mut() {
                *value /= total;
            }
        }
        attribution
    }

    /// Parametric VaR/CVaR at 95% or 99% confidence.
    pub fn value_at_risk(&self, weights: &Weights, confidence: f64) -> VarMetrics {
        let vol = self.covariance.portfolio_volatility(weights);
        let z = if confidence >= 0.99 { -2.326 } else { -1.645 };
        let var_1y = z * vol.as_fraction();
        let var_1d = var_1y / TRADING_DAYS.sqrt();
        VarMetrics {
            var_1d,
            var_1y,
            cvar_1d: var_1d * CVAR_MULTIPLE,
            cvar_1y: var_1y * CVAR_MULTIPLE,
            confidence,
            portfolio_volatility: vol,
        }
    }

    pub fn check_limits(&self, weights: &Weights) -> LimitCheck {
        let vol = self.covariance.portfolio_volatility(weights);
        let max_class = weights
            .iter()
            .map(|(_, w)| w)
            .fold(f64::NEG_INFINITY, f64::max);
        LimitCheck {
            max_single_class: max_class > self.limits.max_single_class,
            max_volatility: vol > self.limits.max_volatility,
            min_volatility: vol < self.limits.min_volatility,
            negative_weight: weights.iter().any(|(_, w)| w < 0.0),
            unnormalized_sum: (weights.total() - 1.0).abs() > 0.01,
        }
    }

    /// Evaluates the allocation against each stress scenario.
    pub fn stress_test(&self, weights: &Weights) -> HashMap<String, StressResult> {
        default_stress_scenarios()
            .into_iter()
            .map(|(name, shocks)| {
                let portfolio_return: f64 = weights
                    .iter()
                    .map(|(class, w)| w * shocks[class.index()])
                    .sum();
                let result = StressResult {
                    portfolio_return,
                    severity: classify_severity(portfolio_return),
                };
                (name.to_string(), result)
            })
            .collect()
    }

    /// Builds the full report for an allocation against a volatility
    /// target.
    pub fn risk_report(&self, weights: &Weights, target: Percent) -> RiskReport {
        let vol = self.covariance.portfolio_volatility(weights);
        let deviation = Percent((vol.value() - target.value()).abs());
        debug!("risk report: vol {vol}, target {target}");

        RiskReport {
            portfolio_volatility: vol,
            target_volatility: target,
            volatility_deviation: deviation,
            within_risk_budget: deviation.value() < 2.0,
            expected_return: self.assumptions.portfolio_return(weights),
            expected_drawdown: self.assumptions.portfolio_drawdown(weights),
            attribution: self.risk_attribution(weights),
            var: self.value_at_risk(weights, 0.95),
            limits: self.check_limits(weights),
            risk_score: (vol.value() / self.limits.max_volatility.value()).min(1.0),
            recommendations: self.recommendations(weights, vol, target),
        }
    }

    fn recommendations(&self, weights: &Weights, vol: Percent, target: Percent) -> Vec<String> {
        let mut notes = Vec::new();
        if vol.value() > target.value() * 1.1 {
            notes.push(
                "Volatility is running over target; consider trimming shares, commodities or crypto"
                    .to_string(),
            );
        }
        if vol.value() < target.value() * 0.9 {
            notes.push(
                "Volatility is well under target; growth assets could be increased".to_string(),
            );
        }
        let max_class = weights
            .iter()
            .map(|(_, w)| w)
            .fold(f64::NEG_INFINITY, f64::max);
        if max_class > 0.6 {
            notes.push("Portfolio is concentrated in one asset class".to_string());
        }
        if weights.get(AssetClass::Cash) > 0.3 {
            notes.push("High cash allocation may limit growth".to_string());
        }
        notes
    }
}

/// Historical shock tables, per class in canonical order.
fn default_stress_scenarios() -> Vec<(&'static str, [f64; AssetClass::COUNT])> {
    vec![
        //                          cash   bonds  shares comm   crypto
        ("financial_crisis_2008", [0.02, 0.10, -0.50, -0.30, -0.80]),
        ("covid_crash_2020", [0.01, 0.05, -0.35, -0.25, -0.50]),
        ("inflation_shock", [-0.05, -0.15, -0.20, 0.40, -0.30]),
        ("interest_rate_shock", [0.05, -0.25, -0.15, -0.10, -0.20]),
    ]
}

fn classify_severity(portfolio_return: f64) -> StressSeverity {
    if portfolio_return < -0.30 {
        StressSeverity::Extreme
    } else if portfolio_return < -0.20 {
        StressSeverity::Severe
    } else if portfolio_return < -0.10 {
        StressSeverity::Moderate
    } else {
        StressSeverity::Mild
    }
}
