//! End-to-end pipeline tests: request in, sized plan out.

use allocation_core::{AssetClass, Horizon, Percent, RiskLevel};
use portfolio_planner::{PlanRequest, PlannerConfig, PortfolioPlan, PortfolioPlanner, RiskStatus};

fn request(horizon: Horizon, level: u8, max_vol: f64, budget: f64) -> PlanRequest {
    PlanRequest {
        horizon,
        risk_level: RiskLevel::new(level).unwrap(),
        budget,
        max_volatility: Percent(max_vol),
        sleep_dial: 0.0,
    }
}

#[test]
fn adventurous_long_horizon_plan_respects_crypto_cap() {
    let planner = PortfolioPlanner::default();
    let plan = planner.create_plan(&request(Horizon::Long, 5, 75.0, 25_000.0));

    plan.weights.validate().unwrap();
    // High tolerance bucket allows at most 15% crypto.
    assert!(plan.weights.get(AssetClass::Crypto) <= 0.15 + 1e-9);
    // The buy list deploys the budget, leaving only rounding change.
    assert!(plan.buy_list.leftover_cash < 1.0);
    assert!((plan.buy_list.total_invested + plan.buy_list.leftover_cash - 25_000.0).abs() < 0.05);
}

#[test]
fn tight_volatility_tolerance_gets_capped() {
    let planner = PortfolioPlanner::default();
    let plan = planner.create_plan(&request(Horizon::Long, 5, 5.0, 10_000.0));

    assert_eq!(plan.risk_status, RiskStatus::Capped);
    plan.weights.validate().unwrap();
    // Capping pushes weight into the safe classes.
    let safe = plan.weights.get(AssetClass::Cash) + plan.weights.get(AssetClass::Bonds);
    assert!(safe > 0.5);
}

#[test]
fn cautious_profile_is_not_capped() {
    let planner = PortfolioPlanner::default();
    let plan = planner.create_plan(&request(Horizon::Short, 1, 30.0, 10_000.0));
    assert_eq!(plan.risk_status, RiskStatus::WithinBudget);
}

#[test]
fn plan_round_trips_through_json() {
    let planner = PortfolioPlanner::default();
    let plan = planner.create_plan(&request(Horizon::Medium, 3, 45.0, 10_000.0));

    let rendered = serde_json::to_string(&plan).unwrap();
    let parsed: PortfolioPlan = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed.weights, plan.weights);
    assert_eq!(parsed.risk_status, plan.risk_status);
    assert_eq!(parsed.buy_list.orders.len(), plan.buy_list.orders.len());
}

#[test]
fn rebalance_engine_uses_planner_config() {
    let mut config = PlannerConfig::default();
    config.rebalance.drift_threshold = 0.02;
    let planner = PortfolioPlanner::new(config);

    let target = planner
        .create_plan(&request(Horizon::Medium, 3, 45.0, 10_000.0))
        .weights;
    let mut drifted = target;
    drifted.add(AssetClass::Shares, 0.03);
    drifted.add(AssetClass::Bonds, -0.03);

    let report = planner
        .rebalance_engine()
        .create_rebalance_plan(&drifted, &target, 100_000.0);
    // 3% drift violates the tightened 2% threshold.
    assert!(report.action_needed);
    assert!(!report.trades.is_empty());
}
