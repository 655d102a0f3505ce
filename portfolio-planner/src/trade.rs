//! Turns a target allocation plus a cash budget into a concrete buy list.

use allocation_core::{AssetClass, Weights};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Rounds a dollar amount down to whole cents.
fn to_cents(dollars: f64) -> f64 {
    (dollars * 100.0).floor() / 100.0
}

/// One line of the buy list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyOrder {
    pub asset_class: AssetClass,
    pub weight: f64,
    pub dollars: f64,
}

/// A sized shopping list for a fresh deposit: every target class gets its
/// weight's share of the budget, rounded to cents, with the rounding
/// remainder left as cash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyList {
    /// Orders sorted by dollar amount, largest first.
    pub orders: Vec<BuyOrder>,
    pub budget: f64,
    pub total_invested: f64,
    pub leftover_cash: f64,
}

impl BuyList {
    pub fn build(target: &Weights, budget: f64) -> Self {
        let mut orders: Vec<BuyOrder> = target
            .iter()
            .filter(|&(_, weight)| weight > 0.0)
            .map(|(class, weight)| BuyOrder {
                asset_class: class,
                weight,
                dollars: to_cents(weight * budget),
            })
            .collect();
        orders.sort_by(|a, b| b.dollars.total_cmp(&a.dollars));

        let total_invested: f64 = orders.iter().map(|o| o.dollars).sum();
        Self {
            orders,
            budget,
            total_invested,
            leftover_cash: to_cents(budget - total_invested),
        }
    }

    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Buy list for ${:.2}:", self.budget);
        for order in &self.orders {
            let _ = writeln!(
                out,
                "  {:<12} {:>6.1}%  ${:.2}",
                order.asset_class.to_string(),
                order.weight * 100.0,
                order.dollars
            );
        }
        let _ = writeln!(out, "  leftover cash: ${:.2}", self.leftover_cash);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_cover_budget_within_rounding() {
        let target = Weights::new(0.10, 0.35, 0.45, 0.07, 0.03);
        let list = BuyList::build(&target, 10_000.0);
        assert_eq!(list.orders.len(), 5);
        assert!((list.total_invested + list.leftover_cash - 10_000.0).abs() < 0.05);
        assert!(list.leftover_cash >= 0.0);
    }

    #[test]
    fn test_orders_sorted_and_zero_weights_skipped() {
        let target = Weights::new(0.10, 0.25, 0.55, 0.10, 0.0);
        let list = BuyList::build(&target, 5_000.0);
        assert_eq!(list.orders.len(), 4);
        assert_eq!(list.orders[0].asset_class, AssetClass::Shares);
        for pair in list.orders.windows(2) {
            assert!(pair[0].dollars >= pair[1].dollars);
        }
    }

    #[test]
    fn test_cent_rounding_never_overspends() {
        // An awkward budget that does not divide evenly.
        let target = Weights::new(0.10, 0.35, 0.45, 0.07, 0.03);
        let list = BuyList::build(&target, 999.97);
        assert!(list.total_invested <= list.budget);
        for order in &list.orders {
            let cents = order.dollars * 100.0;
            assert!((cents - cents.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_summary_lists_every_order() {
        let target = Weights::new(0.10, 0.35, 0.45, 0.07, 0.03);
        let list = BuyList::build(&target, 10_000.0);
        let summary = list.summary();
        assert!(summary.contains("shares"));
        assert!(summary.contains("leftover cash"));
    }
}
