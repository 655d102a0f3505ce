//! Risk-budget adjustment: scale an allocation toward a target volatility.

use crate::covariance::CovarianceModel;
use crate::model::{AssetClass, Percent, Weights};
use log::debug;

/// Default tolerance band: within one percentage point of target the
/// allocation is returned unchanged.
pub const DEFAULT_TOLERANCE: Percent = Percent(1.0);

/// Post-hoc adjustment applied when a computed allocation's volatility
/// deviates from the stated target.
///
/// Above target, the risky classes (shares, commodities, crypto) are scaled
/// down by `target/current` and the freed weight is split equally between
/// bonds and cash. Below target the adjustment is symmetric: risky classes
/// expand, safe classes contract (clamped at zero). Either way the result
/// is renormalized and never contains negative weights.
pub struct RiskBudgetAdjuster {
    covariance: CovarianceModel,
    tolerance: Percent,
}

impl Default for RiskBudgetAdjuster {
    fn default() -> Self {
        Self::new(CovarianceModel::default(), DEFAULT_TOLERANCE)
    }
}

impl RiskBudgetAdjuster {
    pub fn new(covariance: CovarianceModel, tolerance: Percent) -> Self {
        Self {
            covariance,
            tolerance,
        }
    }

    /// Scales `weights` toward `target` volatility.
    ///
    /// Idempotent near the target: if the current volatility is already
    /// within the tolerance band the input is returned unchanged.
    pub fn adjust_for_target(&self, weights: &Weights, target: Percent) -> Weights {
        let current = self.covariance.portfolio_volatility(weights);
        if (current.value() - target.value()).abs() < self.tolerance.value() {
            return *weights;
        }

        let factor = target.value() / current.value();
        debug!("risk budget: current {current}, target {target}, factor {factor:.3}");

        let mut adjusted = *weights;
        let mut risky_delta = 0.0;
        for class in AssetClass::ALL {
            if class.is_risky() {
                let old = weights.get(class);
                let new = old * factor;
                adjusted.set(class, new);
                risky_delta += old - new;
            }
        }

        // Freed weight (or, when expanding, the shortfall) is split equally
        // across the safe classes.
        let safe_classes = [AssetClass::Bonds, AssetClass::Cash];
        let per_safe = risky_delta / safe_classes.len() as f64;
        for class in safe_classes {
            adjusted.add(class, per_safe);
        }

        adjusted.normalized()
    }
}
