//! Portfolio volatility estimation.
//!
//! The estimator is a dense quadratic form over the fixed 5x5
//! volatility/correlation tables. The same instance feeds the policy
//! engine's risk checks and the risk-budget adjuster, so predicted and
//! enforced risk always come from one set of constants.

use crate::error::AllocationError;
use crate::model::{AssetClass, Percent, Weights};
use serde::{Deserialize, Serialize};

type Matrix = [[f64; AssetClass::COUNT]; AssetClass::COUNT];

/// Annualized per-class volatility plus the pairwise correlation matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CovarianceModel {
    sigma: [f64; AssetClass::COUNT],
    corr: Matrix,
}

impl Default for CovarianceModel {
    fn default() -> Self {
        Self {
            //      cash  bonds shares comm  crypto
            sigma: [0.02, 0.05, 0.20, 0.25, 0.60],
            corr: [
                [1.00, 0.20, 0.00, 0.00, 0.00],
                [0.20, 1.00, 0.20, 0.10, 0.05],
                [0.00, 0.20, 1.00, 0.30, 0.25],
                [0.00, 0.10, 0.30, 1.00, 0.20],
                [0.00, 0.05, 0.25, 0.20, 1.00],
            ],
        }
    }
}

impl CovarianceModel {
    /// Builds a model from external tables, validating symmetry, unit
    /// diagonal, correlation range and non-negative volatilities.
    pub fn new(
        sigma: [f64; AssetClass::COUNT],
        corr: Matrix,
    ) -> Result<Self, AllocationError> {
        for (i, &vol) in sigma.iter().enumerate() {
            if !vol.is_finite() || vol < 0.0 {
                return Err(AllocationError::InvalidCovariance(format!(
                    "volatility for {} must be finite and non-negative, got {vol}",
                    AssetClass::ALL[i]
                )));
            }
        }
        for i in 0..AssetClass::COUNT {
            if (corr[i][i] - 1.0).abs() > 1e-12 {
                return Err(AllocationError::InvalidCovariance(format!(
                    "correlation diagonal for {} must be 1.0, got {}",
                    AssetClass::ALL[i], corr[i][i]
                )));
            }
            for j in 0..AssetClass::COUNT {
                let c = corr[i][j];
                if !c.is_finite() || !(-1.0..=1.0).contains(&c) {
                    return Err(AllocationError::InvalidCovariance(format!(
                        "correlation [{i}][{j}] = {c} is outside [-1, 1]"
                    )));
                }
                if (c - corr[j][i]).abs() > 1e-12 {
                    return Err(AllocationError::InvalidCovariance(format!(
                        "correlation matrix is not symmetric at [{i}][{j}]"
                    )));
                }
            }
        }
        Ok(Self { sigma, corr })
    }

    /// Annualized volatility of a single asset class, as a fraction.
    pub fn class_volatility(&self, class: AssetClass) -> f64 {
        self.sigma[class.index()]
    }

    pub fn correlation(&self, a: AssetClass, b: AssetClass) -> f64 {
        self.corr[a.index()][b.index()]
    }

    /// Annualized portfolio volatility of a weight vector.
    ///
    /// Computes `sqrt(sum_ij w_i w_j sigma_i sigma_j corr_ij)` over the
    /// full 5x5 grid. Output is always >= 0 and does not depend on
    /// iteration order.
    pub fn portfolio_volatility(&self, weights: &Weights) -> Percent {
        let mut variance = 0.0;
        for &a in AssetClass::ALL.iter() {
            for &b in AssetClass::ALL.iter() {
                variance += weights.get(a)
                    * weights.get(b)
                    * self.sigma[a.index()]
                    * self.sigma[b.index()]
                    * self.corr[a.index()][b.index()];
            }
        }
        Percent::from_fraction(variance.max(0.0).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_is_self_consistent() {
        let model = CovarianceModel::default();
        // The default tables must pass their own validation.
        CovarianceModel::new(model.sigma, model.corr).unwrap();
    }

    #[test]
    fn test_single_asset_has_no_cross_terms() {
        let model = CovarianceModel::default();
        let vol = model.portfolio_volatility(&Weights::single(AssetClass::Cash));
        assert!((vol.value() - 2.0).abs() < 1e-12);
        let crypto = model.portfolio_volatility(&Weights::single(AssetClass::Crypto));
        assert!((crypto.value() - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_volatility_is_order_independent() {
        let model = CovarianceModel::default();
        let weights = Weights::new(0.10, 0.30, 0.40, 0.10, 0.10);
        // Recompute the quadratic form iterating classes in reverse.
        let mut variance = 0.0;
        for &a in AssetClass::ALL.iter().rev() {
            for &b in AssetClass::ALL.iter().rev() {
                variance += weights.get(a)
                    * weights.get(b)
                    * model.class_volatility(a)
                    * model.class_volatility(b)
                    * model.correlation(a, b);
            }
        }
        let reversed = Percent::from_fraction(variance.sqrt());
        let forward = model.portfolio_volatility(&weights);
        assert!((forward.value() - reversed.value()).abs() < 1e-12);
    }

    #[test]
    fn test_diversification_reduces_volatility() {
        let model = CovarianceModel::default();
        let blended = model.portfolio_volatility(&Weights::new(0.0, 0.5, 0.5, 0.0, 0.0));
        let shares = model.portfolio_volatility(&Weights::single(AssetClass::Shares));
        assert!(blended.value() < shares.value());
    }

    #[test]
    fn test_new_rejects_asymmetric_matrix() {
        let model = CovarianceModel::default();
        let mut corr = model.corr;
        corr[0][1] = 0.9;
        assert!(CovarianceModel::new(model.sigma, corr).is_err());
    }

    #[test]
    fn test_new_rejects_bad_diagonal_and_range() {
        let model = CovarianceModel::default();
        let mut corr = model.corr;
        corr[2][2] = 0.5;
        assert!(CovarianceModel::new(model.sigma, corr).is_err());

        let mut sigma = model.sigma;
        sigma[4] = -0.1;
        assert!(CovarianceModel::new(sigma, model.corr).is_err());
    }
}
