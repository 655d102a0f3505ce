use crate::error::AllocationError;
use crate::model::AssetClass;
use serde::{Deserialize, Serialize};

/// Tolerance on the sum-to-one invariant.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// A portfolio weight vector over the closed asset-class set.
///
/// Invariants the pipeline maintains after every transform step: each
/// component is >= 0 and the components sum to 1.0 within [`SUM_TOLERANCE`].
/// Every transform returns a fresh vector; nothing mutates a caller's copy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Weights {
    cash: f64,
    bonds: f64,
    shares: f64,
    commodities: f64,
    crypto: f64,
}

impl Weights {
    pub fn new(cash: f64, bonds: f64, shares: f64, commodities: f64, crypto: f64) -> Self {
        Self {
            cash,
            bonds,
            shares,
            commodities,
            crypto,
        }
    }

    /// The all-zero vector. Not a valid allocation on its own; useful as an
    /// accumulator.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Equal weighting across all five classes.
    pub fn equal() -> Self {
        let w = 1.0 / AssetClass::COUNT as f64;
        Self::new(w, w, w, w, w)
    }

    /// A single-class portfolio.
    pub fn single(class: AssetClass) -> Self {
        let mut weights = Self::zero();
        weights.set(class, 1.0);
        weights
    }

    pub fn get(&self, class: AssetClass) -> f64 {
        match class {
            AssetClass::Cash => self.cash,
            AssetClass::Bonds => self.bonds,
            AssetClass::Shares => self.shares,
            AssetClass::Commodities => self.commodities,
            AssetClass::Crypto => self.crypto,
        }
    }

    pub fn set(&mut self, class: AssetClass, value: f64) {
        match class {
            AssetClass::Cash => self.cash = value,
            AssetClass::Bonds => self.bonds = value,
            AssetClass::Shares => self.shares = value,
            AssetClass::Commodities => self.commodities = value,
            AssetClass::Crypto => self.crypto = value,
        }
    }

    pub fn add(&mut self, class: AssetClass, delta: f64) {
        self.set(class, self.get(class) + delta);
    }

    pub fn total(&self) -> f64 {
        AssetClass::ALL.iter().map(|&c| self.get(c)).sum()
    }

    /// Iterates `(class, weight)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, f64)> + '_ {
        AssetClass::ALL.iter().map(move |&c| (c, self.get(c)))
    }

    /// Returns a copy with every component clamped at zero.
    pub fn clamped_non_negative(&self) -> Self {
        let mut out = *self;
        for class in AssetClass::ALL {
            out.set(class, self.get(class).max(0.0));
        }
        out
    }

    /// Returns a copy scaled so the components sum to 1.0.
    ///
    /// A degenerate all-zero total falls back to equal weighting rather
    /// than dividing by zero; given the floors in the bounds policy this
    /// should never happen in the main pipeline, but the behavior is
    /// defined and tested regardless.
    pub fn normalized(&self) -> Self {
        let clamped = self.clamped_non_negative();
        let total = clamped.total();
        if total <= 0.0 {
            return Self::equal();
        }
        let mut out = clamped;
        for class in AssetClass::ALL {
            out.set(class, clamped.get(class) / total);
        }
        out
    }

    /// Rounds every component to the nearest 1% and renormalizes.
    ///
    /// The rounded components rarely sum to exactly 1.0, so the final
    /// rescale is part of the contract, not an optional cleanup.
    pub fn rounded_to_percent(&self) -> Self {
        let mut rounded = *self;
        for class in AssetClass::ALL {
            rounded.set(class, (self.get(class) * 100.0).round() / 100.0);
        }
        rounded.normalized()
    }

    /// Checks the pipeline invariants: finite, non-negative, sum within
    /// tolerance of 1.0.
    pub fn validate(&self) -> Result<(), AllocationError> {
        for (class, weight) in self.iter() {
            if !weight.is_finite() {
                return Err(AllocationError::NonFiniteWeight { class });
            }
            if weight < 0.0 {
                return Err(AllocationError::InvalidWeights(format!(
                    "{class} weight {weight} is negative"
                )));
            }
        }
        let total = self.total();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(AllocationError::InvalidWeights(format!(
                "weights sum to {total}, expected 1.0"
            )));
        }
        Ok(())
    }
}
