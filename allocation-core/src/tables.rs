//! House-view risk tables.
//!
//! The numbers here are tuning choices, not validated financial truth: the
//! structs are plain serde-deserializable data with `Default` carrying the
//! house view, so a caller can swap in its own tables. They are built once
//! at startup and passed by reference; nothing mutates them at runtime.

use crate::model::{AssetClass, Horizon, RiskLevel, VolBucket, Weights};
use serde::{Deserialize, Serialize};

/// A per-class delta added to a weight vector by a tilt step.
///
/// Deltas are allowed to be negative and always sum to zero, so applying
/// one preserves the vector total (individual components may need the zero
/// clamp afterwards).
pub type TiltDelta = [f64; AssetClass::COUNT];

const ZERO_TILT: TiltDelta = [0.0; AssetClass::COUNT];

/// Base allocations and tilt deltas for the policy-weight engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyTables {
    /// Base weight vector per risk level 1..=5. Higher levels shift weight
    /// from bonds/cash toward shares/crypto monotonically.
    base_by_risk: [Weights; 5],
    short_tilt: TiltDelta,
    long_tilt: TiltDelta,
    low_vol_tilt: TiltDelta,
    high_vol_tilt: TiltDelta,
}

impl Default for PolicyTables {
    fn default() -> Self {
        Self {
            base_by_risk: [
                //           cash  bonds shares comm  crypto
                Weights::new(0.20, 0.55, 0.20, 0.04, 0.01),
                Weights::new(0.15, 0.45, 0.32, 0.06, 0.02),
                Weights::new(0.10, 0.35, 0.45, 0.07, 0.03),
                Weights::new(0.07, 0.25, 0.55, 0.09, 0.04),
                Weights::new(0.05, 0.15, 0.65, 0.09, 0.06),
            ],
            // Short horizons shelter in cash/bonds, long horizons lean the
            // other way. Medium is the zero delta.
            short_tilt: [0.05, 0.05, -0.06, -0.02, -0.02],
            long_tilt: [-0.03, -0.05, 0.05, 0.01, 0.02],
            low_vol_tilt: [0.04, 0.04, -0.05, -0.01, -0.02],
            high_vol_tilt: [-0.02, -0.04, 0.04, 0.01, 0.01],
        }
    }
}

impl PolicyTables {
    pub fn base_allocation(&self, level: RiskLevel) -> Weights {
        self.base_by_risk[(level.value() - 1) as usize]
    }

    pub fn horizon_tilt(&self, horizon: Horizon) -> TiltDelta {
        match horizon {
            Horizon::Short => self.short_tilt,
            Horizon::Medium => ZERO_TILT,
            Horizon::Long => self.long_tilt,
        }
    }

    pub fn vol_bucket_tilt(&self, bucket: VolBucket) -> TiltDelta {
        match bucket {
            VolBucket::Low => self.low_vol_tilt,
            VolBucket::Mid => ZERO_TILT,
            VolBucket::High => self.high_vol_tilt,
        }
    }
}

fn default_cash_floor() -> f64 {
    0.05
}

fn default_bonds_floor() -> f64 {
    0.10
}

fn default_bonds_floor_relaxed() -> f64 {
    0.05
}

fn default_commodities_cap() -> f64 {
    0.15
}

/// Floors and caps clamped onto the tilted allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundsPolicy {
    #[serde(default = "default_cash_floor")]
    cash_floor: f64,
    #[serde(default = "default_bonds_floor")]
    bonds_floor: f64,
    /// Lower bonds floor permitted only for the single riskiest corner:
    /// risk level 5, long horizon, high volatility bucket.
    #[serde(default = "default_bonds_floor_relaxed")]
    bonds_floor_relaxed: f64,
    #[serde(default = "default_commodities_cap")]
    commodities_cap: f64,
    /// Crypto cap tiered by volatility bucket: tightest at low, loosest at
    /// high.
    crypto_caps: CryptoCaps,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoCaps {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl Default for CryptoCaps {
    fn default() -> Self {
        Self {
            low: 0.05,
            mid: 0.10,
            high: 0.15,
        }
    }
}

impl Default for BoundsPolicy {
    fn default() -> Self {
        Self {
            cash_floor: default_cash_floor(),
            bonds_floor: default_bonds_floor(),
            bonds_floor_relaxed: default_bonds_floor_relaxed(),
            commodities_cap: default_commodities_cap(),
            crypto_caps: CryptoCaps::default(),
        }
    }
}

impl BoundsPolicy {
    pub fn cash_floor(&self) -> f64 {
        self.cash_floor
    }

    /// The bonds floor for a given request. The relaxed floor applies only
    /// to the (level 5, long, high) combination.
    pub fn bonds_floor(&self, level: RiskLevel, horizon: Horizon, bucket: VolBucket) -> f64 {
        if level.value() == RiskLevel::MAX
            && horizon == Horizon::Long
            && bucket == VolBucket::High
        {
            self.bonds_floor_relaxed
        } else {
            self.bonds_floor
        }
    }

    pub fn commodities_cap(&self) -> f64 {
        self.commodities_cap
    }

    pub fn crypto_cap(&self, bucket: VolBucket) -> f64 {
        match bucket {
            VolBucket::Low => self.crypto_caps.low,
            VolBucket::Mid => self.crypto_caps.mid,
            VolBucket::High => self.crypto_caps.high,
        }
    }
}

/// Per-class return and drawdown assumptions used by the analytics and
/// safety layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnAssumptions {
    /// Annualized expected return per class.
    expected_return: [f64; AssetClass::COUNT],
    /// Expected peak-to-trough drawdown per class.
    expected_drawdown: [f64; AssetClass::COUNT],
}

impl Default for ReturnAssumptions {
    fn default() -> Self {
        Self {
            //                cash  bonds shares comm  crypto
            expected_return: [0.03, 0.04, 0.08, 0.06, 0.12],
            expected_drawdown: [0.00, 0.05, 0.20, 0.25, 0.50],
        }
    }
}

impl ReturnAssumptions {
    pub fn class_return(&self, class: AssetClass) -> f64 {
        self.expected_return[class.index()]
    }

    pub fn class_drawdown(&self, class: AssetClass) -> f64 {
        self.expected_drawdown[class.index()]
    }

    /// Weighted expected annual return of an allocation, as a fraction.
    pub fn portfolio_return(&self, weights: &Weights) -> f64 {
        weights
            .iter()
            .map(|(class, w)| w * self.class_return(class))
            .sum()
    }

    /// Weighted expected drawdown of an allocation, as a fraction.
    pub fn portfolio_drawdown(&self, weights: &Weights) -> f64 {
        weights
            .iter()
            .map(|(class, w)| w * self.class_drawdown(class))
            .sum()
    }
}
