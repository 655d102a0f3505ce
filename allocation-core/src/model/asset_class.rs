use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of asset classes every weight vector is keyed by.
///
/// The order of `ALL` is the canonical iteration order used by the fixed
/// risk tables; `index()` maps into their arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Cash,
    Bonds,
    Shares,
    Commodities,
    Crypto,
}

impl AssetClass {
    pub const COUNT: usize = 5;

    pub const ALL: [AssetClass; AssetClass::COUNT] = [
        AssetClass::Cash,
        AssetClass::Bonds,
        AssetClass::Shares,
        AssetClass::Commodities,
        AssetClass::Crypto,
    ];

    /// Position of this class in the canonical table order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Classes the risk-budget and safety stages treat as growth/risk
    /// assets. Cash and bonds are the safe side.
    pub fn is_risky(self) -> bool {
        matches!(
            self,
            AssetClass::Shares | AssetClass::Commodities | AssetClass::Crypto
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            AssetClass::Cash => "cash",
            AssetClass::Bonds => "bonds",
            AssetClass::Shares => "shares",
            AssetClass::Commodities => "commodities",
            AssetClass::Crypto => "crypto",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
