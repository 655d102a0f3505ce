use serde::{Deserialize, Serialize};
use std::fmt;

/// A value in percentage points (`Percent(15.0)` means 15%).
///
/// Volatility moves between percentage and fractional representation at
/// several call boundaries; keeping the percentage form as a distinct type
/// makes the conversion explicit instead of a silent unit bug.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub f64);

impl Percent {
    pub fn from_fraction(fraction: f64) -> Self {
        Percent(fraction * 100.0)
    }

    pub fn as_fraction(self) -> f64 {
        self.0 / 100.0
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}
