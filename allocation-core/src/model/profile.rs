use crate::error::AllocationError;
use crate::model::Percent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Investment time horizon.
///
/// Some upstream callers use the `short_term`/`medium_term`/`long_term`
/// spelling; `FromStr` accepts both so the pipeline only ever sees one
/// naming scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Short,
    Medium,
    Long,
}

impl FromStr for Horizon {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "short" | "short_term" => Ok(Horizon::Short),
            "medium" | "medium_term" => Ok(Horizon::Medium),
            "long" | "long_term" => Ok(Horizon::Long),
            other => Err(AllocationError::InvalidHorizon(other.to_string())),
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Horizon::Short => "short",
            Horizon::Medium => "medium",
            Horizon::Long => "long",
        };
        f.write_str(name)
    }
}

/// Risk appetite on the 1 (most conservative) to 5 (most aggressive) scale.
///
/// Construction validates the range, so downstream table lookups can never
/// fail. There is deliberately no silent fallback to a "safe" default: a bad
/// level is the caller's error to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RiskLevel(u8);

impl RiskLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self, AllocationError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(RiskLevel(level))
        } else {
            Err(AllocationError::InvalidRiskLevel(level))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// All valid levels, in ascending order. Handy for table checks.
    pub fn all() -> impl Iterator<Item = RiskLevel> {
        (Self::MIN..=Self::MAX).map(RiskLevel)
    }
}

impl TryFrom<u8> for RiskLevel {
    type Error = AllocationError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        RiskLevel::new(level)
    }
}

impl From<RiskLevel> for u8 {
    fn from(level: RiskLevel) -> u8 {
        level.0
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Volatility-tolerance bucket derived from the stated maximum volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolBucket {
    Low,
    Mid,
    High,
}

impl VolBucket {
    /// Buckets a volatility tolerance: below 30% is low, 30-60% inclusive
    /// is mid, above 60% is high.
    pub fn classify(max_vol: Percent) -> Self {
        let v = max_vol.value();
        if v < 30.0 {
            VolBucket::Low
        } else if v <= 60.0 {
            VolBucket::Mid
        } else {
            VolBucket::High
        }
    }
}

/// The immutable input triple for one allocation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    horizon: Horizon,
    risk_level: RiskLevel,
    max_vol: Percent,
}

impl RiskProfile {
    pub fn new(horizon: Horizon, risk_level: RiskLevel, max_vol: Percent) -> Self {
        Self {
            horizon,
            risk_level,
            max_vol,
        }
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn max_vol(&self) -> Percent {
        self.max_vol
    }

    pub fn vol_bucket(&self) -> VolBucket {
        VolBucket::classify(self.max_vol)
    }
}
