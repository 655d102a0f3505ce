use super::SafetyAdjustment;
use allocation_core::{AssetClass, Weights};

/// Largest share-to-bond shift the dial can request, at full conservative.
const MAX_SHIFT: f64 = 0.20;

/// Moves weight from shares to bonds in proportion to the user's
/// sleep-better dial (0 = aggressive, no change; 1 = most conservative,
/// full 20% shift). Bounded so shares never goes negative.
pub struct SleepBetterShift {
    dial: f64,
}

impl SleepBetterShift {
    pub fn new(dial: f64) -> Self {
        Self {
            dial: dial.clamp(0.0, 1.0),
        }
    }
}

impl SafetyAdjustment for SleepBetterShift {
    fn name(&self) -> &str {
        "SleepBetterShift"
    }

    fn apply(&self, weights: &Weights) -> (Weights, String) {
        if self.dial <= 0.0 {
            return (
                *weights,
                "sleep-better dial at aggressive setting, no adjustment".to_string(),
            );
        }

        let requested = self.dial * MAX_SHIFT;
        let moved = requested.min(weights.get(AssetClass::Shares));

        let mut adjusted = *weights;
        adjusted.add(AssetClass::Shares, -moved);
        adjusted.add(AssetClass::Bonds, moved);

        let message = format!(
            "sleep-better dial {:.2} moved {:.1}% from shares to bonds",
            self.dial,
            moved * 100.0
        );
        (adjusted.normalized(), message)
    }
}
