use super::SafetyAdjustment;
use allocation_core::tables::ReturnAssumptions;
use allocation_core::{AssetClass, Weights};

/// De-risks an allocation whose weighted expected drawdown exceeds the
/// acceptable maximum: risky classes are scaled by `max/expected` and the
/// freed weight moves into bonds. Idempotent once under the threshold.
pub struct DrawdownSeatbelt {
    max_drawdown: f64,
    assumptions: ReturnAssumptions,
}

impl DrawdownSeatbelt {
    pub fn new(max_drawdown: f64, assumptions: ReturnAssumptions) -> Self {
        Self {
            max_drawdown,
            assumptions,
        }
    }

    pub fn with_defaults(max_drawdown: f64) -> Self {
        Self::new(max_drawdown, ReturnAssumptions::default())
    }

    pub fn expected_drawdown(&self, weights: &Weights) -> f64 {
        self.assumptions.portfolio_drawdown(weights)
    }
}

impl SafetyAdjustment for DrawdownSeatbelt {
    fn name(&self) -> &str {
        "DrawdownSeatbelt"
    }

    fn apply(&self, weights: &Weights) -> (Weights, String) {
        let expected = self.expected_drawdown(weights);
        if expected <= self.max_drawdown {
            let message = format!(
                "expected drawdown {:.1}% within the {:.1}% limit",
                expected * 100.0,
                self.max_drawdown * 100.0
            );
            return (*weights, message);
        }

        let reduction_factor = self.max_drawdown / expected;
        let mut adjusted = *weights;
        let mut freed = 0.0;
        for class in AssetClass::ALL {
            if class.is_risky() {
                let old = weights.get(class);
                adjusted.set(class, old * reduction_factor);
                freed += old * (1.0 - reduction_factor);
            }
        }
        adjusted.add(AssetClass::Bonds, freed);

        let message = format!(
            "seatbelt engaged: expected drawdown {:.1}% over the {:.1}% limit, risky assets scaled by {:.2}",
            expected * 100.0,
            self.max_drawdown * 100.0,
            reduction_factor
        );
        (adjusted.normalized(), message)
    }
}
