//! Safety guardrails applied to an allocation before trades are sized.
//!
//! Each adjustment is an independent, pure weight transform returning the
//! new vector plus a human-readable audit message. The chain threads the
//! vector through every stage in order and collects the messages for
//! display; messages never feed back into the computation.

use allocation_core::Weights;

pub mod drawdown;
pub mod sleep_better;

pub use drawdown::DrawdownSeatbelt;
pub use sleep_better::SleepBetterShift;

pub trait SafetyAdjustment {
    /// Name of the adjustment, for logging and audit output.
    fn name(&self) -> &str;

    /// Applies the adjustment, returning the new vector and a message
    /// describing what changed.
    fn apply(&self, weights: &Weights) -> (Weights, String);
}

/// Ordered chain of safety adjustments.
pub struct SafetyChain {
    stages: Vec<Box<dyn SafetyAdjustment>>,
}

impl Default for SafetyChain {
    fn default() -> Self {
        Self::new()
    }
}

impl SafetyChain {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn add_stage(&mut self, stage: Box<dyn SafetyAdjustment>) {
        self.stages.push(stage);
    }

    /// Runs every stage in order; stage N's output is stage N+1's input.
    pub fn run(&self, weights: &Weights) -> (Weights, Vec<String>) {
        let mut current = *weights;
        let mut messages = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let (adjusted, message) = stage.apply(&current);
            log::info!("{}: {}", stage.name(), message);
            current = adjusted;
            messages.push(message);
        }
        (current, messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocation_core::AssetClass;

    #[test]
    fn test_chain_threads_output_and_collects_messages() {
        let mut chain = SafetyChain::new();
        chain.add_stage(Box::new(SleepBetterShift::new(1.0)));
        chain.add_stage(Box::new(DrawdownSeatbelt::with_defaults(0.25)));

        let start = Weights::new(0.05, 0.15, 0.65, 0.09, 0.06);
        let (adjusted, messages) = chain.run(&start);

        adjusted.validate().unwrap();
        assert_eq!(messages.len(), 2);
        // The full dial moves 20% out of shares before the seatbelt runs.
        assert!(adjusted.get(AssetClass::Shares) < start.get(AssetClass::Shares));
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = SafetyChain::new();
        let start = Weights::equal();
        let (adjusted, messages) = chain.run(&start);
        assert_eq!(adjusted, start);
        assert!(messages.is_empty());
    }
}
