use crate::model::AssetClass;
use thiserror::Error;

/// Errors raised while validating allocation inputs.
///
/// All errors are local to a single allocation request; nothing here spans
/// requests or requires compensating actions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("risk level {0} is outside the supported range 1..=5")]
    InvalidRiskLevel(u8),
    #[error("unknown investment horizon {0:?} (expected short, medium or long)")]
    InvalidHorizon(String),
    #[error("invalid covariance model: {0}")]
    InvalidCovariance(String),
    #[error("weight for {class} is not finite")]
    NonFiniteWeight { class: AssetClass },
    #[error("invalid weight vector: {0}")]
    InvalidWeights(String),
}
