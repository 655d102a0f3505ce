//! Value types shared by every stage of the allocation pipeline.
//!
//! The weight vector and its index type are fixed-shape records over the
//! closed asset-class set, never string-keyed bags, so the compiler catches
//! the key-typo and unit-mismatch bugs a dynamic mapping would let through.

pub mod asset_class;
pub mod percent;
pub mod profile;
pub mod weights;

pub use asset_class::AssetClass;
pub use percent::Percent;
pub use profile::{Horizon, RiskLevel, RiskProfile, VolBucket};
pub use weights::Weights;
