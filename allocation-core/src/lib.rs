//! # Allocation Core Library
//!
//! Deterministic portfolio-allocation arithmetic over the five fixed asset
//! classes (cash, bonds, shares, commodities, crypto).
//!
//! ## Modules
//! - `model`: Value types (AssetClass, Weights, RiskLevel, Percent) with
//!   invariants enforced at construction.
//! - `tables`: Immutable house-view risk tables (base allocations, tilts,
//!   bounds, return assumptions).
//! - `covariance`: Portfolio volatility estimation via the fixed
//!   volatility/correlation model.
//! - `policy`: The policy-weight engine (base -> tilt -> tilt -> clamp ->
//!   normalize -> round).
//! - `risk_budget`: Post-hoc scaling of an allocation toward a target
//!   volatility.
//! - `analytics`: Risk attribution, parametric VaR, limit checks, stress
//!   tests and the aggregate risk report.
//!
//! Everything here is pure and synchronous: each call computes from scratch
//! against shared read-only tables, so the library can be invoked
//! concurrently without locking.

pub mod analytics;
pub mod covariance;
pub mod error;
pub mod model;
pub mod policy;
pub mod risk_budget;
pub mod tables;

pub use covariance::CovarianceModel;
pub use error::AllocationError;
pub use model::{AssetClass, Horizon, Percent, RiskLevel, VolBucket, Weights};
pub use policy::PolicyWeightEngine;
pub use risk_budget::RiskBudgetAdjuster;
