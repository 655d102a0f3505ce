pub mod config;

pub use config::PlannerConfig;
