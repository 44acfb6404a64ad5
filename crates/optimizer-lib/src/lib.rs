//! Cloud instance cost optimizer
//!
//! This crate provides the core functionality for:
//! - Loading and validating instance catalogs
//! - Evolutionary and direct-pricing search for minimum-cost configurations
//! - Upgrade / downgrade / optimal scaling decisions
//! - Metrics and structured logging

pub mod analysis;
pub mod catalog;
pub mod error;
pub mod models;
pub mod observability;
pub mod search;

pub use analysis::{
    capacity_check, AnalyzerConfig, CapacityCheck, DecisionPolicy, OptimizationRequest,
    OptimizationResponse, ScalingAnalyzer, DEFAULT_HEADROOM,
};
pub use catalog::Catalog;
pub use error::{CatalogError, ConfigurationError, OptimizerError, OptimizerResult};
pub use models::*;
pub use observability::{OptimizerMetrics, StructuredLogger};
pub use search::{FitnessPolicy, SearchParams, SearchStats, Strategy};
