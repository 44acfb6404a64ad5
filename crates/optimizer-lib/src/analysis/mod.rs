//! Cost and scaling analysis
//!
//! This module provides:
//! - The cost-based scaling analyzer (Upgrade / Downgrade / Optimal)
//! - A price-free capacity check on resource deltas
//! - Request and response types for the optimize boundary

mod capacity;
mod scaling;


pub use capacity::{capacity_check, CapacityCheck, DEFAULT_HEADROOM};
pub use scaling::{AnalyzerConfig, DecisionPolicy, ScalingAnalyzer, COST_EPSILON};

use crate::models::{Configuration, ResourceDelta, ResourceRequirement, ScalingDecision};
use crate::search::{SearchParams, SearchStats, Strategy};
use serde::{Deserialize, Serialize};

/// Input to one optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub requirement: ResourceRequirement,
    #[serde(default)]
    pub current_configuration: Configuration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_parameters: Option<SearchParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

/// Outcome of one optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResponse {
    pub decision: ScalingDecision,
    /// `None` when no configuration satisfies the requirement
    pub optimal_configuration: Option<Configuration>,
    pub optimal_cost: f64,
    pub current_cost: f64,
    pub savings: f64,
    /// Required minus currently provided resources
    pub resource_delta: ResourceDelta,
    pub strategy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_stats: Option<SearchStats>,
}
