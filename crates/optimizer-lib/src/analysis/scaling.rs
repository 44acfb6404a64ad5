//! Scaling decision against a discovered optimum
//!
//! The candidate from the search is always re-checked for feasibility here,
//! since the evolutionary search returns something even when nothing in its
//! final population covers the requirement.

use super::{OptimizationRequest, OptimizationResponse};
use crate::catalog::Catalog;
use crate::error::{OptimizerError, OptimizerResult};
use crate::models::{Configuration, ResourceRequirement, ScalingDecision};
use crate::observability::{OptimizerMetrics, StructuredLogger};
use crate::search::{ConfigurationSearch, SearchParams, SearchStats};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Cost differences below this are treated as equal
pub const COST_EPSILON: f64 = 1e-9;

/// Materiality rule for reporting a downgrade
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionPolicy {
    /// Any positive saving is a downgrade
    #[default]
    Strict,
    /// Savings must exceed a fixed absolute amount per hour
    Material { threshold: f64 },
}

impl DecisionPolicy {
    pub fn is_material(&self, savings: f64) -> bool {
        match self {
            DecisionPolicy::Strict => savings > COST_EPSILON,
            DecisionPolicy::Material { threshold } => savings > threshold.max(COST_EPSILON),
        }
    }
}

/// Analyzer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub decision_policy: DecisionPolicy,
    /// Parameters used when the request does not carry its own
    pub search: SearchParams,
}

/// Compares a current configuration with the cheapest one found
pub struct ScalingAnalyzer {
    config: AnalyzerConfig,
    metrics: Option<OptimizerMetrics>,
    logger: Option<StructuredLogger>,
}

impl ScalingAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            metrics: None,
            logger: None,
        }
    }

    pub fn with_metrics(mut self, metrics: OptimizerMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Handle a full request: pick the strategy, search, then classify
    pub fn optimize(
        &self,
        catalog: &Catalog,
        request: &OptimizationRequest,
        rng: &mut dyn RngCore,
    ) -> OptimizerResult<OptimizationResponse> {
        self.optimize_until(catalog, request, None, rng)
    }

    /// `optimize` bounded by a deadline.
    ///
    /// A run that has not finished by `deadline` returns
    /// `OptimizerError::DeadlineExceeded` and records nothing.
    pub fn optimize_until(
        &self,
        catalog: &Catalog,
        request: &OptimizationRequest,
        deadline: Option<Instant>,
        rng: &mut dyn RngCore,
    ) -> OptimizerResult<OptimizationResponse> {
        let params = request
            .search_parameters
            .clone()
            .unwrap_or_else(|| self.config.search.clone());
        let search = request
            .strategy
            .unwrap_or_default()
            .build_with_deadline(params, deadline)?;
        self.run_analysis(
            &request.current_configuration,
            &request.requirement,
            catalog,
            search.as_ref(),
            deadline,
            rng,
        )
    }

    /// Classify `current` against the candidate produced by `search`
    pub fn analyze(
        &self,
        current: &Configuration,
        requirement: &ResourceRequirement,
        catalog: &Catalog,
        search: &dyn ConfigurationSearch,
        rng: &mut dyn RngCore,
    ) -> OptimizerResult<OptimizationResponse> {
        self.run_analysis(current, requirement, catalog, search, None, rng)
    }

    fn run_analysis(
        &self,
        current: &Configuration,
        requirement: &ResourceRequirement,
        catalog: &Catalog,
        search: &dyn ConfigurationSearch,
        deadline: Option<Instant>,
        rng: &mut dyn RngCore,
    ) -> OptimizerResult<OptimizationResponse> {
        let start = Instant::now();
        requirement.validate()?;

        let current_totals = catalog.totals(current)?;
        let current_cost = current_totals.hourly_cost;
        let resource_delta = current_totals.delta_to(requirement);

        if let Some(logger) = &self.logger {
            logger.log_optimization_started(search.name(), requirement, current_cost);
        }

        let (candidate, stats) = match search.search(catalog, requirement, rng) {
            Ok(outcome) => (Some(outcome.configuration), outcome.stats),
            Err(OptimizerError::InfeasibleRequirement { .. }) => (None, None),
            Err(OptimizerError::DeadlineExceeded { generations }) => {
                return Err(self.deadline_exceeded(search.name(), generations));
            }
            Err(e) => return Err(e),
        };

        // The search may finish its last generation after the deadline.
        if deadline.is_some_and(|d| Instant::now() >= d) {
            let generations = stats.as_ref().map_or(0, |s| s.generations);
            return Err(self.deadline_exceeded(search.name(), generations));
        }

        let feasible = match &candidate {
            Some(config) => Some((catalog.totals(config)?, config)),
            None => None,
        }
        .filter(|(totals, _)| totals.satisfies(requirement));

        let response = match feasible {
            None => {
                if let Some(logger) = &self.logger {
                    logger.log_infeasible(search.name(), requirement);
                }
                OptimizationResponse {
                    decision: ScalingDecision::Upgrade,
                    optimal_configuration: None,
                    optimal_cost: 0.0,
                    current_cost,
                    savings: 0.0,
                    resource_delta,
                    strategy: search.name().to_string(),
                    search_stats: stats,
                }
            }
            Some((totals, config)) => {
                let optimal_cost = totals.hourly_cost;
                let mut savings = current_cost - optimal_cost;
                if savings.abs() < COST_EPSILON {
                    savings = 0.0;
                }
                OptimizationResponse {
                    decision: self.classify(current_cost, optimal_cost),
                    optimal_configuration: Some(config.without_zero_counts()),
                    optimal_cost,
                    current_cost,
                    savings,
                    resource_delta,
                    strategy: search.name().to_string(),
                    search_stats: stats,
                }
            }
        };

        self.record(&response, start.elapsed().as_secs_f64());
        Ok(response)
    }

    /// Upgrade when the optimum costs more, downgrade on material savings
    pub fn classify(&self, current_cost: f64, optimal_cost: f64) -> ScalingDecision {
        let savings = current_cost - optimal_cost;
        if optimal_cost > current_cost + COST_EPSILON {
            ScalingDecision::Upgrade
        } else if self.config.decision_policy.is_material(savings) {
            ScalingDecision::Downgrade
        } else {
            ScalingDecision::Optimal
        }
    }

    fn deadline_exceeded(&self, strategy: &str, generations: u32) -> OptimizerError {
        if let Some(logger) = &self.logger {
            logger.log_deadline_exceeded(strategy, generations);
        }
        OptimizerError::DeadlineExceeded { generations }
    }

    fn record(&self, response: &OptimizationResponse, elapsed_secs: f64) {
        if let Some(metrics) = &self.metrics {
            metrics.observe_run_latency(elapsed_secs);
            metrics.inc_decision(response.decision);
            if response.optimal_configuration.is_none() {
                metrics.inc_infeasible();
            }
            if let Some(SearchStats { evaluations, .. }) = &response.search_stats {
                metrics.add_evaluations(*evaluations);
            }
            metrics.set_last_savings(response.savings);
        }
        if let Some(logger) = &self.logger {
            logger.log_optimization_completed(response, elapsed_secs);
        }
    }
}

impl Default for ScalingAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_policy() {
        let policy = DecisionPolicy::Strict;
        assert!(policy.is_material(0.01));
        assert!(!policy.is_material(0.0));
        assert!(!policy.is_material(1e-12));
    }

    #[test]
    fn test_material_policy() {
        let policy = DecisionPolicy::Material { threshold: 5.0 };
        assert!(!policy.is_material(5.0));
        assert!(policy.is_material(5.01));
    }

    #[test]
    fn test_classify_order() {
        let analyzer = ScalingAnalyzer::default();
        assert_eq!(analyzer.classify(1.0, 2.0), ScalingDecision::Upgrade);
        assert_eq!(analyzer.classify(1.0, 0.5), ScalingDecision::Downgrade);
        assert_eq!(analyzer.classify(1.0, 1.0), ScalingDecision::Optimal);

        let lenient = ScalingAnalyzer::new(AnalyzerConfig {
            decision_policy: DecisionPolicy::Material { threshold: 5.0 },
            ..Default::default()
        });
        assert_eq!(lenient.classify(1.0, 0.5), ScalingDecision::Optimal);
        assert_eq!(lenient.classify(10.0, 2.0), ScalingDecision::Downgrade);
    }

    #[test]
    fn test_policy_json_shape() {
        let policy: DecisionPolicy =
            serde_json::from_str(r#"{"kind": "material", "threshold": 5.0}"#).unwrap();
        assert_eq!(policy, DecisionPolicy::Material { threshold: 5.0 });
        let strict: DecisionPolicy = serde_json::from_str(r#"{"kind": "strict"}"#).unwrap();
        assert_eq!(strict, DecisionPolicy::Strict);
    }
}
