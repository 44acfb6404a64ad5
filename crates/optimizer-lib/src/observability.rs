//! Observability infrastructure for the optimizer
//!
//! Provides:
//! - Prometheus metrics (run latency, decisions, fitness evaluations, savings)
//! - Structured JSON logging with tracing

use crate::analysis::OptimizationResponse;
use crate::models::{ResourceRequirement, ScalingDecision};
use prometheus::{
    register_gauge, register_histogram, register_int_counter, register_int_counter_vec, Gauge,
    Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for optimization run latency (in seconds)
const RUN_LATENCY_BUCKETS: &[f64] = &[
    0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<OptimizerMetricsInner> = OnceLock::new();

struct OptimizerMetricsInner {
    run_latency_seconds: Histogram,
    runs_total: IntCounter,
    fitness_evaluations_total: IntCounter,
    decisions_total: IntCounterVec,
    infeasible_requirements_total: IntCounter,
    deadline_exceeded_total: IntCounter,
    last_savings_usd_per_hour: Gauge,
}

impl OptimizerMetricsInner {
    fn new() -> Self {
        Self {
            run_latency_seconds: register_histogram!(
                "cost_optimizer_run_latency_seconds",
                "Time spent searching and classifying one optimization request",
                RUN_LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register run_latency_seconds"),

            runs_total: register_int_counter!(
                "cost_optimizer_runs_total",
                "Total number of optimization runs"
            )
            .expect("Failed to register runs_total"),

            fitness_evaluations_total: register_int_counter!(
                "cost_optimizer_fitness_evaluations_total",
                "Total number of fitness evaluations across evolutionary runs"
            )
            .expect("Failed to register fitness_evaluations_total"),

            decisions_total: register_int_counter_vec!(
                "cost_optimizer_decisions_total",
                "Scaling decisions by outcome",
                &["decision"]
            )
            .expect("Failed to register decisions_total"),

            infeasible_requirements_total: register_int_counter!(
                "cost_optimizer_infeasible_requirements_total",
                "Requests no configuration could satisfy"
            )
            .expect("Failed to register infeasible_requirements_total"),

            deadline_exceeded_total: register_int_counter!(
                "cost_optimizer_deadline_exceeded_total",
                "Requests whose search was stopped at the run deadline"
            )
            .expect("Failed to register deadline_exceeded_total"),

            last_savings_usd_per_hour: register_gauge!(
                "cost_optimizer_last_savings_usd_per_hour",
                "Savings reported by the most recent optimization run"
            )
            .expect("Failed to register last_savings_usd_per_hour"),
        }
    }
}

/// Optimizer metrics for Prometheus exposition
///
/// A lightweight handle to the global metrics instance; clones share the
/// same collectors.
#[derive(Clone)]
pub struct OptimizerMetrics {
    _private: (),
}

impl Default for OptimizerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimizerMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(OptimizerMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &OptimizerMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record one finished run
    pub fn observe_run_latency(&self, duration_secs: f64) {
        self.inner().run_latency_seconds.observe(duration_secs);
        self.inner().runs_total.inc();
    }

    pub fn add_evaluations(&self, count: u64) {
        self.inner().fitness_evaluations_total.inc_by(count);
    }

    pub fn inc_decision(&self, decision: ScalingDecision) {
        self.inner()
            .decisions_total
            .with_label_values(&[decision.as_str()])
            .inc();
    }

    pub fn inc_infeasible(&self) {
        self.inner().infeasible_requirements_total.inc();
    }

    pub fn inc_deadline_exceeded(&self) {
        self.inner().deadline_exceeded_total.inc();
    }

    pub fn deadline_exceeded_total(&self) -> u64 {
        self.inner().deadline_exceeded_total.get()
    }

    pub fn set_last_savings(&self, savings: f64) {
        self.inner().last_savings_usd_per_hour.set(savings);
    }

    pub fn runs_total(&self) -> u64 {
        self.inner().runs_total.get()
    }
}

/// Structured logger for optimizer events
#[derive(Clone)]
pub struct StructuredLogger {
    source: String,
}

impl StructuredLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn log_catalog_loaded(&self, path: &str, instances: usize, fingerprint: &str) {
        info!(
            event = "catalog_loaded",
            source = %self.source,
            path = %path,
            instances = instances,
            fingerprint = %fingerprint,
            "Instance catalog loaded"
        );
    }

    pub fn log_optimization_started(
        &self,
        strategy: &str,
        requirement: &ResourceRequirement,
        current_cost: f64,
    ) {
        info!(
            event = "optimization_started",
            source = %self.source,
            strategy = %strategy,
            required_vcpus = requirement.vcpus,
            required_memory_gib = requirement.memory_gib,
            current_cost = current_cost,
            "Optimization started"
        );
    }

    pub fn log_optimization_completed(&self, response: &OptimizationResponse, elapsed_secs: f64) {
        info!(
            event = "optimization_completed",
            source = %self.source,
            strategy = %response.strategy,
            decision = %response.decision,
            current_cost = response.current_cost,
            optimal_cost = response.optimal_cost,
            savings = response.savings,
            evaluations = response.search_stats.as_ref().map(|s| s.evaluations),
            elapsed_ms = (elapsed_secs * 1000.0) as u64,
            "Optimization completed"
        );
    }

    pub fn log_infeasible(&self, strategy: &str, requirement: &ResourceRequirement) {
        warn!(
            event = "infeasible_requirement",
            source = %self.source,
            strategy = %strategy,
            required_vcpus = requirement.vcpus,
            required_memory_gib = requirement.memory_gib,
            "No configuration satisfies the requirement, recommending upgrade"
        );
    }

    pub fn log_deadline_exceeded(&self, strategy: &str, generations: u32) {
        warn!(
            event = "deadline_exceeded",
            source = %self.source,
            strategy = %strategy,
            generations = generations,
            "Search stopped at the run deadline"
        );
    }

    pub fn log_startup(&self, version: &str, port: u16) {
        info!(
            event = "service_started",
            source = %self.source,
            version = %version,
            port = port,
            "Cost optimizer service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            source = %self.source,
            reason = %reason,
            "Cost optimizer service shutting down"
        );
    }
}
