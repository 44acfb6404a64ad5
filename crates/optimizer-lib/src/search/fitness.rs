//! Fitness evaluation
//!
//! Infeasible configurations score exactly 0; they stay in the population
//! and are driven out by selection. A non-zero score always implies the
//! configuration covers the requirement.

use super::FitnessPolicy;
use crate::catalog::Catalog;
use crate::error::ConfigurationError;
use crate::models::{Configuration, ResourceRequirement, ResourceTotals};

/// Scores configurations against a fixed requirement
pub struct FitnessEvaluator<'a> {
    catalog: &'a Catalog,
    requirement: ResourceRequirement,
    policy: FitnessPolicy,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(
        catalog: &'a Catalog,
        requirement: ResourceRequirement,
        policy: FitnessPolicy,
    ) -> Self {
        Self {
            catalog,
            requirement,
            policy,
        }
    }

    /// Score a configuration keyed by instance id
    pub fn evaluate(&self, config: &Configuration) -> Result<f64, ConfigurationError> {
        let totals = self.catalog.totals(config)?;
        Ok(self.score(&totals))
    }

    /// Score a count vector aligned with catalog order
    pub fn score_counts(&self, counts: &[u32]) -> f64 {
        self.score(&self.catalog.totals_for_counts(counts))
    }

    /// Score precomputed totals
    pub fn score(&self, totals: &ResourceTotals) -> f64 {
        if !totals.satisfies(&self.requirement) {
            return 0.0;
        }

        // Only the all-zero configuration is free, and it is feasible only
        // for an all-zero requirement.
        if totals.hourly_cost <= 0.0 {
            return f64::MAX;
        }

        let base = 1.0 / totals.hourly_cost;
        match self.policy {
            FitnessPolicy::InverseCost => base,
            FitnessPolicy::SurplusPenalized => {
                let surplus = surplus_ratio(totals.vcpus as f64, self.requirement.vcpus as f64)
                    + surplus_ratio(totals.memory_gib, self.requirement.memory_gib);
                base / (1.0 + surplus)
            }
        }
    }

    pub fn requirement(&self) -> &ResourceRequirement {
        &self.requirement
    }
}

/// Fractional overshoot `(aggregate - required) / required`, 0 when nothing is required
pub fn surplus_ratio(aggregate: f64, required: f64) -> f64 {
    if required <= 0.0 {
        return 0.0;
    }
    ((aggregate - required) / required).max(0.0)
}

/// Score a configuration with the default policy
pub fn evaluate(
    config: &Configuration,
    catalog: &Catalog,
    requirement: &ResourceRequirement,
) -> Result<f64, ConfigurationError> {
    FitnessEvaluator::new(catalog, *requirement, FitnessPolicy::default()).evaluate(config)
}
