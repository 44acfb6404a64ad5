//! Direct pricing: the cheapest single instance that covers the requirement

use super::{ConfigurationSearch, SearchOutcome};
use crate::catalog::Catalog;
use crate::error::{OptimizerError, OptimizerResult};
use crate::models::{Configuration, InstanceSpec, ResourceRequirement};
use rand::RngCore;

/// Non-evolutionary strategy that never combines instance types
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectPricing;

impl DirectPricing {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigurationSearch for DirectPricing {
    fn search(
        &self,
        catalog: &Catalog,
        requirement: &ResourceRequirement,
        _rng: &mut dyn RngCore,
    ) -> OptimizerResult<SearchOutcome> {
        Ok(SearchOutcome {
            configuration: cheapest_feasible(catalog, requirement)?,
            stats: None,
        })
    }

    fn name(&self) -> &'static str {
        "direct_pricing"
    }
}

/// Cheapest instance whose own vCPUs and memory each meet the requirement.
///
/// Ties go to the earlier catalog entry. Returns
/// `OptimizerError::InfeasibleRequirement` when no single type is large enough.
pub fn cheapest_feasible(
    catalog: &Catalog,
    requirement: &ResourceRequirement,
) -> OptimizerResult<Configuration> {
    let mut best: Option<&InstanceSpec> = None;
    for spec in catalog.instances() {
        if spec.vcpus < requirement.vcpus || spec.memory_gib < requirement.memory_gib {
            continue;
        }
        if best.map_or(true, |b| spec.hourly_price < b.hourly_price) {
            best = Some(spec);
        }
    }

    best.map(|spec| Configuration::single(spec.id.clone(), 1))
        .ok_or(OptimizerError::InfeasibleRequirement {
            vcpus: requirement.vcpus,
            memory_gib: requirement.memory_gib,
        })
}
