//! Configuration search engine

mod direct;
mod fitness;
mod genetic;
mod operators;
mod params;


pub use direct::{cheapest_feasible, DirectPricing};
pub use fitness::{evaluate, surplus_ratio, FitnessEvaluator};
pub use genetic::{EvolutionaryOptimizer, SearchStats};
pub use operators::{crossover, mutate, random_configuration};
pub use params::{
    FitnessPolicy, SearchParams, DEFAULT_ELITE_COUNT, DEFAULT_GENERATIONS, DEFAULT_MAX_COUNT,
    DEFAULT_MUTATION_RATE, DEFAULT_PARENT_POOL, DEFAULT_POP_SIZE, MAX_GENERATIONS, MAX_POP_SIZE,
};

use crate::catalog::Catalog;
use crate::error::OptimizerResult;
use crate::models::{Configuration, ResourceRequirement};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Candidate produced by a search strategy
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub configuration: Configuration,
    /// Present for evolutionary runs
    pub stats: Option<SearchStats>,
}

/// Trait for candidate search implementations
pub trait ConfigurationSearch: Send + Sync {
    /// Produce a candidate configuration for the requirement
    fn search(
        &self,
        catalog: &Catalog,
        requirement: &ResourceRequirement,
        rng: &mut dyn RngCore,
    ) -> OptimizerResult<SearchOutcome>;

    /// Short strategy name for logs and responses
    fn name(&self) -> &'static str;
}

/// Which search feeds the scaling analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Evolutionary,
    DirectPricing,
}

impl Strategy {
    /// Instantiate the strategy; `params` only applies to the evolutionary search
    pub fn build(self, params: SearchParams) -> OptimizerResult<Box<dyn ConfigurationSearch>> {
        self.build_with_deadline(params, None)
    }

    /// Like `build`, with the evolutionary search stopping at `deadline`
    pub fn build_with_deadline(
        self,
        params: SearchParams,
        deadline: Option<Instant>,
    ) -> OptimizerResult<Box<dyn ConfigurationSearch>> {
        match self {
            Strategy::Evolutionary => {
                let optimizer = EvolutionaryOptimizer::new(params)?;
                Ok(match deadline {
                    Some(deadline) => Box::new(optimizer.with_deadline(deadline)),
                    None => Box::new(optimizer),
                })
            }
            Strategy::DirectPricing => Ok(Box::new(DirectPricing::new())),
        }
    }
}
