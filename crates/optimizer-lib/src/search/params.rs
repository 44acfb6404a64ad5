//! Search parameters and fitness policy

use crate::error::{OptimizerError, OptimizerResult};
use serde::{Deserialize, Serialize};

/// Default population size
pub const DEFAULT_POP_SIZE: usize = 20;

/// Default number of generations
pub const DEFAULT_GENERATIONS: u32 = 100;

/// Default per-child mutation probability
pub const DEFAULT_MUTATION_RATE: f64 = 0.1;

/// Default upper bound for random initial counts
pub const DEFAULT_MAX_COUNT: u32 = 10;

/// Individuals carried into the next generation unchanged
pub const DEFAULT_ELITE_COUNT: usize = 2;

/// Top-ranked individuals eligible as parents
pub const DEFAULT_PARENT_POOL: usize = 10;

/// Largest population a single run may allocate
pub const MAX_POP_SIZE: usize = 10_000;

/// Largest generation count a single run may request
pub const MAX_GENERATIONS: u32 = 100_000;

/// How feasible configurations are scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessPolicy {
    /// `1 / cost`
    #[default]
    InverseCost,
    /// `1 / cost` scaled by `1 / (1 + vcpu_surplus + memory_surplus)`
    SurplusPenalized,
}

/// Tunables for one evolutionary run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub pop_size: usize,
    pub generations: u32,
    pub mutation_rate: f64,
    /// Inclusive bound for each gene of a random configuration
    pub max_count: u32,
    pub elite_count: usize,
    pub parent_pool: usize,
    pub fitness_policy: FitnessPolicy,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            pop_size: DEFAULT_POP_SIZE,
            generations: DEFAULT_GENERATIONS,
            mutation_rate: DEFAULT_MUTATION_RATE,
            max_count: DEFAULT_MAX_COUNT,
            elite_count: DEFAULT_ELITE_COUNT,
            parent_pool: DEFAULT_PARENT_POOL,
            fitness_policy: FitnessPolicy::default(),
        }
    }
}

impl SearchParams {
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.pop_size == 0 {
            return Err(invalid("pop_size must be at least 1"));
        }
        if self.pop_size > MAX_POP_SIZE {
            return Err(invalid(format!(
                "pop_size must be at most {}, got {}",
                MAX_POP_SIZE, self.pop_size
            )));
        }
        if self.generations > MAX_GENERATIONS {
            return Err(invalid(format!(
                "generations must be at most {}, got {}",
                MAX_GENERATIONS, self.generations
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(invalid(format!(
                "mutation_rate must be within 0..=1, got {}",
                self.mutation_rate
            )));
        }
        if self.elite_count > self.pop_size {
            return Err(invalid(format!(
                "elite_count ({}) exceeds pop_size ({})",
                self.elite_count, self.pop_size
            )));
        }
        if self.parent_pool == 0 {
            return Err(invalid("parent_pool must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> OptimizerError {
    OptimizerError::InvalidParameters(message.into())
}
