//! Evolutionary search over instance-count vectors
//!
//! Each generation is ranked by fitness, the elites are copied over
//! unchanged, and the rest of the next population is bred from parents drawn
//! uniformly out of the top-ranked pool. The run lasts exactly
//! `generations` rounds unless a deadline is set and passes first; the
//! deadline is checked once per generation.

use super::operators::{crossover, mutate, random_configuration};
use super::{ConfigurationSearch, FitnessEvaluator, SearchOutcome, SearchParams};
use crate::catalog::Catalog;
use crate::error::{OptimizerError, OptimizerResult};
use crate::models::{Configuration, ResourceRequirement};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Instant;
use tracing::{debug, trace};

/// Summary of a finished evolutionary run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Generations actually completed
    pub generations: u32,
    pub evaluations: u64,
    pub best_fitness: f64,
    /// Whether the winner scored above zero
    pub feasible: bool,
    pub elapsed_ms: u64,
    /// Stopped early because the deadline passed
    #[serde(default)]
    pub interrupted: bool,
}

#[derive(Debug, Clone)]
struct Individual {
    genes: Vec<u32>,
    fitness: f64,
}

/// Genetic optimizer for minimum-cost configurations
#[derive(Debug, Clone)]
pub struct EvolutionaryOptimizer {
    params: SearchParams,
    deadline: Option<Instant>,
}

impl EvolutionaryOptimizer {
    pub fn new(params: SearchParams) -> OptimizerResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            deadline: None,
        })
    }

    /// Stop breeding once `deadline` has passed
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Run the search and return the best individual of the final generation.
    ///
    /// Never fails. When nothing feasible was found the returned
    /// configuration is infeasible and `stats.feasible` is false.
    pub fn run(
        &self,
        catalog: &Catalog,
        requirement: &ResourceRequirement,
        rng: &mut dyn RngCore,
    ) -> (Configuration, SearchStats) {
        let start = Instant::now();
        let params = &self.params;
        let evaluator = FitnessEvaluator::new(catalog, *requirement, params.fitness_policy);
        let mut evaluations: u64 = 0;

        let mut evaluate = |genes: Vec<u32>| {
            evaluations += 1;
            let fitness = evaluator.score_counts(&genes);
            Individual { genes, fitness }
        };

        let mut population: Vec<Individual> = (0..params.pop_size)
            .map(|_| evaluate(random_configuration(catalog, params.max_count, rng)))
            .collect();

        let mut completed = 0;
        let mut interrupted = false;
        for generation in 0..params.generations {
            if self.deadline.is_some_and(|d| Instant::now() >= d) {
                interrupted = true;
                break;
            }
            rank(&mut population);
            trace!(generation, best_fitness = population[0].fitness, "Generation ranked");

            let elites = params.elite_count.min(population.len());
            let pool = params.parent_pool.min(population.len());

            let mut next: Vec<Individual> = population[..elites].to_vec();
            while next.len() < params.pop_size {
                let p1 = &population[rng.random_range(0..pool)];
                let p2 = &population[rng.random_range(0..pool)];
                let mut child = crossover(&p1.genes, &p2.genes, rng);
                mutate(&mut child, params.mutation_rate, rng);
                next.push(evaluate(child));
            }
            population = next;
            completed += 1;
        }

        let best = best_of(&population);
        let stats = SearchStats {
            generations: completed,
            evaluations,
            best_fitness: best.fitness,
            feasible: best.fitness > 0.0,
            elapsed_ms: start.elapsed().as_millis() as u64,
            interrupted,
        };

        debug!(
            generations = stats.generations,
            evaluations = stats.evaluations,
            best_fitness = stats.best_fitness,
            feasible = stats.feasible,
            interrupted = stats.interrupted,
            "Evolutionary search finished"
        );

        (catalog.configuration_from_counts(&best.genes), stats)
    }
}

impl Default for EvolutionaryOptimizer {
    fn default() -> Self {
        Self {
            params: SearchParams::default(),
            deadline: None,
        }
    }
}

impl ConfigurationSearch for EvolutionaryOptimizer {
    fn search(
        &self,
        catalog: &Catalog,
        requirement: &ResourceRequirement,
        rng: &mut dyn RngCore,
    ) -> OptimizerResult<SearchOutcome> {
        let (configuration, stats) = self.run(catalog, requirement, rng);
        if stats.interrupted {
            return Err(OptimizerError::DeadlineExceeded {
                generations: stats.generations,
            });
        }
        Ok(SearchOutcome {
            configuration,
            stats: Some(stats),
        })
    }

    fn name(&self) -> &'static str {
        "evolutionary"
    }
}

/// Stable descending sort, so equal fitness keeps population order
fn rank(population: &mut [Individual]) {
    population.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(Ordering::Equal));
}

/// First individual with the maximum fitness
fn best_of(population: &[Individual]) -> &Individual {
    let mut best = &population[0];
    for candidate in &population[1..] {
        if candidate.fitness > best.fitness {
            best = candidate;
        }
    }
    best
}
