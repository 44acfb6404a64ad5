//! Population operators over count vectors
//!
//! A genome is one count per catalog entry, in catalog order.

use crate::catalog::Catalog;
use rand::prelude::*;

/// Uniform random count in `[0, max_count]` for every catalog entry
pub fn random_configuration(catalog: &Catalog, max_count: u32, rng: &mut dyn RngCore) -> Vec<u32> {
    (0..catalog.len())
        .map(|_| rng.random_range(0..=max_count))
        .collect()
}

/// Per-gene uniform crossover: each count comes from `a` or `b` with equal probability
pub fn crossover(a: &[u32], b: &[u32], rng: &mut dyn RngCore) -> Vec<u32> {
    debug_assert_eq!(a.len(), b.len(), "Parent size mismatch");

    a.iter()
        .zip(b.iter())
        .map(|(ga, gb)| if rng.random_bool(0.5) { *ga } else { *gb })
        .collect()
}

/// Single-locus mutation
///
/// With probability `mutation_rate` one gene is picked uniformly and moved by
/// +1 or -1, saturating at 0. Returns the index of the touched gene.
pub fn mutate(genes: &mut [u32], mutation_rate: f64, rng: &mut dyn RngCore) -> Option<usize> {
    if genes.is_empty() {
        return None;
    }

    if rng.random::<f64>() < mutation_rate {
        let idx = rng.random_range(0..genes.len());
        genes[idx] = if rng.random_bool(0.5) {
            genes[idx].saturating_add(1)
        } else {
            genes[idx].saturating_sub(1)
        };
        Some(idx)
    } else {
        None
    }
}
