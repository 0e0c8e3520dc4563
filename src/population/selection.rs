use std::cmp::Ordering;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::population::organism::Organism;

/// How the breeding pool is built from an evaluated population. Selected in
/// the parameter file alongside the engine parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// Each organism contributes `floor(fitness / best * scale)` pool
    /// entries. Zero-fitness organisms contribute nothing and cannot
    /// reproduce. Meant for scores with a known best (e.g. match fractions).
    ProportionalToBest { scale: u32 },

    /// Sort best-first and keep the `pool_size + 1` front-runners; each of
    /// the first `pool_size` contributes entries proportional to its fitness
    /// gap to the `(pool_size + 1)`-th, times `multiplier`. Meant for
    /// open-ended distance scores where only relative order is meaningful.
    TopDifferential { pool_size: usize, multiplier: u32 },
}

/// Build the weighted breeding pool: a multiset of indices into the
/// population, one entry per reproduction ticket. Never empty for a
/// non-empty population. A population with no fitness variance has no
/// discriminating power, so both policies fall back to the whole population
/// rather than starving the next generation.
pub fn build_pool<D: Domain>(
    domain: &D,
    organisms: &[Organism<D>],
    policy: &SelectionPolicy,
) -> Vec<usize> {
    let pool = match *policy {
        SelectionPolicy::ProportionalToBest { scale } => proportional_pool(domain, organisms, scale),
        SelectionPolicy::TopDifferential {
            pool_size,
            multiplier,
        } => top_differential_pool(domain, organisms, pool_size, multiplier),
    };

    match pool {
        Some(pool) if !pool.is_empty() => pool,
        _ => {
            // degenerate population: every organism breeds
            warn!("population has no fitness variance, breeding from all {} organisms", organisms.len());
            (0..organisms.len()).collect()
        }
    }
}

fn proportional_pool<D: Domain>(
    domain: &D,
    organisms: &[Organism<D>],
    scale: u32,
) -> Option<Vec<usize>> {
    let best = best_fitness(domain, organisms)?;
    if best == 0.0 {
        return None;
    }

    let mut pool = Vec::new();
    for (i, org) in organisms.iter().enumerate() {
        let copies = ((org.fitness() / best) * f64::from(scale)) as u64;
        for _ in 0..copies {
            pool.push(i);
        }
    }

    Some(pool)
}

fn top_differential_pool<D: Domain>(
    domain: &D,
    organisms: &[Organism<D>],
    pool_size: usize,
    multiplier: u32,
) -> Option<Vec<usize>> {
    // pool_size < population size is checked before the run starts
    let mut order: Vec<usize> = (0..organisms.len()).collect();
    order.sort_by(|&a, &b| {
        if domain.better_than(organisms[a].fitness(), organisms[b].fitness()) {
            Ordering::Less
        } else if domain.better_than(organisms[b].fitness(), organisms[a].fitness()) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });

    let top = &order[..=pool_size];
    let pivot = organisms[top[pool_size]].fitness();
    if (pivot - organisms[top[0]].fitness()).abs() == 0.0 {
        return None;
    }

    let mut pool = Vec::new();
    for &idx in &top[..pool_size] {
        let copies = ((pivot - organisms[idx].fitness()).abs() * f64::from(multiplier)) as u64;
        for _ in 0..copies {
            pool.push(idx);
        }
    }

    Some(pool)
}

fn best_fitness<D: Domain>(domain: &D, organisms: &[Organism<D>]) -> Option<f64> {
    let mut best: Option<f64> = None;
    for org in organisms {
        match best {
            Some(b) if !domain.better_than(org.fitness(), b) => {}
            _ => best = Some(org.fitness()),
        }
    }
    best
}
