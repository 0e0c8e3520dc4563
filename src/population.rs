pub mod genome;
pub mod organism;
pub mod reproduction;
pub mod selection;

use rand::Rng;

use crate::domain::Domain;
use crate::population::genome::Genome;
use crate::population::organism::Organism;
use crate::population::reproduction::breed;

/// The fixed-size set of organisms alive in one generation. Replaced
/// wholesale every generation; this is a generational scheme, not
/// steady-state, and carries no elitism.
pub struct Population<D: Domain> {
    organisms: Vec<Organism<D>>,
}

impl<D: Domain> Population<D> {
    /// Build the initial population from independently rolled random
    /// genomes, all evaluated.
    pub fn random<R: Rng + ?Sized>(
        domain: &D,
        size: usize,
        threads: usize,
        rng: &mut R,
    ) -> Population<D> {
        let genomes = (0..size).map(|_| Genome::random(domain, rng)).collect();
        Self::express_genomes(domain, genomes, threads)
    }

    /// Evaluate a full generation of genomes into organisms. This is the
    /// evaluation barrier: selection never sees a partially scored
    /// population.
    pub fn express_genomes(
        domain: &D,
        genomes: Vec<Genome<D::Element>>,
        threads: usize,
    ) -> Population<D> {
        let organisms = if threads > 1 {
            express_parallel(domain, &genomes, threads)
        } else {
            genomes
                .into_iter()
                .map(|g| Organism::express(domain, g))
                .collect()
        };
        Population { organisms }
    }

    pub fn organisms(&self) -> &[Organism<D>] {
        &self.organisms
    }

    pub fn len(&self) -> usize {
        self.organisms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    /// The best organism under the domain's order. First wins ties.
    pub fn best(&self, domain: &D) -> &Organism<D> {
        let mut best = 0;
        for i in 1..self.organisms.len() {
            if domain.better_than(self.organisms[i].fitness(), self.organisms[best].fitness()) {
                best = i;
            }
        }
        &self.organisms[best]
    }

    /// Breed the full replacement generation. For every child slot two
    /// parent tickets are drawn independently and uniformly from the pool,
    /// with replacement, so an organism may breed with itself.
    pub fn next_generation<R: Rng + ?Sized>(
        &self,
        domain: &D,
        pool: &[usize],
        mutation_rate: f64,
        threads: usize,
        rng: &mut R,
    ) -> Population<D> {
        let mut genomes = Vec::with_capacity(self.organisms.len());
        for _ in 0..self.organisms.len() {
            let a = &self.organisms[pool[rng.gen_range(0..pool.len())]];
            let b = &self.organisms[pool[rng.gen_range(0..pool.len())]];
            genomes.push(breed(domain, a, b, mutation_rate, rng));
        }

        Self::express_genomes(domain, genomes, threads)
    }
}

// Chunked evaluation on crossbeam scoped threads. Genomes for the
// generation already exist, so the workers need no random source and share
// nothing mutable; results come back in chunk order.
fn express_parallel<D: Domain>(
    domain: &D,
    genomes: &[Genome<D::Element>],
    threads: usize,
) -> Vec<Organism<D>> {
    if genomes.is_empty() {
        return Vec::new();
    }

    let chunk_size = (genomes.len() + threads - 1) / threads;

    crossbeam::thread::scope(|s| {
        let mut handles = Vec::with_capacity(threads);
        for chunk in genomes.chunks(chunk_size) {
            handles.push(s.spawn(move |_| {
                chunk
                    .iter()
                    .map(|g| Organism::express(domain, g.clone()))
                    .collect::<Vec<_>>()
            }));
        }

        let mut organisms = Vec::with_capacity(genomes.len());
        for handle in handles {
            organisms.append(&mut handle.join().expect("evaluation worker panicked"));
        }
        organisms
    })
    .expect("evaluation scope panicked")
}
