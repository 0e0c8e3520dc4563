use rand::Rng;

use crate::population::genome::Genome;
use crate::population::organism::Organism;

/// The capability set a concrete problem domain must provide to the engine.
///
/// The engine itself never inspects elements or artifacts. Everything it
/// needs is here: how to roll a fresh element, how to express a genome as an
/// artifact, how to score an artifact against the domain's target, which
/// direction of the score scale is better, and when a run is finished.
///
/// `better_than` is a strict comparison. Text-style domains score matches in
/// [0, 1] where higher is better; raster domains score a byte distance where
/// lower is better. Nothing in the engine assumes either direction.
pub trait Domain: Sized + Sync {
    type Element: Clone + PartialEq + Send + Sync;
    type Artifact: Clone + Send + Sync;

    /// Number of elements in every genome of this domain. Fixed for the
    /// whole run and equal to the target's element count.
    fn genome_length(&self) -> usize;

    /// Roll a brand new element. Used for initial genomes and for mutation,
    /// which re-rolls rather than perturbs.
    fn random_element<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element;

    /// Express a genome as an artifact. Must be deterministic given the
    /// genome.
    fn render(&self, genome: &Genome<Self::Element>) -> Self::Artifact;

    /// Score an artifact against the domain's target. Pure.
    fn fitness(&self, artifact: &Self::Artifact) -> f64;

    /// Strict "a is a better score than b" under this domain's order.
    fn better_than(&self, a: f64, b: f64) -> bool;

    /// Convergence predicate, checked once per generation against the best
    /// organism.
    fn is_converged(&self, best: &Organism<Self>) -> bool;
}
