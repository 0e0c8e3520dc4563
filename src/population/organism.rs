use crate::domain::Domain;
use crate::population::genome::Genome;

/// One evaluated individual: a genome, the artifact it renders to, and the
/// fitness of that artifact against the domain's target.
///
/// Organisms are only built through `express`, which renders and scores in
/// one shot, and expose no mutators. A mutated or crossed-over genome always
/// becomes a new organism, so a fitness value can never be stale.
pub struct Organism<D: Domain> {
    genome: Genome<D::Element>,
    artifact: D::Artifact,
    fitness: f64,
}

impl<D: Domain> Organism<D> {
    /// Render the genome and score the result. The only constructor.
    pub fn express(domain: &D, genome: Genome<D::Element>) -> Organism<D> {
        let artifact = domain.render(&genome);
        let fitness = domain.fitness(&artifact);
        Organism {
            genome,
            artifact,
            fitness,
        }
    }

    pub fn genome(&self) -> &Genome<D::Element> {
        &self.genome
    }

    /// The cached rendered artifact. Kept because re-rendering (a pixel
    /// buffer, say) is the expensive half of evaluation.
    pub fn artifact(&self) -> &D::Artifact {
        &self.artifact
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

impl<D: Domain> Clone for Organism<D> {
    fn clone(&self) -> Self {
        Organism {
            genome: self.genome.clone(),
            artifact: self.artifact.clone(),
            fitness: self.fitness,
        }
    }
}
