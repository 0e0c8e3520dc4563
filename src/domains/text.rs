use rand::Rng;

use crate::domain::Domain;
use crate::error::ConfigError;
use crate::population::genome::Genome;
use crate::population::organism::Organism;

/// Evolves a printable-ASCII byte sequence toward a fixed target phrase.
///
/// Fitness is the fraction of positions matching the target, in [0, 1] with
/// higher better; convergence is bitwise equality with the target. Genome
/// and target lengths agree by construction, so scoring never re-checks
/// them.
#[derive(Debug)]
pub struct TextDomain {
    target: Vec<u8>,
}

impl TextDomain {
    pub fn new(target: impl Into<Vec<u8>>) -> Result<TextDomain, ConfigError> {
        let target = target.into();
        if target.is_empty() {
            return Err(ConfigError::EmptyGenome);
        }
        Ok(TextDomain { target })
    }

    pub fn target(&self) -> &[u8] {
        &self.target
    }
}

impl Domain for TextDomain {
    type Element = u8;
    type Artifact = Vec<u8>;

    fn genome_length(&self) -> usize {
        self.target.len()
    }

    // printable ASCII, space through tilde
    fn random_element<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        rng.gen_range(32..127)
    }

    fn render(&self, genome: &Genome<u8>) -> Vec<u8> {
        genome.elements().to_vec()
    }

    fn fitness(&self, artifact: &Vec<u8>) -> f64 {
        let matches = artifact
            .iter()
            .zip(&self.target)
            .filter(|(a, t)| a == t)
            .count();
        matches as f64 / self.target.len() as f64
    }

    fn better_than(&self, a: f64, b: f64) -> bool {
        a > b
    }

    fn is_converged(&self, best: &Organism<Self>) -> bool {
        best.artifact() == &self.target
    }
}
