use rand::Rng;

use crate::domain::Domain;
use crate::population::genome::Genome;
use crate::population::organism::Organism;

/// Single-point crossover. A cut index `m` is drawn uniformly from
/// [0, length); the child takes positions `<= m` from parent `b` and
/// positions `> m` from parent `a`. Both parents must share the run's fixed
/// genome length.
pub fn crossover<E, R>(a: &Genome<E>, b: &Genome<E>, rng: &mut R) -> Genome<E>
where
    E: Clone + PartialEq,
    R: Rng + ?Sized,
{
    debug_assert_eq!(a.len(), b.len());

    let cut = rng.gen_range(0..a.len());
    let elements = a
        .elements()
        .iter()
        .zip(b.elements())
        .enumerate()
        .map(|(i, (from_a, from_b))| {
            if i > cut {
                from_a.clone()
            } else {
                from_b.clone()
            }
        })
        .collect();

    Genome::from_elements(elements)
}

/// Per-element mutation: each position is independently replaced with a
/// freshly rolled element with probability `rate`. A re-roll, not a
/// perturbation of the existing value. Rate 0 is a no-op; rate 1 replaces
/// every element.
pub fn mutate<D, R>(domain: &D, genome: &mut Genome<D::Element>, rate: f64, rng: &mut R)
where
    D: Domain,
    R: Rng + ?Sized,
{
    for slot in genome.elements_mut() {
        if rng.gen::<f64>() < rate {
            *slot = domain.random_element(rng);
        }
    }
}

/// Produce one child genome from two parents: crossover, then mutation.
/// The caller expresses the genome into an organism, so a child is never
/// seen with an unevaluated fitness.
pub fn breed<D, R>(
    domain: &D,
    a: &Organism<D>,
    b: &Organism<D>,
    mutation_rate: f64,
    rng: &mut R,
) -> Genome<D::Element>
where
    D: Domain,
    R: Rng + ?Sized,
{
    let mut child = crossover(a.genome(), b.genome(), rng);
    mutate(domain, &mut child, mutation_rate, rng);
    child
}
