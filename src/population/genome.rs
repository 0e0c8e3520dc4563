use rand::Rng;

use crate::domain::Domain;

/// A fixed-length ordered sequence of domain elements. The genome fully
/// determines one candidate solution; the engine treats its elements as
/// opaque beyond generating and replacing them.
#[derive(Clone, Debug, PartialEq)]
pub struct Genome<E> {
    elements: Vec<E>,
}

impl<E: Clone + PartialEq> Genome<E> {
    pub fn from_elements(elements: Vec<E>) -> Genome<E> {
        Genome { elements }
    }

    /// Roll a fresh genome of the domain's configured length.
    pub fn random<D, R>(domain: &D, rng: &mut R) -> Genome<E>
    where
        D: Domain<Element = E>,
        R: Rng + ?Sized,
    {
        let elements = (0..domain.genome_length())
            .map(|_| domain.random_element(rng))
            .collect();
        Genome { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    pub(crate) fn elements_mut(&mut self) -> &mut [E] {
        &mut self.elements
    }
}
