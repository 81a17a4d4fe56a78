use std::ops::Index;

use ahash::AHashSet;

use crate::{genes::GeneCount, population::Population};

mod error;
pub use error::HypothesisError;

/// Copy count of every individual of a population, aligned with the population's indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneAssignment(Vec<GeneCount>);

impl GeneAssignment {
    /// Build an assignment from the population indices of the individuals carrying one and two
    /// copies of the gene. Everyone else carries none. `one_gene` and `two_genes` must be disjoint.
    #[must_use]
    pub fn from_indices(len: usize, one_gene: &[usize], two_genes: &[usize]) -> Self {
        let mut genes = Self(vec![GeneCount::Zero; len]);
        genes.assign(one_gene, two_genes);
        genes
    }

    /// Overwrite this assignment in place, reusing its allocation. Same semantics as `from_indices()`
    pub fn assign(&mut self, one_gene: &[usize], two_genes: &[usize]) {
        self.0.fill(GeneCount::Zero);
        one_gene.iter().for_each(|&idx| self.0[idx] = GeneCount::One);
        two_genes.iter().for_each(|&idx| self.0[idx] = GeneCount::Two);
    }

    /// Build an assignment from the labels of the individuals carrying one and two copies of the gene.
    /// 
    /// # Errors
    /// - `UnknownIndividual` if a label is not part of `population`
    /// - `OverlappingGeneSets` if an individual is listed within both sets.
    pub fn from_sets<S: AsRef<str>>(population: &Population, one_gene: &[S], two_genes: &[S]) -> Result<Self, HypothesisError> {
        let one_gene = resolve_labels(population, one_gene)?;
        let two_genes = resolve_labels(population, two_genes)?;

        if let Some(idx) = one_gene.iter().copied().find(|idx| two_genes.contains(idx)) {
            return Err(HypothesisError::OverlappingGeneSets(population[idx].label.clone()))
        }
        Ok(Self::from_indices(
            population.len(),
            &one_gene.into_iter().collect::<Vec<_>>(),
            &two_genes.into_iter().collect::<Vec<_>>()
        ))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneCount> {
        self.0.iter()
    }
}

impl Index<usize> for GeneAssignment {
    type Output = GeneCount;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.0[idx]
    }
}

/// Trait status of every individual of a population, aligned with the population's indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitAssignment(Vec<bool>);

impl TraitAssignment {
    /// Build an assignment from the population indices of the individuals expressing the trait.
    #[must_use]
    pub fn from_indices(len: usize, have_trait: &[usize]) -> Self {
        let mut traits = vec![false; len];
        have_trait.iter().for_each(|&idx| traits[idx] = true);
        Self(traits)
    }

    /// Build an assignment from the labels of the individuals expressing the trait.
    /// 
    /// # Errors
    /// - `UnknownIndividual` if a label is not part of `population`
    pub fn from_set<S: AsRef<str>>(population: &Population, have_trait: &[S]) -> Result<Self, HypothesisError> {
        let have_trait = resolve_labels(population, have_trait)?;
        Ok(Self::from_indices(population.len(), &have_trait.into_iter().collect::<Vec<_>>()))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<usize> for TraitAssignment {
    type Output = bool;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.0[idx]
    }
}

/// One full instantiation of every hidden variable of the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hypothesis {
    pub genes: GeneAssignment,
    pub traits: TraitAssignment,
}

impl Hypothesis {
    #[must_use]
    pub fn new(genes: GeneAssignment, traits: TraitAssignment) -> Self {
        debug_assert_eq!(genes.len(), traits.len());
        Self{genes, traits}
    }

    /// Build a hypothesis from explicit sets of labels:
    /// - `one_gene`  : individuals carrying exactly one copy of the gene.
    /// - `two_genes` : individuals carrying exactly two copies of the gene.
    /// - `have_trait`: individuals expressing the trait.
    /// 
    /// # Errors
    /// see `GeneAssignment::from_sets()` and `TraitAssignment::from_set()`
    pub fn from_sets<S: AsRef<str>>(population: &Population, one_gene: &[S], two_genes: &[S], have_trait: &[S]) -> Result<Self, HypothesisError> {
        Ok(Self::new(
            GeneAssignment::from_sets(population, one_gene, two_genes)?,
            TraitAssignment::from_set(population, have_trait)?
        ))
    }
}

fn resolve_labels<S: AsRef<str>>(population: &Population, labels: &[S]) -> Result<AHashSet<usize>, HypothesisError> {
    labels.iter()
        .map(|label| {
            let label = label.as_ref();
            population.position(label).ok_or_else(|| HypothesisError::UnknownIndividual(label.to_string()))
        })
        .collect()
}
