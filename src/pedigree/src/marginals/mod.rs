use std::{
    fmt::{self, Display, Formatter},
    ops::Index,
};

use crate::{
    genes::{GeneCount, GeneDistribution, TraitDistribution},
    hypothesis::Hypothesis,
    population::Population,
};

mod error;
pub use error::MarginalsError;

/// Gene and trait marginal distributions of a single individual.
/// Unnormalized while accumulating. Normalized once `Marginals::normalize()` has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonMarginals {
    pub label: String,
    pub genes: GeneDistribution,
    pub traits: TraitDistribution,
}

impl PersonMarginals {
    fn new(label: &str) -> Self {
        Self{label: label.to_string(), genes: GeneDistribution::default(), traits: TraitDistribution::default()}
    }

    fn normalize(&mut self) -> Result<(), MarginalsError> {
        let gene_mass = self.genes.sum();
        let trait_mass = self.traits.sum();
        for (distribution, mass) in [("gene", gene_mass), ("trait", trait_mass)] {
            if !(mass.is_finite() && mass > 0.0) {
                return Err(MarginalsError::ZeroMass{individual: self.label.clone(), distribution, mass})
            }
        }
        self.genes.divide(gene_mass);
        self.traits.divide(trait_mass);
        Ok(())
    }
}

impl Display for PersonMarginals {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{: <10}", self.label)?;
        for genes in GeneCount::REPORT_ORDER {
            write!(f, " - P(genes={genes}): {:.6}", self.genes[genes])?;
        }
        write!(f, " - P(trait=true): {:.6} - P(trait=false): {:.6}", self.traits.present(), self.traits.absent())
    }
}

/// Per-individual marginal accumulator, aligned with the indices of a `Population`.
#[derive(Debug, Clone, PartialEq)]
pub struct Marginals {
    persons: Vec<PersonMarginals>,
}

impl Marginals {
    /// Zero-initialized accumulator for every member of `population`.
    #[must_use]
    pub fn new(population: &Population) -> Self {
        Self{persons: population.iter().map(|person| PersonMarginals::new(&person.label)).collect()}
    }

    /// Add the joint probability `p` of `hypothesis` to the gene and trait buckets each
    /// individual takes within this hypothesis.
    pub fn accumulate(&mut self, hypothesis: &Hypothesis, p: f64) {
        for (idx, person) in self.persons.iter_mut().enumerate() {
            person.genes[hypothesis.genes[idx]] += p;
            person.traits[hypothesis.traits[idx]] += p;
        }
    }

    /// Bucket-wise addition of another partial accumulator.
    /// 
    /// # Errors
    /// - `SizeMismatch` if `other` was not built from a population of the same size.
    pub fn merge(&mut self, other: &Self) -> Result<(), MarginalsError> {
        if self.len() != other.len() {
            return Err(MarginalsError::SizeMismatch(self.len(), other.len()))
        }
        for (person, other) in self.persons.iter_mut().zip(&other.persons) {
            person.genes.merge(&other.genes);
            person.traits.merge(&other.traits);
        }
        Ok(())
    }

    /// Total accumulated mass. Every individual's buckets span the same set of hypotheses, and
    /// thus share this value until normalization. This is P(evidence) once every hypothesis
    /// has been accumulated.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.persons.first().map_or(0.0, |person| person.genes.sum())
    }

    /// Rescale the gene and trait distributions of every individual so that each sums to 1.
    /// 
    /// # Errors
    /// - `ZeroMass` if any distribution sums to zero (or is not finite). In that case, no
    ///   distribution is modified.
    pub fn normalize(&mut self) -> Result<(), MarginalsError> {
        let mut normalized = self.persons.clone();
        normalized.iter_mut().try_for_each(PersonMarginals::normalize)?;
        self.persons = normalized;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PersonMarginals> {
        self.persons.iter()
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&PersonMarginals> {
        self.persons.iter().find(|person| person.label == label)
    }
}

impl Index<usize> for Marginals {
    type Output = PersonMarginals;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.persons[idx]
    }
}

impl<'a> IntoIterator for &'a Marginals {
    type Item = &'a PersonMarginals;
    type IntoIter = std::slice::Iter<'a, PersonMarginals>;
    fn into_iter(self) -> Self::IntoIter {
        self.persons.iter()
    }
}

impl Display for Marginals {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.persons.iter().try_for_each(|person| writeln!(f, "{person}"))
    }
}
