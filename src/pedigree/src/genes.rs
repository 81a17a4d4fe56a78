use std::{
    fmt::{self, Display, Formatter},
    ops::{Index, IndexMut},
};

use serde::{Serialize, Deserialize};

/// Number of copies of the trait-linked allele carried by an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeneCount {
    Zero,
    One,
    Two,
}

impl GeneCount {
    /// Every copy count, in increasing order.
    pub const ALL: [GeneCount; 3] = [Self::Zero, Self::One, Self::Two];

    /// Every copy count, in the order they are reported (`2`, `1`, `0`).
    pub const REPORT_ORDER: [GeneCount; 3] = [Self::Two, Self::One, Self::Zero];

    #[must_use]
    pub fn copies(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One  => 1,
            Self::Two  => 2,
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.copies())
    }

    /// Probability that a parent carrying `self` copies passes the allele down to its offspring.
    /// 
    /// - 0 copies: the allele can only appear through mutation        -> `mutation_rate`
    /// - 1 copy  : one of the two alleles is picked at random         -> `0.5`
    /// - 2 copies: the allele is always passed, unless it mutates away -> `1 - mutation_rate`
    #[must_use]
    pub fn transmission_probability(self, mutation_rate: f64) -> f64 {
        match self {
            Self::Zero => mutation_rate,
            Self::One  => 0.5,
            Self::Two  => 1.0 - mutation_rate,
        }
    }
}

impl Display for GeneCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.copies())
    }
}

/// A (possibly unnormalized) mass function over `GeneCount`, indexed by copy count.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneDistribution([f64; 3]);

impl GeneDistribution {
    #[must_use]
    pub fn new(masses: [f64; 3]) -> Self {
        Self(masses)
    }

    /// Distribution of an offspring's copy count, given the transmission probability of its
    /// mother (`t_mother`) and father (`t_father`). Each parent independently passes the allele.
    #[must_use]
    pub fn from_transmissions(t_mother: f64, t_father: f64) -> Self {
        Self([
            (1.0 - t_mother) * (1.0 - t_father),
            t_mother * (1.0 - t_father) + (1.0 - t_mother) * t_father,
            t_mother * t_father,
        ])
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub(crate) fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub(crate) fn divide(&mut self, total: f64) {
        self.0.iter_mut().for_each(|mass| *mass /= total);
    }

    pub(crate) fn merge(&mut self, other: &Self) {
        self.0.iter_mut().zip(other.0).for_each(|(mass, add)| *mass += add);
    }
}

impl Index<GeneCount> for GeneDistribution {
    type Output = f64;
    fn index(&self, genes: GeneCount) -> &Self::Output {
        &self.0[genes.index()]
    }
}

impl IndexMut<GeneCount> for GeneDistribution {
    fn index_mut(&mut self, genes: GeneCount) -> &mut Self::Output {
        &mut self.0[genes.index()]
    }
}

/// A (possibly unnormalized) mass function over trait presence. Laid out as `[absent, present]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitDistribution([f64; 2]);

impl TraitDistribution {
    #[must_use]
    pub fn new(absent: f64, present: f64) -> Self {
        Self([absent, present])
    }

    #[must_use]
    pub fn absent(&self) -> f64 {
        self[false]
    }

    #[must_use]
    pub fn present(&self) -> f64 {
        self[true]
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub(crate) fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub(crate) fn divide(&mut self, total: f64) {
        self.0.iter_mut().for_each(|mass| *mass /= total);
    }

    pub(crate) fn merge(&mut self, other: &Self) {
        self.0.iter_mut().zip(other.0).for_each(|(mass, add)| *mass += add);
    }
}

impl Index<bool> for TraitDistribution {
    type Output = f64;
    fn index(&self, has_trait: bool) -> &Self::Output {
        &self.0[usize::from(has_trait)]
    }
}

impl IndexMut<bool> for TraitDistribution {
    fn index_mut(&mut self, has_trait: bool) -> &mut Self::Output {
        &mut self.0[usize::from(has_trait)]
    }
}
