use std::{fs::File, path::Path};

use serde::{Serialize, Deserialize};
use located_error::prelude::*;

use crate::genes::{GeneCount, GeneDistribution, TraitDistribution};

mod error;
pub use error::ParamsError;

/// Tolerance used when checking that a user-provided distribution sums to one.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Constants of the inheritance network.
/// # Fields:
/// - `gene_prior`    : unconditional copy-count distribution of founder individuals. Indexed by copy count.
/// - `trait_emission`: probability of expressing the trait, given the copy count. Indexed by copy count,
///                     each row laid out as `[absent, present]`
/// - `mutation_rate` : probability that a transmitted allele flips during inheritance.
/// 
/// Fields missing from a parameter file fall back to `ModelParams::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub gene_prior: GeneDistribution,
    pub trait_emission: [TraitDistribution; 3],
    pub mutation_rate: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            gene_prior: GeneDistribution::new([0.96, 0.03, 0.01]),
            trait_emission: [
                TraitDistribution::new(0.99, 0.01),
                TraitDistribution::new(0.44, 0.56),
                TraitDistribution::new(0.35, 0.65),
            ],
            mutation_rate: 0.01,
        }
    }
}

impl ModelParams {
    /// Deserialize and validate a set of model parameters from a `.yaml` file.
    /// 
    /// # Errors
    /// - if `path` cannot be opened, or does not deserialize into `ModelParams`
    /// - if any of the parameters is invalid (see `ModelParams::validate()`)
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let loc_msg = || format!("While parsing model parameters from {}", path.display());
        let file = File::open(path).map_err(ParamsError::OpenFile).with_loc(loc_msg)?;
        let params: Self = serde_yaml::from_reader(file).map_err(ParamsError::Deserialize).with_loc(loc_msg)?;
        params.validate().with_loc(loc_msg)?;
        Ok(params)
    }

    /// Ensure every probability lies within [0, 1], and that the founder prior and every
    /// emission row sum to one.
    /// 
    /// # Errors
    /// - `InvalidProbability` if a probability is out of bounds (or not a number).
    /// - `UnnormalizedDistribution` if a distribution does not sum to 1.
    pub fn validate(&self) -> Result<(), ParamsError> {
        check_probability("mutation_rate", self.mutation_rate)?;
        check_distribution("gene_prior", self.gene_prior.as_slice())?;
        for genes in GeneCount::ALL {
            let field = format!("trait_emission[{genes}]");
            check_distribution(&field, self.trait_emission[genes.index()].as_slice())?;
        }
        Ok(())
    }

    /// Unconditional probability that a founder carries `genes` copies.
    #[must_use]
    pub fn founder_probability(&self, genes: GeneCount) -> f64 {
        self.gene_prior[genes]
    }

    /// Probability of the trait being `has_trait`, given `genes` copies.
    #[must_use]
    pub fn emission_probability(&self, genes: GeneCount, has_trait: bool) -> f64 {
        self.trait_emission[genes.index()][has_trait]
    }

    /// Copy-count distribution of an offspring, given the copy count of its parents.
    #[must_use]
    pub fn offspring_distribution(&self, mother: GeneCount, father: GeneCount) -> GeneDistribution {
        GeneDistribution::from_transmissions(
            mother.transmission_probability(self.mutation_rate),
            father.transmission_probability(self.mutation_rate),
        )
    }
}

fn check_probability(field: &str, value: f64) -> Result<(), ParamsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParamsError::InvalidProbability{field: field.to_string(), value})
    }
}

fn check_distribution(field: &str, masses: &[f64]) -> Result<(), ParamsError> {
    masses.iter().try_for_each(|&mass| check_probability(field, mass))?;
    let sum: f64 = masses.iter().sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(ParamsError::UnnormalizedDistribution{field: field.to_string(), sum})
    }
    Ok(())
}
