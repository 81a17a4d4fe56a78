//! Exact posterior inference over a family-sized Bayesian network of genetic trait inheritance.
//!
//! Every individual carries a hidden copy count of a trait-linked allele (`GeneCount`), and an
//! observed-or-hidden trait. The engine enumerates every joint hypothesis consistent with the
//! observations, and folds their joint probability into per-individual posterior marginals.

pub mod genes;
pub mod params;
pub mod population;
pub mod powerset;
pub mod hypothesis;
pub mod joint;
pub mod marginals;
pub mod inference;

#[cfg(test)]
pub mod tests;

pub use genes::{GeneCount, GeneDistribution, TraitDistribution};
pub use params::{ModelParams, ParamsError};
pub use population::{Observation, Person, PersonRecord, Population, PopulationBuilder, PopulationError};
pub use hypothesis::{GeneAssignment, Hypothesis, HypothesisError, TraitAssignment};
pub use joint::joint_probability;
pub use marginals::{Marginals, MarginalsError, PersonMarginals};
pub use inference::{InferenceEngine, InferenceError, MAX_HYPOTHESES};
