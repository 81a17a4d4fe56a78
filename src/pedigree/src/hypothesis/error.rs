use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HypothesisError {
    #[error("Individual '{0}' is not part of the population")]
    UnknownIndividual(String),

    #[error("Individual '{0}' cannot carry both one and two copies of the gene")]
    OverlappingGeneSets(String),
}
