use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MarginalsError {
    #[error(
        "The {distribution} distribution of '{individual}' carries a total mass of {mass}, and cannot be normalized. \
        The provided trait observations are incompatible with the model parameters."
    )]
    ZeroMass{individual: String, distribution: &'static str, mass: f64},

    #[error("Attempting to merge marginals of populations of different sizes ({0} vs. {1})")]
    SizeMismatch(usize, usize),
}
