use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("Failed to open model parameters file")]
    OpenFile(#[source] std::io::Error),

    #[error("Failed to deserialize model parameters")]
    Deserialize(#[source] serde_yaml::Error),

    #[error("Invalid {field} probability: {value}. Probabilities must lie within [0, 1]")]
    InvalidProbability{field: String, value: f64},

    #[error("The {field} distribution must sum to 1. Got {sum}")]
    UnnormalizedDistribution{field: String, sum: f64},
}
