use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error(
        "Exact inference over {individuals} individuals, {unobserved} of which carry no trait observation, \
        requires 2^{unobserved} x 3^{individuals} joint hypotheses. This exceeds the limit of {limit}."
    )]
    TooManyHypotheses{individuals: usize, unobserved: usize, limit: u128},

    #[error("Failed to instantiate threadpool")]
    BuildThreadPool(#[source] rayon::ThreadPoolBuildError),

    #[error("Every hypothesis of the network carries a null probability. Cannot normalize posterior marginals")]
    ZeroEvidence(#[source] crate::marginals::MarginalsError),

    #[error("Failed to merge partial marginals")]
    Merge(#[source] crate::marginals::MarginalsError),
}
