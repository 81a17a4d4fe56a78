use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PopulationError {
    #[error("Individual '{0}' is defined more than once")]
    DuplicateIndividual(String),

    #[error("Individual '{individual}' references an unknown {role}: '{parent}'")]
    UnknownParent{individual: String, role: &'static str, parent: String},

    #[error("Individual '{0}' must either define both parents, or none")]
    SingleParent(String),

    #[error("Individual '{0}' cannot be its own parent")]
    SelfParent(String),

    #[error("Invalid trait marker '{0}'. Expected '1' (present), '0' (absent), or an empty field (unknown)")]
    InvalidObservation(String),
}
