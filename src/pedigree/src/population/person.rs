use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use super::PopulationError;

/// Observed trait status of an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Observation {
    Present,
    Absent,
    #[default]
    Unknown,
}

impl Observation {
    /// `Some(true|false)` when the trait was observed, `None` otherwise.
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Present => Some(true),
            Self::Absent  => Some(false),
            Self::Unknown => None,
        }
    }

    /// Check whether hypothesizing `has_trait` is compatible with this observation.
    #[must_use]
    pub fn agrees_with(self, has_trait: bool) -> bool {
        self.as_bool().map_or(true, |observed| observed == has_trait)
    }
}

impl FromStr for Observation {
    type Err = PopulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1"   => Ok(Self::Present),
            "0"   => Ok(Self::Absent),
            ""    => Ok(Self::Unknown),
            other => Err(PopulationError::InvalidObservation(other.to_string())),
        }
    }
}

impl Display for Observation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Self::Present => "present",
            Self::Absent  => "absent",
            Self::Unknown => "unknown",
        })
    }
}

/// Population indices of an individual's mother and father.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parents {
    pub mother: usize,
    pub father: usize,
}

/// A member of the population.
/// # Fields:
/// - `label`      : unique name of the individual (e.g. "Harry")
/// - `parents`    : population indices of the parents. `None` if this individual is a founder
/// - `observation`: observed trait status
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub label: String,
    parents: Option<Parents>,
    pub observation: Observation,
}

impl Person {
    pub(crate) fn new(label: String, parents: Option<Parents>, observation: Observation) -> Self {
        Self{label, parents, observation}
    }

    #[must_use]
    pub fn parents(&self) -> Option<Parents> {
        self.parents
    }

    #[must_use]
    pub fn is_founder(&self) -> bool {
        self.parents.is_none()
    }
}

impl Display for Person {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let kind = if self.is_founder() { "founder" } else { "offspring" };
        write!(f, "label: {: <10} - {: <9} - trait: {}", self.label, kind, self.observation)
    }
}

/// Raw, unresolved definition of an individual, as found within a family dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonRecord {
    pub label: String,
    pub mother: Option<String>,
    pub father: Option<String>,
    pub observation: Observation,
}

impl PersonRecord {
    pub fn founder(label: &str, observation: Observation) -> Self {
        Self{label: label.to_string(), mother: None, father: None, observation}
    }

    pub fn offspring(label: &str, [mother, father]: [&str; 2], observation: Observation) -> Self {
        Self{label: label.to_string(), mother: Some(mother.to_string()), father: Some(father.to_string()), observation}
    }
}
