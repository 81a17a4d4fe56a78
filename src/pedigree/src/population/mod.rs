use std::{
    fmt::{self, Display, Formatter},
    ops::Index,
};

use indexmap::IndexMap;
use log::trace;

mod person;
pub use person::{Observation, Parents, Person, PersonRecord};

mod error;
pub use error::PopulationError;

/// A family: every individual of the network, kept in insertion order.
/// 
/// Individuals are addressed by their position within the population. Parent references
/// are resolved to such positions when the population is built, and are thus guaranteed to
/// point to a member of the population.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    persons: Vec<Person>,
}

impl Population {
    /// Resolve and validate a set of raw records into a `Population`.
    /// 
    /// # Errors
    /// - `DuplicateIndividual` if two records share the same label.
    /// - `SingleParent` if a record specifies a mother but no father (or vice-versa)
    /// - `UnknownParent` if a parent is not defined within `records`
    /// - `SelfParent` if a record references itself as a parent.
    pub fn from_records(records: impl IntoIterator<Item = PersonRecord>) -> Result<Self, PopulationError> {
        let mut builder = PopulationBuilder::default();
        records.into_iter().try_for_each(|record| builder.add_record(record))?;
        builder.build()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Person> {
        self.persons.iter()
    }

    /// Find the population index of the individual labeled `label`.
    #[must_use]
    pub fn position(&self, label: &str) -> Option<usize> {
        self.persons.iter().position(|person| person.label == label)
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Person> {
        self.position(label).map(|idx| &self.persons[idx])
    }

    pub fn founders(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter().filter(|person| person.is_founder())
    }

    pub fn offsprings(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter().filter(|person| !person.is_founder())
    }

    /// Check whether a set of per-individual trait hypotheses agrees with every observation.
    /// `has_trait` must be aligned with this population's indices.
    #[must_use]
    pub fn agrees_with(&self, has_trait: &[bool]) -> bool {
        self.persons.iter()
            .zip(has_trait)
            .all(|(person, &has_trait)| person.observation.agrees_with(has_trait))
    }

    /// Number of individuals carrying a known trait status.
    #[must_use]
    pub fn num_observed(&self) -> usize {
        self.persons.iter().filter(|person| person.observation.as_bool().is_some()).count()
    }
}

impl Index<usize> for Population {
    type Output = Person;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.persons[idx]
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Person;
    type IntoIter = std::slice::Iter<'a, Person>;
    fn into_iter(self) -> Self::IntoIter {
        self.persons.iter()
    }
}

impl Display for Population {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.persons.iter().try_for_each(|person| writeln!(f, "{person}"))
    }
}

/// Incrementally collect raw `PersonRecord`s, and resolve them into a `Population`, once
/// every individual is known. Records may reference parents defined later on.
#[derive(Debug, Default)]
pub struct PopulationBuilder {
    records: IndexMap<String, PersonRecord>,
}

impl PopulationBuilder {
    /// # Errors
    /// - `DuplicateIndividual` if an individual with the same label was already added.
    pub fn add_record(&mut self, record: PersonRecord) -> Result<(), PopulationError> {
        if self.records.contains_key(&record.label) {
            return Err(PopulationError::DuplicateIndividual(record.label))
        }
        trace!("Adding individual {} (mother: {:?} - father: {:?})", record.label, record.mother, record.father);
        self.records.insert(record.label.clone(), record);
        Ok(())
    }

    /// Resolve parent references and build the population.
    /// 
    /// # Errors
    /// see `Population::from_records()`
    pub fn build(self) -> Result<Population, PopulationError> {
        let persons = self.records.values()
            .map(|record| {
                let parents = match (&record.mother, &record.father) {
                    (None, None)                 => None,
                    (Some(mother), Some(father)) => Some(Parents {
                        mother: self.resolve(record, "mother", mother)?,
                        father: self.resolve(record, "father", father)?,
                    }),
                    _ => return Err(PopulationError::SingleParent(record.label.clone())),
                };
                Ok(Person::new(record.label.clone(), parents, record.observation))
            })
            .collect::<Result<Vec<Person>, _>>()?;
        Ok(Population{persons})
    }

    fn resolve(&self, record: &PersonRecord, role: &'static str, parent: &str) -> Result<usize, PopulationError> {
        if parent == record.label {
            return Err(PopulationError::SelfParent(record.label.clone()))
        }
        self.records.get_index_of(parent).ok_or_else(|| PopulationError::UnknownParent {
            individual: record.label.clone(),
            role,
            parent: parent.to_string(),
        })
    }
}
