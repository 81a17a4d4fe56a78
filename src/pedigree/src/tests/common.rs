use crate::population::{Observation, Population, PersonRecord, PopulationError};

/// Mock the reference three-member family:
/// - `Harry`: child of Lily (mother) and James (father), unknown trait
/// - `James`: founder, trait present
/// - `Lily` : founder, trait absent
pub fn mock_potter_family() -> Result<Population, PopulationError> {
    Population::from_records([
        PersonRecord::offspring("Harry", ["Lily", "James"], Observation::Unknown),
        PersonRecord::founder("James", Observation::Present),
        PersonRecord::founder("Lily", Observation::Absent),
    ])
}

/// Mock a population containing a single founder individual, carrying the given observation.
pub fn mock_founder(label: &str, observation: Observation) -> Population {
    Population::from_records([PersonRecord::founder(label, observation)])
        .expect("A single founder is always a valid population")
}

/// Mock a two-generation family of `children` unobserved offsprings, born from two
/// unobserved founders.
pub fn mock_nuclear_family(children: usize) -> Population {
    let mut records = vec![
        PersonRecord::founder("mother", Observation::Unknown),
        PersonRecord::founder("father", Observation::Unknown),
    ];
    records.extend((0..children).map(|i| PersonRecord::offspring(&format!("child{i}"), ["mother", "father"], Observation::Unknown)));
    Population::from_records(records).expect("Nuclear family should be a valid population")
}

/// Mock the six-member Weasley family, where only Fred carries the trait and every
/// founder is known to be unaffected.
pub fn mock_weasley_family() -> Population {
    let parents = ["Molly", "Arthur"];
    Population::from_records([
        PersonRecord::founder("Arthur", Observation::Absent),
        PersonRecord::founder("Charlotte", Observation::Absent),
        PersonRecord::offspring("Fred", parents, Observation::Present),
        PersonRecord::offspring("Ginny", parents, Observation::Unknown),
        PersonRecord::founder("Molly", Observation::Absent),
        PersonRecord::offspring("Ron", parents, Observation::Unknown),
    ]).expect("Weasley family should be a valid population")
}
