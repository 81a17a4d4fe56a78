use crate::{
    hypothesis::Hypothesis,
    params::ModelParams,
    population::{Person, Population},
};

/// Joint probability of a full `hypothesis` under the inheritance network.
/// 
/// Factorizes as the product, over every individual, of:
/// - the emission factor: P(trait | genes)
/// - the gene factor    : P(genes) for founders, P(genes | mother's genes, father's genes) for offsprings.
/// 
/// `hypothesis` must be aligned with the indices of `population`
#[must_use]
pub fn joint_probability(population: &Population, params: &ModelParams, hypothesis: &Hypothesis) -> f64 {
    debug_assert_eq!(population.len(), hypothesis.genes.len());
    population.iter()
        .enumerate()
        .map(|(idx, person)| person_probability(person, idx, params, hypothesis))
        .product()
}

/// Contribution of a single individual to the joint probability: emission factor x gene factor.
fn person_probability(person: &Person, idx: usize, params: &ModelParams, hypothesis: &Hypothesis) -> f64 {
    let genes = hypothesis.genes[idx];
    let emission = params.emission_probability(genes, hypothesis.traits[idx]);
    let inheritance = match person.parents() {
        None          => params.founder_probability(genes),
        Some(parents) => {
            let (mother, father) = (hypothesis.genes[parents.mother], hypothesis.genes[parents.father]);
            params.offspring_distribution(mother, father)[genes]
        }
    };
    emission * inheritance
}
