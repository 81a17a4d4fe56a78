use indicatif::ProgressBar;
use log::{debug, info};
use rayon::prelude::*;

use crate::{
    hypothesis::{GeneAssignment, Hypothesis, TraitAssignment},
    joint::joint_probability,
    marginals::Marginals,
    params::ModelParams,
    population::Population,
    powerset::{complement, powerset},
};

mod error;
pub use error::InferenceError;

/// Hard limit on the number of joint hypotheses exact enumeration is attempted for, once
/// observations have pruned the candidate trait assignments.
pub const MAX_HYPOTHESES: u128 = 1 << 30;

/// Exact posterior inference over every joint hypothesis of a population.
/// 
/// Hypotheses are partitioned by trait assignment: each trait assignment agreeing with the
/// observations yields a partial accumulator, summing over every gene assignment. Partials
/// are then merged in enumeration order, which keeps the floating point reduction order
/// independent of the number of threads.
pub struct InferenceEngine<'a> {
    population: &'a Population,
    params    : &'a ModelParams,
    progress  : ProgressBar,
}

impl<'a> InferenceEngine<'a> {
    #[must_use]
    pub fn new(population: &'a Population, params: &'a ModelParams) -> Self {
        Self{population, params, progress: ProgressBar::hidden()}
    }

    /// Report the number of processed trait assignments through `progress`. The length of the bar
    /// is set once the surviving trait assignments are known.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Number of joint hypotheses left after discarding trait assignments that disagree with the
    /// observations: 2^unobserved x 3^n. `None` on overflow.
    #[must_use]
    pub fn num_hypotheses(&self) -> Option<u128> {
        let n = u32::try_from(self.population.len()).ok()?;
        let unobserved = u32::try_from(self.population.len() - self.population.num_observed()).ok()?;
        3u128.checked_pow(n)?.checked_mul(1u128.checked_shl(unobserved)?)
    }

    /// Trait assignments agreeing with every observation, in powerset order.
    /// 
    /// # Errors
    /// - `TooManyHypotheses` if the pruned enumeration exceeds `MAX_HYPOTHESES`
    pub fn trait_hypotheses(&self) -> Result<Vec<TraitAssignment>, InferenceError> {
        let n = self.population.len();
        match self.num_hypotheses() {
            Some(hypotheses) if hypotheses <= MAX_HYPOTHESES => debug!("Enumerating {hypotheses} joint hypotheses"),
            _ => return Err(InferenceError::TooManyHypotheses{
                individuals: n,
                unobserved : n - self.population.num_observed(),
                limit      : MAX_HYPOTHESES,
            })
        }
        let indices: Vec<usize> = (0..n).collect();
        Ok(powerset(&indices)
            .map(|have_trait| TraitAssignment::from_indices(n, &have_trait))
            .filter(|traits| self.population.agrees_with(traits.as_slice()))
            .collect()
        )
    }

    /// Run inference on a dedicated pool of `threads` workers (`0` lets rayon decide).
    /// 
    /// # Errors
    /// - `TooManyHypotheses` if the pruned enumeration exceeds `MAX_HYPOTHESES`
    /// - `BuildThreadPool` if the thread pool cannot be instantiated.
    /// - `ZeroEvidence` if the observations carry a null probability under `params`
    pub fn run(&self, threads: usize) -> Result<Marginals, InferenceError> {
        let traits = self.trait_hypotheses()?;
        self.progress.set_length(traits.len() as u64);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(InferenceError::BuildThreadPool)?;
        debug!("Running inference using {} thread(s)", pool.current_num_threads());

        let partials: Vec<Marginals> = pool.install(|| {
            traits.into_par_iter().map(|traits| self.marginalize_genes(traits)).collect()
        });
        self.finalize(partials)
    }

    /// Single threaded counterpart of `InferenceEngine::run()`. Yields the exact same output.
    /// 
    /// # Errors
    /// see `InferenceEngine::run()`
    pub fn run_sequential(&self) -> Result<Marginals, InferenceError> {
        let traits = self.trait_hypotheses()?;
        self.progress.set_length(traits.len() as u64);
        let partials: Vec<Marginals> = traits.into_iter()
            .map(|traits| self.marginalize_genes(traits))
            .collect();
        self.finalize(partials)
    }

    /// Accumulate every gene assignment of the population, given a fixed trait assignment.
    fn marginalize_genes(&self, traits: TraitAssignment) -> Marginals {
        let n = self.population.len();
        let indices: Vec<usize> = (0..n).collect();
        let mut partial = Marginals::new(self.population);
        let mut hypothesis = Hypothesis::new(GeneAssignment::from_indices(n, &[], &[]), traits);
        for one_gene in powerset(&indices) {
            let remaining = complement(&indices, &one_gene);
            for two_genes in powerset(&remaining) {
                hypothesis.genes.assign(&one_gene, &two_genes);
                let p = joint_probability(self.population, self.params, &hypothesis);
                partial.accumulate(&hypothesis, p);
            }
        }
        self.progress.inc(1);
        partial
    }

    fn finalize(&self, partials: Vec<Marginals>) -> Result<Marginals, InferenceError> {
        info!("Processed {} trait hypotheses agreeing with {} observation(s)", partials.len(), self.population.num_observed());
        let mut marginals = Marginals::new(self.population);
        for partial in &partials {
            marginals.merge(partial).map_err(InferenceError::Merge)?;
        }
        self.progress.finish_and_clear();

        info!("P(evidence) = {:e}", marginals.mass());
        marginals.normalize().map_err(InferenceError::ZeroEvidence)?;
        Ok(marginals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        genes::{GeneCount, GeneDistribution, TraitDistribution},
        population::{Observation, PersonRecord},
        tests::common::*,
    };
    use float_cmp::approx_eq;

    const EPSILON: f64 = 1e-4;

    /// Expected marginals, laid out as ([P(2), P(1), P(0)], [P(true), P(false)])
    type Expected<'a> = (&'a str, [f64; 3], [f64; 2]);

    fn assert_marginals(marginals: &Marginals, expected: &[Expected]) {
        assert_eq!(marginals.len(), expected.len());
        for (label, genes, traits) in expected {
            let person = marginals.get(label).unwrap_or_else(|| panic!("Missing individual {label}"));
            for (genecount, want) in GeneCount::REPORT_ORDER.iter().zip(genes) {
                let got = person.genes[*genecount];
                assert!(approx_eq!(f64, got, *want, epsilon = EPSILON), "{label} P(genes={genecount}): {got} != {want}");
            }
            assert!(approx_eq!(f64, person.traits.present(), traits[0], epsilon = EPSILON), "{label}: {:?}", person.traits);
            assert!(approx_eq!(f64, person.traits.absent(),  traits[1], epsilon = EPSILON), "{label}: {:?}", person.traits);
        }
    }

    fn assert_normalized(marginals: &Marginals) {
        for person in marginals {
            assert!(approx_eq!(f64, person.genes.sum(),  1.0, epsilon = 1e-12), "{}", person.label);
            assert!(approx_eq!(f64, person.traits.sum(), 1.0, epsilon = 1e-12), "{}", person.label);
        }
    }

    #[test]
    fn potter_family() -> anyhow::Result<()> {
        let population = mock_potter_family()?;
        let params = ModelParams::default();
        let marginals = InferenceEngine::new(&population, &params).run(2)?;
        assert_normalized(&marginals);
        assert_marginals(&marginals, &[
            ("Harry", [0.0092, 0.4557, 0.5351], [0.2665, 0.7335]),
            ("James", [0.1976, 0.5106, 0.2918], [1.0000, 0.0000]),
            ("Lily",  [0.0036, 0.0136, 0.9827], [0.0000, 1.0000]),
        ]);
        Ok(())
    }

    #[test]
    fn weasley_family() -> anyhow::Result<()> {
        let population = mock_weasley_family();
        let params = ModelParams::default();
        let marginals = InferenceEngine::new(&population, &params).run(0)?;
        assert_normalized(&marginals);
        assert_marginals(&marginals, &[
            ("Arthur",    [0.0628, 0.1241, 0.8132], [0.0000, 1.0000]),
            ("Charlotte", [0.0036, 0.0136, 0.9827], [0.0000, 1.0000]),
            ("Fred",      [0.0083, 0.6924, 0.2993], [1.0000, 0.0000]),
            ("Ginny",     [0.0043, 0.2560, 0.7397], [0.1536, 0.8464]),
            ("Molly",     [0.0628, 0.1241, 0.8132], [0.0000, 1.0000]),
            ("Ron",       [0.0043, 0.2560, 0.7397], [0.1536, 0.8464]),
        ]);
        Ok(())
    }

    #[test]
    fn three_generations() -> anyhow::Result<()> {
        let population = Population::from_records([
            PersonRecord::founder("Arthur", Observation::Absent),
            PersonRecord::founder("Hermione", Observation::Absent),
            PersonRecord::founder("Molly", Observation::Unknown),
            PersonRecord::offspring("Ron", ["Molly", "Arthur"], Observation::Absent),
            PersonRecord::offspring("Rose", ["Ron", "Hermione"], Observation::Present),
        ])?;
        let params = ModelParams::default();
        let marginals = InferenceEngine::new(&population, &params).run_sequential()?;
        assert_normalized(&marginals);
        assert_marginals(&marginals, &[
            ("Arthur",   [0.0147, 0.0344, 0.9509], [0.0000, 1.0000]),
            ("Hermione", [0.0608, 0.1203, 0.8189], [0.0000, 1.0000]),
            ("Molly",    [0.0404, 0.0744, 0.8852], [0.0768, 0.9232]),
            ("Ron",      [0.0043, 0.2149, 0.7808], [0.0000, 1.0000]),
            ("Rose",     [0.0088, 0.7022, 0.2890], [1.0000, 0.0000]),
        ]);
        Ok(())
    }

    #[test]
    fn unobserved_founder_keeps_prior() -> anyhow::Result<()> {
        let population = mock_founder("Neville", Observation::Unknown);
        let params = ModelParams::default();
        let marginals = InferenceEngine::new(&population, &params).run_sequential()?;
        let neville = &marginals[0];
        for genes in GeneCount::ALL {
            assert!(approx_eq!(f64, neville.genes[genes], params.gene_prior[genes], epsilon = 1e-12));
        }
        let want: f64 = GeneCount::ALL.iter()
            .map(|genes| params.gene_prior[*genes] * params.trait_emission[genes.index()].present())
            .sum();
        assert!(approx_eq!(f64, neville.traits.present(), want, epsilon = 1e-12));
        Ok(())
    }

    #[test]
    fn childless_founder_without_evidence_keeps_prior() -> anyhow::Result<()> {
        let population = Population::from_records([
            PersonRecord::founder("mother", Observation::Unknown),
            PersonRecord::founder("father", Observation::Unknown),
            PersonRecord::offspring("child", ["mother", "father"], Observation::Unknown),
            PersonRecord::founder("Neville", Observation::Unknown),
        ])?;
        let params = ModelParams::default();
        let marginals = InferenceEngine::new(&population, &params).run(2)?;
        for person in &marginals {
            if person.label == "child" {
                continue
            }
            for genes in GeneCount::ALL {
                assert!(approx_eq!(f64, person.genes[genes], params.gene_prior[genes], epsilon = 1e-12), "{}", person.label);
            }
        }
        Ok(())
    }

    #[test]
    fn childless_observed_founder() -> anyhow::Result<()> {
        let population = mock_founder("Luna", Observation::Present);
        let params = ModelParams::default();
        let marginals = InferenceEngine::new(&population, &params).run_sequential()?;
        let luna = &marginals[0];
        assert_eq!(luna.traits, TraitDistribution::new(0.0, 1.0));

        // Posterior follows Bayes' rule: P(g | trait) ∝ P(g) * P(trait | g)
        let unnormalized: Vec<f64> = GeneCount::ALL.iter()
            .map(|genes| params.gene_prior[*genes] * params.trait_emission[genes.index()].present())
            .collect();
        let evidence: f64 = unnormalized.iter().sum();
        for (genes, mass) in GeneCount::ALL.iter().zip(unnormalized) {
            assert!(approx_eq!(f64, luna.genes[*genes], mass / evidence, epsilon = 1e-12));
        }
        Ok(())
    }

    #[test]
    fn observed_traits_are_certain() -> anyhow::Result<()> {
        let population = mock_weasley_family();
        let params = ModelParams::default();
        let marginals = InferenceEngine::new(&population, &params).run(1)?;
        for (person, marginal) in population.iter().zip(&marginals) {
            match person.observation.as_bool() {
                Some(true)  => assert_eq!(marginal.traits.present(), 1.0),
                Some(false) => assert_eq!(marginal.traits.absent(), 1.0),
                None        => assert!(marginal.traits.present() > 0.0 && marginal.traits.absent() > 0.0),
            }
        }
        Ok(())
    }

    #[test]
    fn unnormalized_masses_agree_across_individuals() -> anyhow::Result<()> {
        let population = mock_weasley_family();
        let params = ModelParams::default();
        let engine = InferenceEngine::new(&population, &params);
        for traits in engine.trait_hypotheses()? {
            let partial = engine.marginalize_genes(traits);
            let mass = partial.mass();
            assert!(mass > 0.0);
            for person in &partial {
                assert!(approx_eq!(f64, person.genes.sum(),  mass, epsilon = 1e-15), "{}", person.label);
                assert!(approx_eq!(f64, person.traits.sum(), mass, epsilon = 1e-15), "{}", person.label);
            }
        }
        Ok(())
    }

    #[test]
    fn idempotence() -> anyhow::Result<()> {
        let population = mock_potter_family()?;
        let params = ModelParams::default();
        let engine = InferenceEngine::new(&population, &params);
        assert_eq!(engine.run_sequential()?, engine.run_sequential()?);
        Ok(())
    }

    #[test]
    fn sequential_and_parallel_are_identical() -> anyhow::Result<()> {
        let population = mock_weasley_family();
        let params = ModelParams::default();
        let engine = InferenceEngine::new(&population, &params);
        let sequential = engine.run_sequential()?;
        for threads in [1, 2, 4] {
            assert_eq!(engine.run(threads)?, sequential, "threads = {threads}");
        }
        Ok(())
    }

    #[test]
    fn trait_hypotheses_are_pruned() -> anyhow::Result<()> {
        let population = mock_weasley_family();
        let params = ModelParams::default();
        let engine = InferenceEngine::new(&population, &params);
        // Four observed individuals, two unobserved: 2^2 surviving trait assignments.
        assert_eq!(engine.trait_hypotheses()?.len(), 4);

        let unobserved = mock_nuclear_family(2);
        assert_eq!(InferenceEngine::new(&unobserved, &params).trait_hypotheses()?.len(), 16);
        Ok(())
    }

    #[test]
    fn too_many_hypotheses() {
        let params = ModelParams::default();

        // Twelve unobserved individuals: 6^12 hypotheses.
        let population = mock_nuclear_family(10);
        let result = InferenceEngine::new(&population, &params).run_sequential();
        assert!(matches!(
            result,
            Err(InferenceError::TooManyHypotheses{individuals: 12, unobserved: 12, limit: MAX_HYPOTHESES})
        ));

        // Eleven unobserved individuals fit within the limit.
        let population = mock_nuclear_family(9);
        let hypotheses = InferenceEngine::new(&population, &params).num_hypotheses();
        assert_eq!(hypotheses, Some(6u128.pow(11)));
        assert!(hypotheses.is_some_and(|hypotheses| hypotheses <= MAX_HYPOTHESES));
    }

    #[test]
    fn hypothesis_count_overflow() {
        let population = mock_nuclear_family(200);
        let params = ModelParams::default();
        let engine = InferenceEngine::new(&population, &params);
        assert_eq!(engine.num_hypotheses(), None);
        assert!(matches!(engine.trait_hypotheses(), Err(InferenceError::TooManyHypotheses{individuals: 202, ..})));
    }

    #[test]
    fn observations_lift_the_population_limit() -> anyhow::Result<()> {
        // Seventeen observed founders: a single trait assignment survives, and 3^17 gene assignments remain.
        let labels: Vec<String> = (0..17).map(|i| format!("founder{i}")).collect();
        let population = Population::from_records(labels.iter().map(|label| PersonRecord::founder(label, Observation::Absent)))?;
        let params = ModelParams::default();
        let engine = InferenceEngine::new(&population, &params);
        assert_eq!(engine.num_hypotheses(), Some(3u128.pow(17)));
        assert_eq!(engine.trait_hypotheses()?.len(), 1);

        let marginals = engine.run_sequential()?;
        assert_eq!(marginals.len(), 17);

        // Founders are independent: P(g | absent) ∝ P(g) * P(absent | g)
        let unnormalized: Vec<f64> = GeneCount::ALL.iter()
            .map(|genes| params.gene_prior[*genes] * params.trait_emission[genes.index()].absent())
            .collect();
        let evidence: f64 = unnormalized.iter().sum();
        for founder in &marginals {
            assert_eq!(founder.traits, TraitDistribution::new(1.0, 0.0), "{}", founder.label);
            for (genes, mass) in GeneCount::ALL.iter().zip(&unnormalized) {
                assert!(approx_eq!(f64, founder.genes[*genes], mass / evidence, epsilon = 1e-6), "{}", founder.label);
            }
        }
        Ok(())
    }

    #[test]
    fn contradictory_evidence() {
        let population = mock_founder("Dudley", Observation::Present);
        let params = ModelParams {
            trait_emission: [TraitDistribution::new(1.0, 0.0); 3],
            ..ModelParams::default()
        };
        assert!(params.validate().is_ok());
        let result = InferenceEngine::new(&population, &params).run(2);
        assert!(matches!(result, Err(InferenceError::ZeroEvidence(_))));
    }

    #[test]
    fn certain_mutation_free_inheritance() -> anyhow::Result<()> {
        // Homozygous founders, no mutation: mixed parental pairs always yield a heterozygous child.
        let population = mock_nuclear_family(1);
        let params = ModelParams {
            gene_prior: GeneDistribution::new([0.5, 0.0, 0.5]),
            mutation_rate: 0.0,
            ..ModelParams::default()
        };
        let marginals = InferenceEngine::new(&population, &params).run_sequential()?;
        let child = marginals.get("child0").expect("child0 should be tracked");
        assert!(approx_eq!(f64, child.genes[GeneCount::One], 0.5, epsilon = 1e-12));
        assert!(approx_eq!(f64, child.genes[GeneCount::Zero], 0.25, epsilon = 1e-12));
        assert!(approx_eq!(f64, child.genes[GeneCount::Two], 0.25, epsilon = 1e-12));
        Ok(())
    }
}
