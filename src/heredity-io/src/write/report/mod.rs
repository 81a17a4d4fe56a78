use std::fmt::{self, Display, Formatter};

use pedigree::{GeneCount, Marginals, PersonMarginals};
use parser::OutputFormat;

/// Tab separated header of the `tsv` format.
pub const TSV_HEADER: [&str; 6] = ["name", "gene_2", "gene_1", "gene_0", "trait_true", "trait_false"];

/// Renders posterior marginals, one individual after the other, in dataset order.
/// 
/// `pretty`:
/// ```text
/// Harry:
///   Gene:
///     2: 0.0092
///     1: 0.4557
///     0: 0.5351
///   Trait:
///     True: 0.2665
///     False: 0.7335
/// ```
/// `tsv`: one header line (see `TSV_HEADER`), followed by one line per individual.
pub struct Report<'a> {
    marginals: &'a Marginals,
    format: OutputFormat,
    precision: usize,
}

impl<'a> Report<'a> {
    #[must_use]
    pub fn new(marginals: &'a Marginals, format: OutputFormat, precision: usize) -> Self {
        Self{marginals, format, precision}
    }

    /// Rendered report, one item per line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self.format {
            OutputFormat::Pretty => self.marginals.iter().flat_map(|person| self.pretty(person)).collect(),
            OutputFormat::Tsv    => std::iter::once(TSV_HEADER.join("\t"))
                .chain(self.marginals.iter().map(|person| self.tsv(person)))
                .collect(),
        }
    }

    fn pretty(&self, person: &PersonMarginals) -> Vec<String> {
        let precision = self.precision;
        let mut lines = vec![format!("{}:", person.label), "  Gene:".to_string()];
        lines.extend(GeneCount::REPORT_ORDER.iter().map(|genes| format!("    {genes}: {:.precision$}", person.genes[*genes])));
        lines.push("  Trait:".to_string());
        lines.push(format!("    True: {:.precision$}", person.traits.present()));
        lines.push(format!("    False: {:.precision$}", person.traits.absent()));
        lines
    }

    fn tsv(&self, person: &PersonMarginals) -> String {
        let precision = self.precision;
        let probabilities = GeneCount::REPORT_ORDER.iter()
            .map(|genes| person.genes[*genes])
            .chain([person.traits.present(), person.traits.absent()])
            .map(|p| format!("{p:.precision$}"));
        std::iter::once(person.label.clone()).chain(probabilities).collect::<Vec<_>>().join("\t")
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.lines().iter().try_for_each(|line| writeln!(f, "{line}"))
    }
}
