use log::{debug, info};
use located_error::prelude::*;

use parser::{Cli, Commands, Common, Infer};
use pedigree::{InferenceEngine, ModelParams};
use heredity_io::{read::PopulationReader, write::{GenericWriter, Report}};

/// Unpack `cli` and run the requested subcommand.
/// 
/// # Errors
/// - if the dataset or model parameters cannot be read or are invalid.
/// - if the observations are incompatible with the model (null evidence).
/// - if results cannot be written.
pub fn run(cli: Cli) -> Result<()> {
    match cli.commands {
        Commands::Infer{common, infer} => {
            infer_marginals(&common, &infer)?;
        },

        Commands::FromYaml{yaml} => {
            let cli = Cli::deserialize(&yaml).loc("While replaying a previous run")?;
            self::run(cli)?;
        },
    };
    Ok(())
}

/// Load a family dataset, compute the posterior marginals of every individual, and write them
/// either within `--output-dir` or on stdout.
fn infer_marginals(common: &Common, infer: &Infer) -> Result<()> {
    // ----------------------------- Fail early if results cannot be written.
    let output_file = common.output_file(&infer.data, infer.format)?;

    // ----------------------------- Load model parameters
    let params = match &infer.params {
        Some(path) => ModelParams::from_yaml(path)?,
        None       => ModelParams::default(),
    };
    debug!("Model parameters: {params:?}");

    // ----------------------------- Load family
    info!("Loading family dataset from {}", infer.data.display());
    let population = PopulationReader::new(&infer.data)?.read()?;
    for person in &population {
        debug!("{person}");
    }
    info!("Found {} individuals, {} of which carry a trait observation", population.len(), population.num_observed());

    // ----------------------------- Exact inference
    let progress = logger::Logger::progress_bar(0, "Enumerating hypotheses");
    let marginals = InferenceEngine::new(&population, &params)
        .with_progress(progress)
        .run(infer.threads)
        .loc("While computing posterior marginals")?;

    debug!("Posterior marginals:\n{marginals}");

    // ----------------------------- Write results
    let report = Report::new(&marginals, infer.format, infer.precision);
    GenericWriter::new(output_file.as_deref())?.write_iter(report.lines())?;
    if let Some(path) = output_file.as_deref() {
        info!("Results written to {}", path.display());
    }
    Ok(())
}
