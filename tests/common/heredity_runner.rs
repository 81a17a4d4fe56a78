use std::path::PathBuf;

use clap::Parser;
use parser::{Cli, OutputFormat};

use super::Fixture;

/// Incrementally define the arguments of an `infer` run.
#[derive(Default)]
pub struct HeredityRunnerBuilder {
    data      : Option<String>,
    params    : Option<String>,
    output_dir: Option<String>,
    format    : OutputFormat,
    precision : Option<usize>,
    threads   : Option<usize>,
    overwrite : bool,
}

impl HeredityRunnerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Family dataset, relative to `tests/test-data`
    pub fn set_data(mut self, data: &str) -> Self {
        self.data = Some(data.to_string());
        self
    }

    /// Model parameters, relative to `tests/test-data`
    pub fn set_params(mut self, params: &str) -> Self {
        self.params = Some(params.to_string());
        self
    }

    pub fn set_output_dir(mut self, output_dir: &str) -> Self {
        self.output_dir = Some(output_dir.to_string());
        self
    }

    pub fn set_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn set_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn set_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// Copy fixtures within temporary directories, and format the command line.
    pub fn build(self) -> anyhow::Result<HeredityRunner> {
        let data = Fixture::copy(self.data.as_deref().ok_or_else(|| anyhow::anyhow!("Missing --data"))?);
        let params = self.params.as_deref().map(Fixture::copy);
        let output_dir = self.output_dir.as_deref().map(Fixture::blank);

        let mut args = vec![
            "heredity-rs".to_string(),
            "infer".to_string(),
            format!("--data={data}"),
            format!("--format={}", self.format),
        ];
        args.extend(params.iter().map(|params| format!("--params={params}")));
        args.extend(output_dir.iter().map(|dir| format!("--output-dir={dir}")));
        args.extend(self.precision.map(|n| format!("--precision={n}")));
        args.extend(self.threads.map(|n| format!("--threads={n}")));
        if self.overwrite {
            args.push("--overwrite".to_string());
        }
        Ok(HeredityRunner{args, data, _params: params, output_dir, format: self.format})
    }
}

/// A fully defined `infer` run, along with the temporary fixtures it operates on.
pub struct HeredityRunner {
    args      : Vec<String>,
    data      : Fixture,
    _params   : Option<Fixture>,
    output_dir: Option<Fixture>,
    format    : OutputFormat,
}

impl HeredityRunner {
    pub fn cli(&self) -> anyhow::Result<Cli> {
        Ok(Cli::try_parse_from(&self.args)?)
    }

    pub fn run(&self) -> anyhow::Result<()> {
        heredity_rs::run(self.cli()?)
    }

    /// Expected location of the results file: `{output_dir}/{data stem}-marginals.{ext}`
    pub fn output_file(&self) -> Option<PathBuf> {
        let stem = self.data.file_stem()?.to_str()?;
        let output_dir = self.output_dir.as_ref()?;
        Some(output_dir.join(format!("{stem}-marginals.{}", self.format.extension())))
    }
}
