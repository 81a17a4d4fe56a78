use std::{
    fs::File,
    path::{Path, PathBuf},
    fmt::{self, Display, Formatter},
    ffi::OsStr,
};

use located_error::prelude::*;

use clap::{Parser, Subcommand, Args, ArgEnum};
use serde::{Serialize, Deserialize};
use log::debug;

mod error;
pub use error::ParserError;

#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(name="heredity-rs", author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// heredity-rs: Exact inference of genetic trait inheritance within a family.
pub struct Cli {
    ///Set the verbosity level (-v -vv -vvv)
    /// 
    /// Set the verbosity level of this program. Multiple levels allowed {n} 
    ///
    /// -v: Info  |  -vv: Debug  | -vvv: Trace {n}
    /// 
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use The --quiet/-q to disable them
    #[clap(short='v', long, parse(from_occurrences), global=true)]
    pub verbose: u8,

    /// Disable warnings.
    /// 
    /// By default, warnings are emmited and redirected to the console, even when verbose mode is off.
    /// Use this argument to disable this. Only errors will be displayed.
    #[clap(short='q', long, global=true)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub commands: Commands,
}

impl Cli{
    /// Serialize command line arguments within a `.yaml` file.
    /// 
    /// # Behavior
    /// - File naming follows the convention '{current time}-{module name}.yaml'. current time follows the format
    ///   `YYYY`-`MM`-`DD`T`hhmmss`
    /// - File is written at the root of the user-provided `--output-dir` folder.
    /// - Nothing is written if the user did not provide any `--output-dir`
    /// 
    /// Returns the path of the serialized file, if any.
    /// 
    /// # Errors
    /// - `Serialize` if `serde_yaml` fails to parse `Self` to a string.
    /// - `WriteYaml` if the target file cannot be written.
    pub fn serialize(&self) -> Result<Option<PathBuf>> {
        let output_dir = match &self.commands {
            Commands::Infer{common, ..} => match &common.output_dir {
                Some(dir) => dir,
                None      => return Ok(None),
            },
            Commands::FromYaml{..} => return Ok(None),
        };

        // Parse arguments to yaml and print to console.
        let serialized = serde_yaml::to_string(&self)
            .map_err(ParserError::Serialize)
            .loc("While serializing command line arguments")?;
        debug!("\n---- Command line args ----\n{}\n---", serialized);

        let current_time = chrono::offset::Local::now().format("%Y-%m-%dT%H%M%S").to_string();
        let output_file = output_dir.join(format!("{current_time}-infer.yaml"));

        std::fs::write(&output_file, serialized)
            .map_err(|err| ParserError::WriteYaml(output_file.display().to_string(), err))
            .loc("While serializing command line arguments")?;
        Ok(Some(output_file))
    }

    /// Deserialize a `.yaml` file into Command line arguments.
    /// 
    /// # Errors
    /// 
    /// - Returns `FileNotFound` or `PermissionDenied` if the provided `.yaml` is invalid,
    ///   or does not carry read permissions
    /// - `Deserialize` if `serde_yaml` fails to parse the provided file to `Self`.
    pub fn deserialize(yaml: &Path) -> Result<Self> {
        let loc_msg = || format!("While deserializing command line arguments from {}", yaml.display());
        let file = File::open(yaml).with_loc(loc_msg)?;
        serde_yaml::from_reader(file).map_err(ParserError::Deserialize).with_loc(loc_msg)
    }
}

#[derive(Subcommand, Debug, Serialize, Deserialize)]
pub enum Commands {
    /// Compute the posterior gene and trait marginals of every individual within a family.
    Infer {
        #[clap(flatten)]
        common: Common,
        #[clap(flatten)]
        infer: Infer,
    },

    /// Run heredity-rs using a previously generated .yaml configuration file.
    /// 
    /// This allows users to easily re-apply a heredity-rs command using the exact same parameters
    /// and arguments. 
    FromYaml {
        yaml: PathBuf,
    },
}

/// Output related arguments.
#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct Common {
    /// Output directory.
    /// 
    /// When unspecified, results are printed on the standard output, and command line arguments are not
    /// serialized.
    /// 
    /// Note that heredity-rs will create the specified leaf directory if it is not present, but does not 
    /// allow itself from creating parent directories.
    #[clap(short, long, parse(try_from_os_str=valid_output_dir))]
    pub output_dir: Option<PathBuf>,

    /// Overwrite existing output files.
    /// 
    /// By default, heredity-rs does not allow itself from overwriting existing results files. Use this flag
    /// to force this behaviour.
    #[clap(short='w', long)]
    pub overwrite: bool,
}

impl Common {
    /// Path of the results file for a given input `data` file, if the user requested an `--output-dir`.
    /// Files are named `{data file stem}-marginals.{ext}`
    /// 
    /// # Errors
    /// - `ParseOutputPrefix` if `data` does not carry a valid file stem.
    /// - `CannotOverwrite` if the file already exists and `--overwrite` is off
    pub fn output_file(&self, data: &Path, format: OutputFormat) -> Result<Option<PathBuf>> {
        let Some(output_dir) = &self.output_dir else {
            return Ok(None)
        };
        let file_stem = data.file_stem()
            .ok_or_else(|| ParserError::ParseOutputPrefix(data.display().to_string()))
            .loc("While parsing command line arguments")?;

        let mut filename = file_stem.to_os_string();
        filename.push(format!("-marginals.{}", format.extension()));
        let output_file = output_dir.join(filename);
        self.can_write_file(&output_file)?;
        Ok(Some(output_file))
    }

    /// Check if a given file already exists ; raise an error if such is the case, and the user did not explicitly 
    /// allow file overwriting.
    /// 
    /// # Errors
    /// - If the provided `pathbuf` already exists and the user did not specifically allow for file
    ///   overwrite using the `--overwrite` argument
    pub fn can_write_file(&self, pathbuf: &Path) -> Result<bool> {
        if ! self.overwrite && pathbuf.exists() {   // Check if this file already exists and/or if overwrite is allowed.
            return Err(ParserError::CannotOverwrite(pathbuf.display().to_string()))
                .loc( "While parsing command line arguments" )
        }
        Ok(true)
    }
}

/// Inference arguments.
#[derive(Args, Debug, Serialize, Deserialize)]
pub struct Infer {
    /// Input family dataset.
    /// 
    /// Header must contain the columns 'name', 'mother', 'father' and 'trait' (in any order). Founders
    /// leave both 'mother' and 'father' empty. Traits are either '1' (present), '0' (absent), or left
    /// empty (unknown).{n}
    /// 
    /// Accepted file formats:{n}
    ///   '.csv' : comma-separated{n}
    ///   '.tsv' :   tab-separated{n}
    #[clap(short, long, parse(try_from_os_str=valid_input_file))]
    pub data: PathBuf,

    /// Model parameters (.yaml)
    /// 
    /// Override the founder gene prior, the trait emission table, and the mutation rate of the
    /// inheritance model. e.g.:{n}
    ///   gene_prior: [0.96, 0.03, 0.01]{n}
    ///   trait_emission: [[0.99, 0.01], [0.44, 0.56], [0.35, 0.65]]{n}
    ///   mutation_rate: 0.01{n}
    /// 
    /// 'gene_prior' and 'trait_emission' are indexed by copy count. Each 'trait_emission' row is laid out
    /// as [absent, present].
    #[clap(short, long, parse(try_from_os_str=valid_input_file))]
    pub params: Option<PathBuf>,

    /// Output format of the posterior marginals.
    #[clap(short, long, arg_enum, default_value("pretty"))]
    pub format: OutputFormat,

    /// Number of decimals printed for each probability.
    #[clap(short='P', long, default_value("4"))]
    pub precision: usize,

    /// Number of parallel CPU threads used during inference.
    /// 
    /// Parallelization is dispatched according to the number of trait hypotheses agreeing with the
    /// observations. '0' lets the program pick the number of available cores.
    #[clap(short='@', long, default_value("0"))]
    pub threads: usize,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, ArgEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Indented, human-readable layout
    #[default]
    Pretty,
    /// One tab-separated row per individual
    Tsv,
}

impl OutputFormat {
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pretty => "txt",
            Self::Tsv    => "tsv",
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Pretty => "pretty",
            Self::Tsv    => "tsv",
        };
        write!(f, "{repr}")
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FileEntity {File, Directory}

impl Display for FileEntity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::File      => write!(f, "File"),
            Self::Directory => write!(f, "Directory"),
        }
    }
}

impl FileEntity {
    fn validate(self, path: &Path) -> Result<(), ParserError> {
        use ParserError::InvalidFileEntity;
        let valid = match self {
            Self::File      => path.is_file(),
            Self::Directory => path.is_dir()
        };

        if valid {
            Ok(())
        } else {
            Err(InvalidFileEntity(self, path.display().to_string()))
        }
    }
}

fn assert_filesystem_entity_is_valid(s: &OsStr, entity: FileEntity) -> Result<()> {
    use ParserError::MissingFileEntity;
    let path = Path::new(s);
    if ! path.exists() {
        return Err(MissingFileEntity(entity, path.display().to_string()))
            .loc("While parsing arguments.")
    }

    entity.validate(path).loc("While parsing arguments.")
}

fn valid_input_file(s: &OsStr) -> Result<PathBuf> {
    assert_filesystem_entity_is_valid(s, FileEntity::File)
        .loc("While checking for file validity")?;
    Ok(PathBuf::from(s))
}

fn valid_output_dir(s: &OsStr) -> Result<PathBuf> {
    if ! Path::new(s).exists() {
        std::fs::create_dir(s)
            .map_err(|err| ParserError::CreateDir(Path::new(s).display().to_string(), err))
            .loc("While checking for directory validity")?;
    }
    assert_filesystem_entity_is_valid(s, FileEntity::Directory)
        .loc("While checking for directory validity")?;
    Ok(PathBuf::from(s))
}
