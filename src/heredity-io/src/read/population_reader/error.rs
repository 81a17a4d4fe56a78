use thiserror::Error;

use super::POPULATION_READER_VALID_FILE_FORMATS;
fn common_help_msg() -> String {
    format!("Please provide '--data' with either one of the accepted file formats: {POPULATION_READER_VALID_FILE_FORMATS:?}")
}

#[derive(Error, Debug)]
pub enum PopulationReaderError {
    #[error("Cannot handle dataset file format: {0}. {}", common_help_msg())]
    InvalidFileFormat(String),

    #[error("The provided dataset is missing a file extension. {}", common_help_msg())]
    MissingExtension,

    #[error("Failed to open file {0}")]
    OpenFile(String, #[source] std::io::Error),

    #[error("Failed to read line {0}")]
    ReadLine(usize, #[source] std::io::Error),

    #[error("The provided dataset does not contain any header")]
    MissingHeader,

    #[error("Header is missing the required '{0}' column")]
    MissingColumn(&'static str),

    #[error("Line {line} contains {found} fields, while at least {expected} were expected")]
    MalformedLine{line: usize, expected: usize, found: usize},

    #[error("Line {0} defines an individual without any name")]
    MissingName(usize),

    #[error("Invalid individual definition at line {0}")]
    InvalidRecord(usize, #[source] pedigree::PopulationError),

    #[error("Invalid family structure")]
    InvalidPopulation(#[source] pedigree::PopulationError),
}
