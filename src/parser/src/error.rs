use thiserror::Error;
use crate::FileEntity;

#[derive(Error, Debug)]
pub enum ParserError{
    #[error("{0} {1} does not exist")]
    MissingFileEntity(FileEntity, String),

    #[error("{1} is not a {0}")]
    InvalidFileEntity(FileEntity, String),

    #[error("Failed to create directory {0}")]
    CreateDir(String, #[source] std::io::Error),

    #[error("Failed to generate an output file prefix from {0}. Note that file prefixes are generated from the input dataset filestem")]
    ParseOutputPrefix(String),

    #[error("{0} already exists. Use --overwrite to force.")]
    CannotOverwrite(String),

    #[error("Failed to serialize command line arguments")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Failed to deserialize command line arguments")]
    Deserialize(#[source] serde_yaml::Error),

    #[error("Unable to serialize arguments into {0}")]
    WriteYaml(String, #[source] std::io::Error),
}
