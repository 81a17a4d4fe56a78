mod population_reader;
pub use population_reader::{PopulationReader, PopulationReaderError, POPULATION_READER_VALID_FILE_FORMATS};
