use std::{fs::File, io::{BufRead, BufReader}, path::Path, str::FromStr};

use located_error::prelude::*;
use log::{debug, warn};

use pedigree::{Observation, Population, PopulationBuilder, PersonRecord};

mod error;
pub use error::PopulationReaderError;

pub const POPULATION_READER_VALID_FILE_FORMATS: [&str; 2] = ["csv", "tsv"];

/// Required header fields, in the order `PopulationReader` stores their column index.
const REQUIRED_COLUMNS: [&str; 4] = ["name", "mother", "father", "trait"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PopulationReaderMode {Csv, Tsv}

impl FromStr for PopulationReaderMode {
    type Err = PopulationReaderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            other => Err(Self::Err::InvalidFileFormat(other.to_string()))
        }
    }
}

impl PopulationReaderMode {
    fn separator(self) -> char {
        match self {
            Self::Csv => ',',
            Self::Tsv => '\t',
        }
    }
}

/// Family dataset reader.
/// - source: Boxed `BufRead`
/// - sep   : field separator, inferred from the file extension.
/// 
/// ## Accepted file formats:
///    EXT   SEP
/// - .csv   ","
/// - .tsv   "\t"
/// 
/// Columns (`name`, `mother`, `father`, `trait`) are located through the header, and may appear in any
/// order. Blank lines and lines starting with '#' are skipped.
pub struct PopulationReader<'a> {
    source: Box<dyn BufRead + 'a>,
    sep: char,
}

impl<'a> PopulationReader<'a> {
    /// Instantiate a new `PopulationReader`
    /// 
    /// # Errors
    /// - if `path` does not carry a supported file extension.
    /// - if `path` targets an invalid location (`FileNotFound` or `PermissionDenied`)
    pub fn new(path: &Path) -> Result<PopulationReader<'a>> {
        use PopulationReaderError::OpenFile;
        let sep = Self::get_file_format(path)?.separator();
        File::open(path)
            .map(|file| PopulationReader{source: Box::new(BufReader::new(file)), sep})
            .map_err(|e| OpenFile(path.display().to_string(), e))
            .loc("While attempting to create a new PopulationReader")
    }

    /// Instantiate a `PopulationReader` over any buffered source, using the provided separator.
    pub fn from_reader(source: impl BufRead + 'a, sep: char) -> Self {
        Self{source: Box::new(source), sep}
    }

    fn get_file_format(path: &Path) -> Result<PopulationReaderMode> {
        let extension = path.extension()
            .ok_or(PopulationReaderError::MissingExtension)
            .loc("While attempting to extract file extension")?;
        PopulationReaderMode::from_str(&extension.to_string_lossy())
            .loc("While attempting to retrieve input file format")
    }

    /// Parse every record of the dataset and resolve them into a `Population`.
    /// 
    /// # Errors
    /// - `MissingHeader` or `MissingColumn` if the header is absent, or lacks a required column.
    /// - `MalformedLine` if a record does not contain enough fields.
    /// - `InvalidRecord` if a record carries an invalid trait marker, or a duplicate name.
    /// - `InvalidPopulation` if parent references cannot be resolved (see `pedigree::PopulationBuilder`)
    pub fn read(self) -> Result<Population> {
        use PopulationReaderError::{MissingHeader, MalformedLine, MissingName, InvalidRecord, InvalidPopulation, ReadLine};
        let sep = self.sep;
        let mut lines = self.source.lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.map_err(|err| ReadLine(i + 1, err))))
            .filter(|(_, line)| line.as_ref().map_or(true, |line| !skip_line(line)));

        let (_, header) = lines.next().ok_or(MissingHeader).loc("While parsing dataset header")?;
        let columns = Self::parse_header(&header?, sep)?;
        let expected = columns.iter().max().map_or(0, |max| max + 1);

        let mut builder = PopulationBuilder::default();
        for (n, line) in lines {
            let loc_msg = || format!("While parsing line {n} of the dataset");
            let line = line.with_loc(loc_msg)?;
            let fields: Vec<&str> = line.split(sep).map(str::trim).collect();
            if fields.len() < expected {
                return Err(MalformedLine{line: n, expected, found: fields.len()}).with_loc(loc_msg)
            }

            let [name, mother, father, observation] = columns.map(|idx| fields[idx]);
            if name.is_empty() {
                return Err(MissingName(n)).with_loc(loc_msg)
            }
            let record = PersonRecord {
                label: name.to_string(),
                mother: non_empty(mother),
                father: non_empty(father),
                observation: Observation::from_str(observation).map_err(|err| InvalidRecord(n, err)).with_loc(loc_msg)?,
            };
            builder.add_record(record).map_err(|err| InvalidRecord(n, err)).with_loc(loc_msg)?;
        }

        let population = builder.build().map_err(InvalidPopulation).loc("While resolving family structure")?;
        if population.is_empty() {
            warn!("The provided dataset does not contain any individual.");
        }
        debug!("Found {} individuals ({} founders)", population.len(), population.founders().count());
        Ok(population)
    }

    /// Column indices of the `REQUIRED_COLUMNS` within `header`.
    fn parse_header(header: &str, sep: char) -> Result<[usize; 4]> {
        let fields: Vec<String> = header.split(sep).map(|field| field.trim().to_lowercase()).collect();
        let mut columns = [0; 4];
        for (column, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            *column = fields.iter()
                .position(|field| field == name)
                .ok_or(PopulationReaderError::MissingColumn(name))
                .loc("While parsing dataset header")?;
        }
        Ok(columns)
    }
}

fn skip_line(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

fn non_empty(field: &str) -> Option<String> {
    (!field.is_empty()).then(|| field.to_string())
}
