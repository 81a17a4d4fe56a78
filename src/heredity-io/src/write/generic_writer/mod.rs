use std::{fs::File, io::{Write, BufWriter}, path::Path};

use located_error::prelude::*;

pub mod error;
pub use error::WriterError;

/// A generic file writer.
/// - source: Boxed `BufWriter` (can either handle file-writing, or stdout).
pub struct GenericWriter<'a> {
    source: BufWriter<Box<dyn Write + 'a>>
}

impl<'a> GenericWriter<'a>{
    /// Instantiate a new `Writer`, linked to a file, or to stdout if `path` is `None`
    /// 
    /// # Errors
    /// if `path` is either an invalid file, or the user does not have the proper
    /// UNIX permissions to write at this location.
    pub fn new(path: Option<impl AsRef<Path>>) -> Result<GenericWriter<'a>>{
        Ok(GenericWriter{ source: match path {
            Some(path) => {
                let path = path.as_ref();
                let file = File::create(path)
                    .map_err(|err| WriterError::CreateFile(path.display().to_string(), err))
                    .loc("While creating file")?;
                BufWriter::new(Box::new(file))
            },
            None => {
                BufWriter::new(Box::new(std::io::stdout()))
            }
        }})
    }

    /// Instantiate a `Writer` over any sink.
    pub fn from_writer(sink: impl Write + 'a) -> Self {
        Self{source: BufWriter::new(Box::new(sink))}
    }

    /// Write the contents of a generic iterator within a file/stdout.
    /// one Iteration step = one line.
    /// 
    /// # Errors
    /// - If any of the Items within `iter` fails to get written within the file.
    pub fn write_iter<T, I>(&mut self, iter: T) -> Result<()>
    where   T: IntoIterator<Item = I>,
            I: std::fmt::Display,
    {
        iter.into_iter()
            .try_for_each(|obj| writeln!(self.source, "{obj}"))
            .map_err(WriterError::IOError)
            .loc("While writing contents into file")?;

        self.source.flush().map_err(WriterError::IOError).loc("While flushing buffer contents of Writer")
    }
}
