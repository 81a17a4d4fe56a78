pub mod generic_writer;
pub use generic_writer::{GenericWriter, WriterError};

pub mod report;
pub use report::Report;
