//! Document sinks.
//!
//! A sink receives each redacted document as it completes. `finish` is
//! called exactly once at the end of a run, on success and failure
//! paths alike, so buffered sinks can flush.

mod csv_file;
mod stdout;
mod text_file;
mod xlsx_file;

pub use csv_file::CsvWriter;
pub use stdout::StdoutWriter;
pub use text_file::TextFileWriter;
pub use xlsx_file::XlsxRowWriter;

use crate::registry::Registry;
use scrub_common::{Document, Result, ScrubError};

/// Streaming consumer of redacted documents.
pub trait DocumentSink {
    fn write(&mut self, document: &Document) -> Result<()>;

    /// Flush and release resources. Idempotent.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

pub type BoxedSink = Box<dyn DocumentSink>;

/// Registry preloaded with the built-in writers.
pub fn builtin_sinks() -> Result<Registry<BoxedSink>> {
    let mut registry: Registry<BoxedSink> = Registry::new("writer");

    registry.register("text_file", false, |args| {
        let path = args.path.ok_or_else(|| {
            ScrubError::Write("text_file writer requires an output path".to_string())
        })?;
        Ok(Box::new(TextFileWriter::new(path)) as BoxedSink)
    })?;

    registry.register("stdout", false, |_args| {
        Ok(Box::new(StdoutWriter::new()) as BoxedSink)
    })?;

    registry.register("csv_file", false, |args| {
        let path = args.path.ok_or_else(|| {
            ScrubError::Write("csv_file writer requires an output path".to_string())
        })?;
        Ok(Box::new(CsvWriter::new(path)) as BoxedSink)
    })?;

    registry.register("xlsx_file", false, |args| {
        let path = args.path.ok_or_else(|| {
            ScrubError::Write("xlsx_file writer requires an output path".to_string())
        })?;
        Ok(Box::new(XlsxRowWriter::new(path)) as BoxedSink)
    })?;

    Ok(registry)
}
