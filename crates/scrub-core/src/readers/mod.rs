//! Document sources.
//!
//! A source yields documents one at a time; the orchestrator never asks
//! for the next document before the current one has left the pipeline.
//! An implementation must advance past a failed item so a per-document
//! read error does not repeat forever.

mod csv_file;
mod text_file;
mod xlsx_file;

pub use csv_file::CsvRowReader;
pub use text_file::TextFileReader;
pub use xlsx_file::XlsxRowReader;

use crate::registry::Registry;
use scrub_common::{Document, Result, ScrubError};

/// Streaming producer of documents.
pub trait DocumentSource {
    /// The next document, or `Ok(None)` once the source is exhausted.
    fn next_document(&mut self) -> Result<Option<Document>>;

    /// Identifier of the most recently attempted item, so a failed
    /// read can be attributed in the run summary.
    fn last_source(&self) -> Option<String> {
        None
    }
}

pub type BoxedSource = Box<dyn DocumentSource>;

/// Registry preloaded with the built-in readers.
pub fn builtin_sources() -> Result<Registry<BoxedSource>> {
    let mut registry: Registry<BoxedSource> = Registry::new("reader");

    registry.register("text_file", false, |args| {
        let path = args.path.ok_or_else(|| {
            ScrubError::Read("text_file reader requires an input path".to_string())
        })?;
        Ok(Box::new(TextFileReader::new(path)?) as BoxedSource)
    })?;

    registry.register("csv_file", false, |args| {
        let path = args.path.ok_or_else(|| {
            ScrubError::Read("csv_file reader requires an input path".to_string())
        })?;
        Ok(Box::new(CsvRowReader::new(path)?) as BoxedSource)
    })?;

    registry.register("xlsx_file", false, |args| {
        let path = args.path.ok_or_else(|| {
            ScrubError::Read("xlsx_file reader requires an input path".to_string())
        })?;
        Ok(Box::new(XlsxRowReader::new(path)?) as BoxedSource)
    })?;

    Ok(registry)
}
