//! Reads CSV files, one document per data row.

use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use scrub_common::{Document, Result, ScrubError, META_ORIGINAL_DATA};
use serde_json::Value;

use super::DocumentSource;

/// Yields one content-less document per CSV row.
///
/// Field values land in metadata under `original_data` keyed by header
/// name; a field-selector transform decides which of them get redacted.
/// Rows whose fields are all empty are skipped.
#[derive(Debug)]
pub struct CsvRowReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    path: String,
    /// 1-based file line of the next data row (header is line 1).
    row: u64,
}

impl CsvRowReader {
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| ScrubError::Read(format!("cannot open {}: {}", path.display(), e)))?;
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
        let headers = reader
            .headers()
            .map_err(|e| ScrubError::Read(format!("cannot read CSV header: {e}")))?
            .clone();
        if headers.is_empty() {
            return Err(ScrubError::Read(format!(
                "CSV file has no header row: {}",
                path.display()
            )));
        }
        Ok(Self {
            reader,
            headers,
            path: path.display().to_string(),
            row: 1,
        })
    }
}

impl DocumentSource for CsvRowReader {
    fn next_document(&mut self) -> Result<Option<Document>> {
        loop {
            let mut record = StringRecord::new();
            let more = self
                .reader
                .read_record(&mut record)
                .map_err(|e| ScrubError::Read(format!("{} row {}: {}", self.path, self.row + 1, e)))?;
            if !more {
                return Ok(None);
            }
            self.row += 1;

            if record.iter().all(str::is_empty) {
                tracing::debug!(row = self.row, "skipping empty CSV row");
                continue;
            }

            let mut original = serde_json::Map::new();
            for (header, value) in self.headers.iter().zip(record.iter()) {
                original.insert(header.to_string(), Value::String(value.to_string()));
            }

            let mut document = Document::structured(format!("{}#row{}", self.path, self.row));
            document
                .metadata
                .insert("row_number".to_string(), Value::from(self.row));
            document
                .metadata
                .insert(META_ORIGINAL_DATA.to_string(), Value::Object(original));
            return Ok(Some(document));
        }
    }

    fn last_source(&self) -> Option<String> {
        // A failed read never advanced `row`, so the failing row is the
        // one after it.
        Some(format!("{}#row{}", self.path, self.row + 1))
    }
}
