//! Writes structured rows back out as CSV.

use std::fs::File;
use std::path::{Path, PathBuf};

use scrub_common::{Document, Result, ScrubError, META_REDACTED_DATA};

use super::DocumentSink;

/// Writes each document's `redacted_data` as one CSV row.
///
/// The header is taken from the first row's keys; later rows are
/// projected onto those columns (missing keys become empty fields).
/// A document without `redacted_data` is a write error: counting it as
/// processed while emitting nothing would misstate the run summary.
pub struct CsvWriter {
    path: PathBuf,
    state: Option<WriterState>,
}

struct WriterState {
    writer: csv::Writer<File>,
    columns: Vec<String>,
}

impl CsvWriter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            state: None,
        }
    }
}

impl DocumentSink for CsvWriter {
    fn write(&mut self, document: &Document) -> Result<()> {
        let Some(row) = document.metadata.get(META_REDACTED_DATA).and_then(|v| v.as_object())
        else {
            return Err(ScrubError::Write(format!(
                "document '{}' has no redacted_data for CSV output",
                document.source_or_unknown()
            )));
        };

        if self.state.is_none() {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        ScrubError::Write(format!("cannot create {}: {}", parent.display(), e))
                    })?;
                }
            }
            let file = File::create(&self.path).map_err(|e| {
                ScrubError::Write(format!("cannot create {}: {}", self.path.display(), e))
            })?;
            let mut writer = csv::Writer::from_writer(file);
            let columns: Vec<String> = row.keys().cloned().collect();
            writer
                .write_record(&columns)
                .map_err(|e| ScrubError::Write(format!("cannot write CSV header: {e}")))?;
            self.state = Some(WriterState { writer, columns });
        }

        let state = self
            .state
            .as_mut()
            .ok_or_else(|| ScrubError::Write("CSV writer not initialized".to_string()))?;
        let fields: Vec<String> = state
            .columns
            .iter()
            .map(|column| match row.get(column) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            })
            .collect();
        state
            .writer
            .write_record(&fields)
            .map_err(|e| ScrubError::Write(format!("cannot write CSV row: {e}")))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(state) = self.state.as_mut() {
            state
                .writer
                .flush()
                .map_err(|e| ScrubError::Write(format!("cannot flush CSV output: {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_doc(source: &str, row: serde_json::Value) -> Document {
        let mut doc = Document::structured(source);
        doc.metadata.insert(META_REDACTED_DATA.to_string(), row);
        doc
    }

    #[test]
    fn first_row_sets_header_order() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let mut writer = CsvWriter::new(&out);

        writer
            .write(&row_doc("r2", serde_json::json!({"name": "A", "ssn": "<US_SSN:x>"})))
            .unwrap();
        writer
            .write(&row_doc("r3", serde_json::json!({"name": "B", "ssn": "<US_SSN:y>"})))
            .unwrap();
        writer.finish().unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text, "name,ssn\nA,<US_SSN:x>\nB,<US_SSN:y>\n");
    }

    #[test]
    fn missing_columns_become_empty_fields() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let mut writer = CsvWriter::new(&out);

        writer
            .write(&row_doc("r2", serde_json::json!({"a": "1", "b": "2"})))
            .unwrap();
        writer.write(&row_doc("r3", serde_json::json!({"a": "3"}))).unwrap();
        writer.finish().unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text, "a,b\n1,2\n3,\n");
    }

    #[test]
    fn documents_without_redacted_data_are_write_errors() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let mut writer = CsvWriter::new(&out);

        let err = writer.write(&Document::new("plain text", "doc1")).unwrap_err();
        assert!(matches!(err, ScrubError::Write(_)));
        writer.finish().unwrap();
        // No rows were written, so the file was never created.
        assert!(!out.exists());
    }
}
