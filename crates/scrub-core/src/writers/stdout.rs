//! Writes redacted content to stdout.

use std::io::Write;

use scrub_common::{Document, Result, ScrubError, META_REDACTED_DATA};

use super::DocumentSink;

/// Prints each document to stdout, separated by a blank line.
///
/// Text documents print their content; structured rows print their
/// merged `redacted_data` as one JSON object per line.
#[derive(Default)]
pub struct StdoutWriter {
    documents_written: u64,
}

impl StdoutWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentSink for StdoutWriter {
    fn write(&mut self, document: &Document) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        if self.documents_written > 0 {
            writeln!(out).map_err(|e| ScrubError::Write(e.to_string()))?;
        }

        if let Some(content) = document.content.as_deref() {
            writeln!(out, "{content}").map_err(|e| ScrubError::Write(e.to_string()))?;
        } else if let Some(row) = document.metadata.get(META_REDACTED_DATA) {
            let line = serde_json::to_string(row)?;
            writeln!(out, "{line}").map_err(|e| ScrubError::Write(e.to_string()))?;
        } else {
            return Err(ScrubError::Write(format!(
                "document '{}' has neither content nor redacted_data",
                document.source_or_unknown()
            )));
        }

        self.documents_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        std::io::stdout()
            .flush()
            .map_err(|e| ScrubError::Write(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_documents() {
        let mut writer = StdoutWriter::new();
        let err = writer.write(&Document::structured("row")).unwrap_err();
        assert!(matches!(err, ScrubError::Write(_)));
    }

    #[test]
    fn accepts_text_and_structured_documents() {
        let mut writer = StdoutWriter::new();
        writer.write(&Document::new("text", "doc1")).unwrap();

        let mut row = Document::structured("row2");
        row.metadata.insert(
            META_REDACTED_DATA.to_string(),
            serde_json::json!({"name": "<PERSON:ab>"}),
        );
        writer.write(&row).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.documents_written, 2);
    }
}
