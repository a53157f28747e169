//! Writes structured rows to an Excel workbook.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use scrub_common::{Document, Result, ScrubError, META_REDACTED_DATA};

use super::DocumentSink;

const SHEET_NAME: &str = "Redacted Data";

/// Writes each document's `redacted_data` as one worksheet row.
///
/// Columns come from the first row's keys, like the CSV writer; later
/// rows are projected onto them (missing keys become empty cells). The
/// workbook is assembled in memory and saved by `finish()`; a run that
/// wrote no rows leaves no file behind.
pub struct XlsxRowWriter {
    path: PathBuf,
    workbook: Workbook,
    columns: Option<Vec<String>>,
    next_row: u32,
}

impl XlsxRowWriter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            workbook: Workbook::new(),
            columns: None,
            next_row: 0,
        }
    }
}

impl DocumentSink for XlsxRowWriter {
    fn write(&mut self, document: &Document) -> Result<()> {
        let Some(row) = document.metadata.get(META_REDACTED_DATA).and_then(|v| v.as_object())
        else {
            return Err(ScrubError::Write(format!(
                "document '{}' has no redacted_data for worksheet output",
                document.source_or_unknown()
            )));
        };

        if self.columns.is_none() {
            let worksheet = self.workbook.add_worksheet();
            worksheet
                .set_name(SHEET_NAME)
                .map_err(|e| ScrubError::Write(format!("cannot name worksheet: {e}")))?;
            let columns: Vec<String> = row.keys().cloned().collect();
            for (col, name) in columns.iter().enumerate() {
                worksheet
                    .write_string(0, col as u16, name)
                    .map_err(|e| ScrubError::Write(format!("cannot write header: {e}")))?;
            }
            self.columns = Some(columns);
            self.next_row = 1;
        }

        let columns = self
            .columns
            .as_ref()
            .ok_or_else(|| ScrubError::Write("worksheet not initialized".to_string()))?;
        let worksheet = self
            .workbook
            .worksheet_from_index(0)
            .map_err(|e| ScrubError::Write(format!("cannot access worksheet: {e}")))?;
        for (col, column) in columns.iter().enumerate() {
            let text = match row.get(column) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            worksheet
                .write_string(self.next_row, col as u16, &text)
                .map_err(|e| ScrubError::Write(format!("cannot write row: {e}")))?;
        }
        self.next_row += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.columns.is_none() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ScrubError::Write(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }
        self.workbook
            .save(&self.path)
            .map_err(|e| ScrubError::Write(format!("cannot save {}: {}", self.path.display(), e)))
    }
}
