//! Reads Excel workbooks, one document per data row.

use std::collections::VecDeque;
use std::path::Path;

use calamine::{open_workbook, Data, Reader as _, Xlsx};
use scrub_common::{Document, Result, ScrubError, META_ORIGINAL_DATA};
use serde_json::Value;

use super::DocumentSource;

/// Yields one content-less document per row of the first worksheet.
///
/// The first row supplies the column names (empty headers become
/// `Column_<n>`); rows whose cells are all empty are skipped. The
/// format is not streamable, so the whole sheet is decoded up front
/// and rows are handed out one at a time.
#[derive(Debug)]
pub struct XlsxRowReader {
    pending: VecDeque<Document>,
}

impl XlsxRowReader {
    pub fn new(path: &Path) -> Result<Self> {
        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e| ScrubError::Read(format!("cannot open {}: {}", path.display(), e)))?;
        let sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| {
                ScrubError::Read(format!("workbook has no sheets: {}", path.display()))
            })?;
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| ScrubError::Read(format!("cannot read sheet '{sheet}': {e}")))?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .enumerate()
                .map(|(i, cell)| match cell {
                    Data::Empty => format!("Column_{i}"),
                    other => other.to_string(),
                })
                .collect(),
            None => Vec::new(),
        };

        let source = path.display().to_string();
        let mut pending = VecDeque::new();
        // Data rows start at file row 2, same numbering as the CSV reader.
        for (offset, row) in rows.enumerate() {
            let row_number = offset as u64 + 2;
            if row.iter().all(cell_is_empty) {
                tracing::debug!(row = row_number, "skipping empty worksheet row");
                continue;
            }

            let mut original = serde_json::Map::new();
            for (header, cell) in headers.iter().zip(row.iter()) {
                let text = match cell {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                };
                original.insert(header.clone(), Value::String(text));
            }

            let mut document = Document::structured(format!("{source}#row{row_number}"));
            document
                .metadata
                .insert("sheet".to_string(), Value::String(sheet.clone()));
            document
                .metadata
                .insert("row_number".to_string(), Value::from(row_number));
            document
                .metadata
                .insert(META_ORIGINAL_DATA.to_string(), Value::Object(original));
            pending.push_back(document);
        }

        Ok(Self { pending })
    }
}

fn cell_is_empty(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

impl DocumentSource for XlsxRowReader {
    fn next_document(&mut self) -> Result<Option<Document>> {
        Ok(self.pending.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn write_sheet(rows: &[&[&str]]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                worksheet.write_string(r as u32, c as u16, *cell).unwrap();
            }
        }
        workbook.save(&path).unwrap();
        (dir, path)
    }

    #[test]
    fn rows_become_structured_documents() {
        let (_dir, path) = write_sheet(&[
            &["name", "ssn"],
            &["John", "123-45-6789"],
            &["Jane", "987-65-4321"],
        ]);
        let mut reader = XlsxRowReader::new(&path).unwrap();

        let first = reader.next_document().unwrap().unwrap();
        assert!(first.content.is_none());
        assert_eq!(first.metadata["row_number"], 2);
        assert_eq!(first.metadata[META_ORIGINAL_DATA]["name"], "John");
        assert_eq!(first.metadata[META_ORIGINAL_DATA]["ssn"], "123-45-6789");
        assert!(first.source().unwrap().ends_with("rows.xlsx#row2"));

        let second = reader.next_document().unwrap().unwrap();
        assert_eq!(second.metadata[META_ORIGINAL_DATA]["name"], "Jane");
        assert!(reader.next_document().unwrap().is_none());
    }

    #[test]
    fn empty_rows_are_skipped() {
        let (_dir, path) = write_sheet(&[&["a", "b"], &["", ""], &["x", "y"]]);
        let mut reader = XlsxRowReader::new(&path).unwrap();
        let doc = reader.next_document().unwrap().unwrap();
        assert_eq!(doc.metadata[META_ORIGINAL_DATA]["a"], "x");
        assert!(reader.next_document().unwrap().is_none());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = XlsxRowReader::new(Path::new("/no/such.xlsx")).unwrap_err();
        assert!(matches!(err, ScrubError::Read(_)));
    }
}
