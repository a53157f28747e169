//! Reads UTF-8 text files, one document per file.

use std::path::{Path, PathBuf};

use scrub_common::{Document, Result, ScrubError};
use serde_json::Value;

use super::DocumentSource;

/// Yields one document per `.txt` file.
///
/// Accepts either a single file (any extension) or a directory, in which
/// case its `.txt` entries are read in sorted order. Subdirectories are
/// not descended into.
#[derive(Debug)]
pub struct TextFileReader {
    files: Vec<PathBuf>,
    next: usize,
}

impl TextFileReader {
    pub fn new(path: &Path) -> Result<Self> {
        let files = if path.is_file() {
            vec![path.to_path_buf()]
        } else if path.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(path)
                .map_err(|e| ScrubError::Read(format!("cannot list {}: {}", path.display(), e)))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
                .collect();
            files.sort();
            if files.is_empty() {
                return Err(ScrubError::Read(format!(
                    "no .txt files in {}",
                    path.display()
                )));
            }
            files
        } else {
            return Err(ScrubError::Read(format!(
                "input path does not exist: {}",
                path.display()
            )));
        };

        Ok(Self { files, next: 0 })
    }
}

impl DocumentSource for TextFileReader {
    fn next_document(&mut self) -> Result<Option<Document>> {
        let Some(path) = self.files.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;

        let content = std::fs::read_to_string(path)
            .map_err(|e| ScrubError::Read(format!("cannot read {}: {}", path.display(), e)))?;

        let mut document = Document::new(content, path.display().to_string());
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            document
                .metadata
                .insert("filename".to_string(), Value::String(name.to_string()));
        }
        tracing::debug!(path = %path.display(), "read text document");
        Ok(Some(document))
    }

    fn last_source(&self) -> Option<String> {
        let attempted = self.next.checked_sub(1)?;
        self.files.get(attempted).map(|p| p.display().to_string())
    }
}
