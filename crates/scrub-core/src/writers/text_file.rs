//! Writes redacted text to a file or a directory of files.

use std::path::{Path, PathBuf};

use scrub_common::{Document, Result, ScrubError};

use super::DocumentSink;

/// Writes each document's content to a file.
///
/// If the target is an existing directory (or the path ends in a path
/// separator), each document is written under its `filename` metadata;
/// otherwise every document overwrites the single target file.
pub struct TextFileWriter {
    target: PathBuf,
    is_directory: bool,
}

impl TextFileWriter {
    pub fn new(path: &Path) -> Self {
        let trailing_sep = path
            .to_str()
            .is_some_and(|s| s.ends_with(std::path::MAIN_SEPARATOR));
        Self {
            is_directory: path.is_dir() || trailing_sep,
            target: path.to_path_buf(),
        }
    }

    fn target_for(&self, document: &Document) -> Result<PathBuf> {
        if !self.is_directory {
            return Ok(self.target.clone());
        }
        let name = document
            .metadata
            .get("filename")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ScrubError::Write(format!(
                    "document '{}' has no filename metadata for directory output",
                    document.source_or_unknown()
                ))
            })?;
        Ok(self.target.join(name))
    }
}

impl DocumentSink for TextFileWriter {
    fn write(&mut self, document: &Document) -> Result<()> {
        let content = document.content.as_deref().ok_or_else(|| {
            ScrubError::Write(format!(
                "document '{}' has no content to write",
                document.source_or_unknown()
            ))
        })?;

        let path = self.target_for(document)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ScrubError::Write(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }
        std::fs::write(&path, content)
            .map_err(|e| ScrubError::Write(format!("cannot write {}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "wrote redacted document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_content_to_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let mut writer = TextFileWriter::new(&out);
        writer.write(&Document::new("redacted", "doc1")).unwrap();
        writer.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "redacted");
    }

    #[test]
    fn directory_target_uses_filename_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TextFileWriter::new(dir.path());
        let mut doc = Document::new("body", "a.txt");
        doc.metadata
            .insert("filename".to_string(), serde_json::json!("a.txt"));
        writer.write(&doc).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "body"
        );
    }

    #[test]
    fn directory_target_without_filename_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TextFileWriter::new(dir.path());
        let err = writer.write(&Document::new("body", "doc1")).unwrap_err();
        assert!(matches!(err, ScrubError::Write(_)));
    }

    #[test]
    fn contentless_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TextFileWriter::new(&dir.path().join("out.txt"));
        let err = writer.write(&Document::structured("row")).unwrap_err();
        assert!(matches!(err, ScrubError::Write(_)));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/deep/out.txt");
        let mut writer = TextFileWriter::new(&out);
        writer.write(&Document::new("x", "doc1")).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "x");
    }
}
