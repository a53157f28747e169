//! Whitespace normalization pre-transform.

use scrub_common::{Document, Result};

use super::Transform;

/// Collapses runs of spaces and tabs and trims line ends.
///
/// With `preserve_paragraphs` (the default), blank-line paragraph
/// breaks survive as a single empty line; otherwise all line breaks
/// collapse into spaces.
pub struct WhitespaceNormalizer {
    pub preserve_paragraphs: bool,
}

impl Default for WhitespaceNormalizer {
    fn default() -> Self {
        Self {
            preserve_paragraphs: true,
        }
    }
}

impl WhitespaceNormalizer {
    fn normalize(&self, text: &str) -> String {
        let lines: Vec<String> = text
            .lines()
            .map(|line| {
                let mut out = String::with_capacity(line.len());
                let mut pending_space = false;
                for ch in line.trim().chars() {
                    if ch == ' ' || ch == '\t' {
                        pending_space = true;
                        continue;
                    }
                    if pending_space && !out.is_empty() {
                        out.push(' ');
                    }
                    pending_space = false;
                    out.push(ch);
                }
                out
            })
            .collect();

        if self.preserve_paragraphs {
            // Collapse runs of blank lines into single paragraph breaks.
            let mut out: Vec<&str> = Vec::with_capacity(lines.len());
            let mut blank_run = false;
            for line in &lines {
                if line.is_empty() {
                    blank_run = true;
                    continue;
                }
                if blank_run && !out.is_empty() {
                    out.push("");
                }
                blank_run = false;
                out.push(line);
            }
            out.join("\n")
        } else {
            lines
                .iter()
                .filter(|l| !l.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}

impl Transform for WhitespaceNormalizer {
    fn apply(&self, mut document: Document) -> Result<Document> {
        if let Some(content) = document.content.take() {
            document.content = Some(self.normalize(&content));
        }
        Ok(document)
    }
}
