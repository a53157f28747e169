//! Post-redaction text cleanup.

use once_cell::sync::Lazy;
use regex::Regex;
use scrub_common::{Document, Result};

use super::Transform;

static TOKEN_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(<[A-Z0-9_]+:[0-9a-f]+>)(?:[ \t]+<[A-Z0-9_]+:[0-9a-f]+>)+").unwrap()
});

static SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+([.,;:!?])").unwrap());

/// Tidies redacted text: merges runs of adjacent redaction tokens on
/// the same line into the first token, and removes space left in front
/// of punctuation where a span was replaced.
pub struct RedactionCleaner {
    pub merge_adjacent: bool,
}

impl RedactionCleaner {
    pub fn new() -> Self {
        Self {
            merge_adjacent: true,
        }
    }

    fn clean(&self, text: &str) -> String {
        let text = if self.merge_adjacent {
            TOKEN_RUN.replace_all(text, "$1").into_owned()
        } else {
            text.to_string()
        };
        SPACE_BEFORE_PUNCT.replace_all(&text, "$1").into_owned()
    }
}

impl Default for RedactionCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for RedactionCleaner {
    fn apply(&self, mut document: Document) -> Result<Document> {
        if let Some(content) = document.content.take() {
            document.content = Some(self.clean(&content));
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> String {
        RedactionCleaner::new()
            .apply(Document::new(text, "t"))
            .unwrap()
            .content
            .unwrap()
    }

    #[test]
    fn merges_adjacent_tokens_into_the_first() {
        assert_eq!(
            run("Seen by <PERSON:aaaa> <PERSON:bbbb> today"),
            "Seen by <PERSON:aaaa> today"
        );
    }

    #[test]
    fn removes_space_before_punctuation() {
        assert_eq!(run("Call <PHONE_NUMBER:cccc> ."), "Call <PHONE_NUMBER:cccc>.");
    }

    #[test]
    fn leaves_single_tokens_alone() {
        assert_eq!(
            run("SSN <US_SSN:dddd> on file"),
            "SSN <US_SSN:dddd> on file"
        );
    }

    #[test]
    fn does_not_merge_across_lines() {
        assert_eq!(
            run("<PERSON:aaaa>\n<PERSON:bbbb>"),
            "<PERSON:aaaa>\n<PERSON:bbbb>"
        );
    }
}
