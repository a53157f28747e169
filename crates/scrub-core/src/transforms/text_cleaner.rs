//! Character cleanup pre-transform.

use scrub_common::{Document, Result};

use super::Transform;

/// Replaces typographic quotes and dashes with ASCII equivalents,
/// strips control characters (keeping `\n` and `\t`), and collapses
/// runs of `!` and `?`.
///
/// Running this before detection keeps regex patterns simple: they only
/// have to match straight quotes and plain hyphens.
pub struct TextCleaner {
    pub normalize_quotes: bool,
    pub lowercase: bool,
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self {
            normalize_quotes: true,
            lowercase: false,
        }
    }
}

impl TextCleaner {
    fn clean(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            let replacement: Option<&str> = if self.normalize_quotes {
                match ch {
                    '\u{2018}' | '\u{2019}' => Some("'"),
                    '\u{201c}' | '\u{201d}' => Some("\""),
                    '\u{2013}' | '\u{2014}' => Some("-"),
                    '\u{2026}' => Some("..."),
                    _ => None,
                }
            } else {
                None
            };

            match replacement {
                Some(s) => out.push_str(s),
                None if ch.is_control() && ch != '\n' && ch != '\t' => {}
                // "!!!" carries no more signal than "!": periods are
                // left alone so ellipses survive.
                None if (ch == '!' || ch == '?') && out.ends_with(ch) => {}
                None => out.push(ch),
            }
        }
        if self.lowercase {
            out.to_lowercase()
        } else {
            out
        }
    }
}

impl Transform for TextCleaner {
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

    #[test]
    fn replaces_curly_quotes_and_dashes() {
        let doc = TextCleaner::default()
            .apply(Document::new("\u{201c}Hi\u{201d} \u{2014} it\u{2019}s me", "t"))
            .unwrap();
        assert_eq!(doc.content.as_deref(), Some("\"Hi\" - it's me"));
    }

    #[test]
    fn strips_control_characters_but_keeps_newlines() {
        let doc = TextCleaner::default()
            .apply(Document::new("a\u{0}b\nc\td", "t"))
            .unwrap();
        assert_eq!(doc.content.as_deref(), Some("ab\nc\td"));
    }

    #[test]
    fn collapses_repeated_exclamation_and_question_marks() {
        let doc = TextCleaner::default()
            .apply(Document::new("urgent!!! really?? wait...", "t"))
            .unwrap();
        assert_eq!(doc.content.as_deref(), Some("urgent! really? wait..."));
    }

    #[test]
    fn optional_lowercasing() {
        let cleaner = TextCleaner {
            normalize_quotes: false,
            lowercase: true,
        };
        let doc = cleaner.apply(Document::new("MiXeD", "t")).unwrap();
        assert_eq!(doc.content.as_deref(), Some("mixed"));
    }
}
