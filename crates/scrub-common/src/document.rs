//! Document and entity candidate value types.

use serde::{Deserialize, Serialize};

/// Metadata attached to a document.
///
/// An insertion-ordered string-to-JSON map. By convention it carries at
/// least a `source` identifier, and after redaction the per-entity-type
/// counts under `entity_counts`.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Metadata key holding the document's source identifier.
pub const META_SOURCE: &str = "source";

/// Metadata key holding the total number of redacted entities.
pub const META_REDACTED_ENTITIES: &str = "redacted_entities";

/// Metadata key holding the per-entity-type redaction counts.
pub const META_ENTITY_COUNTS: &str = "entity_counts";

/// Metadata key holding a structured row's original field values.
pub const META_ORIGINAL_DATA: &str = "original_data";

/// Metadata key holding the fields selected for redaction.
pub const META_SELECTED_FOR_REDACTION: &str = "selected_for_redaction";

/// Metadata key holding the redacted values of selected fields.
pub const META_REDACTED_FIELDS: &str = "redacted_fields";

/// Metadata key holding the merged output row for structured sinks.
pub const META_REDACTED_DATA: &str = "redacted_data";

/// A single unit of work flowing through the pipeline.
///
/// Owned exclusively by the pipeline for the duration of one iteration;
/// the orchestrator never holds more than one at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Free-text content. `None` for structured rows whose fields are
    /// redacted individually via metadata.
    pub content: Option<String>,

    /// Document metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a document with content and a source identifier.
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert(
            META_SOURCE.to_string(),
            serde_json::Value::String(source.into()),
        );
        Self {
            content: Some(content.into()),
            metadata,
        }
    }

    /// Create a content-less document (structured data) with a source.
    pub fn structured(source: impl Into<String>) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert(
            META_SOURCE.to_string(),
            serde_json::Value::String(source.into()),
        );
        Self {
            content: None,
            metadata,
        }
    }

    /// The document's source identifier, if present.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(META_SOURCE).and_then(|v| v.as_str())
    }

    /// The source identifier, or a placeholder for documents without one.
    pub fn source_or_unknown(&self) -> &str {
        self.source().unwrap_or("<unknown>")
    }
}

/// A detector's proposed PII span.
///
/// Offsets are code-point (char) based: `start` inclusive, `end`
/// exclusive. Immutable once produced; discarded after conflict
/// resolution for the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCandidate {
    /// Entity type name, e.g. `US_SSN` or `PERSON`.
    pub entity_type: String,

    /// Inclusive start offset in chars.
    pub start: usize,

    /// Exclusive end offset in chars.
    pub end: usize,

    /// Detector confidence in [0, 1].
    pub confidence: f64,
}

impl EntityCandidate {
    /// Create a candidate.
    pub fn new(entity_type: impl Into<String>, start: usize, end: usize, confidence: f64) -> Self {
        Self {
            entity_type: entity_type.into(),
            start,
            end,
            confidence,
        }
    }

    /// Span length in chars.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty (invalid for redaction).
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether this span intersects another.
    pub fn overlaps(&self, other: &EntityCandidate) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The substring of `text` implied by the span's char offsets.
    pub fn source_text<'a>(&self, text: &'a str) -> Option<&'a str> {
        let mut indices = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()));
        let byte_start = indices.nth(self.start)?;
        let byte_end = if self.end > self.start {
            text[byte_start..]
                .char_indices()
                .map(|(i, _)| byte_start + i)
                .chain(std::iter::once(text.len()))
                .nth(self.end - self.start)?
        } else {
            byte_start
        };
        text.get(byte_start..byte_end)
    }
}
