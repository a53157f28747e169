//! Merges redacted fields back into a full output row.

use scrub_common::{
    Document, Result, META_ORIGINAL_DATA, META_REDACTED_DATA, META_REDACTED_FIELDS,
};
use serde_json::Value;

use super::Transform;

/// Builds `redacted_data` for structured sinks: the original row with
/// each redacted field's value replaced.
///
/// With `preserve_unselected` off, only the redacted fields appear in
/// the output row, for exports that must not carry untouched columns.
pub struct DictMerger {
    pub preserve_unselected: bool,
}

impl DictMerger {
    pub fn new() -> Self {
        Self {
            preserve_unselected: true,
        }
    }
}

impl Default for DictMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for DictMerger {
    fn apply(&self, mut document: Document) -> Result<Document> {
        let Some(redacted) = document
            .metadata
            .get(META_REDACTED_FIELDS)
            .and_then(|v| v.as_object())
            .cloned()
        else {
            return Ok(document);
        };

        let mut merged = if self.preserve_unselected {
            document
                .metadata
                .get(META_ORIGINAL_DATA)
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default()
        } else {
            serde_json::Map::new()
        };
        for (field, value) in redacted {
            merged.insert(field, value);
        }

        document
            .metadata
            .insert(META_REDACTED_DATA.to_string(), Value::Object(merged));
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redacted_row() -> Document {
        let mut doc = Document::structured("row2");
        doc.metadata.insert(
            META_ORIGINAL_DATA.to_string(),
            serde_json::json!({"name": "John", "ssn": "123-45-6789", "age": "44"}),
        );
        doc.metadata.insert(
            META_REDACTED_FIELDS.to_string(),
            serde_json::json!({"name": "<PERSON:aa>", "ssn": "<US_SSN:bb>"}),
        );
        doc
    }

    #[test]
    fn overlays_redacted_values_on_the_original_row() {
        let doc = DictMerger::new().apply(redacted_row()).unwrap();
        let row = doc.metadata[META_REDACTED_DATA].as_object().unwrap();
        assert_eq!(row["name"], "<PERSON:aa>");
        assert_eq!(row["ssn"], "<US_SSN:bb>");
        assert_eq!(row["age"], "44");
    }

    #[test]
    fn can_drop_unselected_fields() {
        let merger = DictMerger {
            preserve_unselected: false,
        };
        let doc = merger.apply(redacted_row()).unwrap();
        let row = doc.metadata[META_REDACTED_DATA].as_object().unwrap();
        assert_eq!(row.len(), 2);
        assert!(!row.contains_key("age"));
    }

    #[test]
    fn documents_without_redacted_fields_pass_through() {
        let doc = DictMerger::new().apply(Document::new("text", "t")).unwrap();
        assert!(!doc.metadata.contains_key(META_REDACTED_DATA));
    }
}
