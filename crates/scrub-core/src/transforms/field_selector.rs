//! Field selection pre-transform for structured rows.

use scrub_common::{
    Document, Result, ScrubError, META_ORIGINAL_DATA, META_SELECTED_FOR_REDACTION,
};
use serde_json::Value;

use super::Transform;

/// Copies the fields chosen for redaction out of `original_data` into
/// `selected_for_redaction`, where the pipeline redacts each value
/// independently.
///
/// An empty field list selects every string field. Selecting a field
/// the row does not have is a configuration mistake and fails the
/// document rather than silently passing PII through.
pub struct FieldSelector {
    fields: Vec<String>,
}

impl FieldSelector {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }
}

impl Transform for FieldSelector {
    fn apply(&self, mut document: Document) -> Result<Document> {
        let Some(original) = document
            .metadata
            .get(META_ORIGINAL_DATA)
            .and_then(|v| v.as_object())
            .cloned()
        else {
            // Text documents have no row data to select from.
            return Ok(document);
        };

        let mut selected = serde_json::Map::new();
        if self.fields.is_empty() {
            for (key, value) in &original {
                if value.is_string() {
                    selected.insert(key.clone(), value.clone());
                }
            }
        } else {
            for field in &self.fields {
                let value = original.get(field).ok_or_else(|| ScrubError::Transform {
                    name: "field_selector".to_string(),
                    message: format!("row has no field '{field}'"),
                })?;
                selected.insert(field.clone(), value.clone());
            }
        }

        document.metadata.insert(
            META_SELECTED_FOR_REDACTION.to_string(),
            Value::Object(selected),
        );
        Ok(document)
    }
}
