//! Typed configuration for one pipeline run.

use crate::validate::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

fn default_threshold() -> f64 {
    0.5
}

fn default_detector() -> String {
    "pattern".to_string()
}

fn default_entities() -> BTreeSet<String> {
    [
        "PERSON",
        "LOCATION",
        "DATE_TIME",
        "PHONE_NUMBER",
        "EMAIL_ADDRESS",
        "US_SSN",
        "MEDICAL_RECORD_NUMBER",
        "PRESCRIPTION_NUMBER",
        "INSURANCE_ID",
        "ACCOUNT_NUMBER",
        "URL",
        "IP_ADDRESS",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Processing limits and knobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingOptions {
    /// Stop after this many documents (unlimited if absent).
    #[serde(default)]
    pub max_documents: Option<u64>,
}

/// Configuration for one pipeline run.
///
/// Read-only after initialization; safely shared across parallel runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfiguration {
    /// Secret key for token hashing. Must be non-empty.
    pub secret_key: String,

    /// Minimum detector confidence for a candidate to be considered.
    #[serde(default = "default_threshold")]
    pub confidence_threshold: f64,

    /// Entity types eligible for redaction.
    #[serde(default = "default_entities")]
    pub entities: BTreeSet<String>,

    /// Per-entity-type conflict-resolution priorities (higher wins).
    #[serde(default)]
    pub priorities: BTreeMap<String, i32>,

    /// Priority for entity types absent from `priorities`.
    #[serde(default)]
    pub default_priority: i32,

    /// Detector adapter name.
    #[serde(default = "default_detector")]
    pub detector: String,

    /// Transform names applied before detection, in order.
    #[serde(default)]
    pub pre_transforms: Vec<String>,

    /// Transform names applied after redaction, in order.
    #[serde(default)]
    pub post_transforms: Vec<String>,

    /// Fields selected for redaction in structured rows (all if empty).
    #[serde(default)]
    pub selected_fields: Vec<String>,

    /// Processing limits.
    #[serde(default)]
    pub processing: ProcessingOptions,
}

impl PipelineConfiguration {
    /// Load and validate configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ValidationResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::Io(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text.
    pub fn from_yaml(content: &str) -> ValidationResult<Self> {
        let config: PipelineConfiguration =
            serde_yaml::from_str(content).map_err(|e| ValidationError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic validation. Fatal at startup, never per document.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.secret_key.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "secret_key".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ValidationError::InvalidValue {
                field: "confidence_threshold".to_string(),
                message: format!("must be in [0.0, 1.0], got {}", self.confidence_threshold),
            });
        }

        Ok(())
    }

    /// A configuration for tests and examples.
    pub fn example(secret_key: &str) -> Self {
        let mut priorities = BTreeMap::new();
        priorities.insert("US_SSN".to_string(), 10);
        priorities.insert("MEDICAL_RECORD_NUMBER".to_string(), 9);
        priorities.insert("PERSON".to_string(), 5);
        priorities.insert("ORGANIZATION".to_string(), 2);

        Self {
            secret_key: secret_key.to_string(),
            confidence_threshold: default_threshold(),
            entities: default_entities(),
            priorities,
            default_priority: 0,
            detector: default_detector(),
            pre_transforms: Vec::new(),
            post_transforms: Vec::new(),
            selected_fields: Vec::new(),
            processing: ProcessingOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_yaml() {
        let config = PipelineConfiguration::from_yaml("secret_key: s3cret\n").unwrap();
        assert_eq!(config.secret_key, "s3cret");
        assert_eq!(config.confidence_threshold, 0.5);
        assert!(config.entities.contains("US_SSN"));
        assert_eq!(config.detector, "pattern");
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
secret_key: s3cret
confidence_threshold: 0.7
entities: [US_SSN, PERSON]
priorities:
  US_SSN: 10
default_priority: 1
detector: pattern
pre_transforms: [whitespace_normalizer]
post_transforms: [redaction_cleaner]
processing:
  max_documents: 100
"#;
        let config = PipelineConfiguration::from_yaml(yaml).unwrap();
        assert_eq!(config.confidence_threshold, 0.7);
        assert_eq!(config.entities.len(), 2);
        assert_eq!(config.priorities["US_SSN"], 10);
        assert_eq!(config.default_priority, 1);
        assert_eq!(config.pre_transforms, vec!["whitespace_normalizer"]);
        assert_eq!(config.processing.max_documents, Some(100));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let err = PipelineConfiguration::from_yaml("secret_key: \"\"\n").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let err =
            PipelineConfiguration::from_yaml("secret_key: s\nconfidence_threshold: 1.5\n")
                .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        let err = PipelineConfiguration::from_yaml(": not yaml").unwrap_err();
        assert!(matches!(err, ValidationError::Parse(_)));
    }

    #[test]
    fn test_example_validates() {
        assert!(PipelineConfiguration::example("k").validate().is_ok());
    }
}
