//! Error taxonomy for scrub.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints (per-document skip vs fatal abort)
//! - Remediation suggestions for humans
//!
//! The pipeline catches recoverable errors at the orchestrator boundary,
//! attributes them to the failing document's source identifier, and
//! continues; fatal errors propagate to the caller before the run starts
//! or abort it immediately.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for scrub operations.
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file or value errors.
    Config,
    /// Component registry errors (unknown/duplicate names).
    Registry,
    /// Per-document pipeline stage errors.
    Pipeline,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Registry => write!(f, "registry"),
            ErrorCategory::Pipeline => write!(f, "pipeline"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for scrub.
#[derive(Error, Debug)]
pub enum ScrubError {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{role} '{name}' is already registered")]
    DuplicateRegistration { role: String, name: String },

    #[error("{role} '{name}' not found. Available: {available}")]
    UnknownComponent {
        role: String,
        name: String,
        available: String,
    },

    #[error("failed to construct {role} '{name}': {message}")]
    Initialization {
        role: String,
        name: String,
        message: String,
    },

    // Per-document errors (20-29)
    #[error("detection failed: {0}")]
    Detection(String),

    #[error("invalid span [{start}, {end}) for entity '{entity_type}'")]
    InvalidSpan {
        entity_type: String,
        start: usize,
        end: usize,
    },

    #[error("read failed: {0}")]
    Read(String),

    #[error("write failed: {0}")]
    Write(String),

    #[error("transform '{name}' failed: {message}")]
    Transform { name: String, message: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrubError {
    /// Returns the stable error code for this error type.
    ///
    /// Error codes are grouped by category:
    /// - 10-19: Configuration and registry errors (fatal, pre-run)
    /// - 20-29: Per-document pipeline errors (recoverable)
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            ScrubError::Configuration(_) => 10,
            ScrubError::DuplicateRegistration { .. } => 11,
            ScrubError::UnknownComponent { .. } => 12,
            ScrubError::Initialization { .. } => 13,
            ScrubError::Detection(_) => 20,
            ScrubError::InvalidSpan { .. } => 21,
            ScrubError::Read(_) => 22,
            ScrubError::Write(_) => 23,
            ScrubError::Transform { .. } => 24,
            ScrubError::Io(_) => 60,
            ScrubError::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScrubError::Configuration(_) => ErrorCategory::Config,
            ScrubError::DuplicateRegistration { .. }
            | ScrubError::UnknownComponent { .. }
            | ScrubError::Initialization { .. } => ErrorCategory::Registry,
            ScrubError::Detection(_)
            | ScrubError::InvalidSpan { .. }
            | ScrubError::Read(_)
            | ScrubError::Write(_)
            | ScrubError::Transform { .. } => ErrorCategory::Pipeline,
            ScrubError::Io(_) | ScrubError::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether the orchestrator may skip the current document and
    /// continue, as opposed to aborting the run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Pre-run errors: the run never starts
            ScrubError::Configuration(_) => false,
            ScrubError::DuplicateRegistration { .. } => false,
            ScrubError::UnknownComponent { .. } => false,
            ScrubError::Initialization { .. } => false,

            // Per-document: skip and record
            ScrubError::Detection(_) => true,
            ScrubError::InvalidSpan { .. } => true,
            ScrubError::Read(_) => true,
            ScrubError::Write(_) => true,
            ScrubError::Transform { .. } => true,

            // I/O outside a document stage is fatal
            ScrubError::Io(_) => false,
            ScrubError::Json(_) => false,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            ScrubError::Configuration(_) => {
                "Check the configuration file. The secret key must be non-empty and the confidence threshold in [0.0, 1.0]."
            }
            ScrubError::DuplicateRegistration { .. } => {
                "Each component name may be registered once per registry; pass override to replace it."
            }
            ScrubError::UnknownComponent { .. } => {
                "Check the component name against the available list, or register the component before running."
            }
            ScrubError::Initialization { .. } => {
                "The component rejected its construction arguments. Check paths and component options."
            }
            ScrubError::Detection(_) => {
                "The detector failed for this document. The document is skipped; inspect the run summary."
            }
            ScrubError::InvalidSpan { .. } => {
                "The detector produced an empty or out-of-bounds span. The document is skipped."
            }
            ScrubError::Read(_) => {
                "Check that the input exists and is readable with the configured encoding."
            }
            ScrubError::Write(_) => {
                "Check output path permissions and free disk space."
            }
            ScrubError::Transform { .. } => {
                "A transform rejected this document. The document is skipped; inspect the run summary."
            }
            ScrubError::Io(_) => {
                "Check disk space, permissions, and that target directories exist."
            }
            ScrubError::Json(_) => {
                "Invalid JSON produced or consumed. This is likely a bug; please report it."
            }
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            ScrubError::Configuration(_) => "Configuration Error",
            ScrubError::DuplicateRegistration { .. } => "Duplicate Component Registration",
            ScrubError::UnknownComponent { .. } => "Unknown Component",
            ScrubError::Initialization { .. } => "Component Initialization Failed",
            ScrubError::Detection(_) => "Entity Detection Failed",
            ScrubError::InvalidSpan { .. } => "Invalid Entity Span",
            ScrubError::Read(_) => "Read Failed",
            ScrubError::Write(_) => "Write Failed",
            ScrubError::Transform { .. } => "Transform Failed",
            ScrubError::Io(_) => "I/O Error",
            ScrubError::Json(_) => "JSON Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error allowed the run to continue.
    pub recoverable: bool,

    /// Additional structured context.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&ScrubError> for StructuredError {
    fn from(err: &ScrubError) -> Self {
        let mut context = HashMap::new();

        match err {
            ScrubError::InvalidSpan {
                entity_type,
                start,
                end,
            } => {
                context.insert("entity_type".to_string(), serde_json::json!(entity_type));
                context.insert("start".to_string(), serde_json::json!(start));
                context.insert("end".to_string(), serde_json::json!(end));
            }
            ScrubError::UnknownComponent { role, name, .. } => {
                context.insert("role".to_string(), serde_json::json!(role));
                context.insert("name".to_string(), serde_json::json!(name));
            }
            ScrubError::Initialization { role, name, .. } => {
                context.insert("role".to_string(), serde_json::json!(role));
                context.insert("name".to_string(), serde_json::json!(name));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
pub fn format_error_human(err: &ScrubError, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
