//! Shared types for the scrub redaction pipeline.
//!
//! This crate provides the value types that flow between every other
//! scrub crate:
//! - `Document` and `EntityCandidate` (the data model)
//! - `ScrubError` (the unified error taxonomy with stable codes)
//! - `RunSummary` (the machine-readable run contract)
//! - CLI exit codes

pub mod document;
pub mod error;
pub mod exit_codes;
pub mod summary;

pub use document::{
    Document, EntityCandidate, Metadata, META_ENTITY_COUNTS, META_ORIGINAL_DATA,
    META_REDACTED_DATA, META_REDACTED_ENTITIES, META_REDACTED_FIELDS, META_SELECTED_FOR_REDACTION,
    META_SOURCE,
};
pub use error::{format_error_human, ErrorCategory, Result, ScrubError, StructuredError};
pub use exit_codes::ExitCode;
pub use summary::{DocumentFailure, RunSummary, Stage};
