//! Run summary: the machine-readable result of one pipeline run.

use crate::error::{ScrubError, StructuredError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pipeline stage names, used for state tracking and failure attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Reading,
    PreTransforming,
    Detecting,
    Resolving,
    Encoding,
    PostTransforming,
    Writing,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Reading => write!(f, "reading"),
            Stage::PreTransforming => write!(f, "pre_transforming"),
            Stage::Detecting => write!(f, "detecting"),
            Stage::Resolving => write!(f, "resolving"),
            Stage::Encoding => write!(f, "encoding"),
            Stage::PostTransforming => write!(f, "post_transforming"),
            Stage::Writing => write!(f, "writing"),
        }
    }
}

/// A per-document failure recorded in the run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFailure {
    /// Source identifier of the failed document.
    pub source: String,

    /// Stage at which the failure occurred.
    pub stage: Stage,

    /// The structured error.
    pub error: StructuredError,
}

/// Aggregated statistics for one pipeline run.
///
/// Statistics accumulate only for documents that completed writing
/// (or would have been written, in dry-run mode).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Documents that completed the full pipeline.
    pub documents_processed: u64,

    /// Redacted entity counts keyed by entity type.
    pub entities_redacted_by_type: BTreeMap<String, u64>,

    /// Per-document failures, in encounter order.
    pub failures: Vec<DocumentFailure>,

    /// Whether this was a dry run (nothing written to the sink).
    pub dry_run: bool,
}

impl RunSummary {
    /// Total entities redacted across all types.
    pub fn total_entities(&self) -> u64 {
        self.entities_redacted_by_type.values().sum()
    }

    /// Whether every document read was processed successfully.
    pub fn fully_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Record a completed document's per-type counts.
    pub fn record_document(&mut self, counts: &BTreeMap<String, u64>) {
        self.documents_processed += 1;
        for (entity_type, n) in counts {
            *self
                .entities_redacted_by_type
                .entry(entity_type.clone())
                .or_insert(0) += n;
        }
    }

    /// Record a per-document failure.
    pub fn record_failure(&mut self, source: impl Into<String>, stage: Stage, err: &ScrubError) {
        self.failures.push(DocumentFailure {
            source: source.into(),
            stage,
            error: StructuredError::from(err),
        });
    }
}
