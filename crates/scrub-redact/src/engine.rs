//! The redaction engine: resolve conflicts, derive tokens, splice.
//!
//! Ties the resolver and codec together behind one call so the pipeline
//! orchestrator's correctness guarantees (at-most-one redaction per
//! span, deterministic output) hold in a single place.

use crate::codec::apply_redactions;
use crate::hash::KeyMaterial;
use crate::priority::EntityPriorityTable;
use crate::resolve::resolve_conflicts;
use scrub_common::{EntityCandidate, Result};
use std::collections::BTreeMap;

/// Result of redacting one text buffer.
#[derive(Debug, Clone)]
pub struct RedactedText {
    /// The buffer with winning spans replaced by tokens.
    pub text: String,

    /// Redacted entity counts keyed by entity type.
    pub counts: BTreeMap<String, u64>,
}

/// Deterministic, keyed redaction of resolved entity spans.
pub struct RedactionEngine {
    key: KeyMaterial,
    priorities: EntityPriorityTable,
}

impl RedactionEngine {
    /// Create an engine from the deployment secret and priority table.
    ///
    /// Fails at construction (not per document) if the secret is empty.
    pub fn new(secret: &str, priorities: EntityPriorityTable) -> Result<Self> {
        Ok(Self {
            key: KeyMaterial::new(secret)?,
            priorities,
        })
    }

    /// The priority table in use.
    pub fn priorities(&self) -> &EntityPriorityTable {
        &self.priorities
    }

    /// Resolve candidate conflicts and splice tokens into `text`.
    ///
    /// Candidates are expected to be pre-filtered by confidence
    /// threshold and enabled entity types (the detector contract).
    pub fn redact_text(&self, text: &str, candidates: Vec<EntityCandidate>) -> Result<RedactedText> {
        let buffer_chars = text.chars().count();
        let winners = resolve_conflicts(&self.priorities, buffer_chars, &candidates)?;
        let (text, counts) = apply_redactions(&self.key, text, &winners)?;
        Ok(RedactedText { text, counts })
    }
}
