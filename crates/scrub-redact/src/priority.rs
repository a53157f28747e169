//! Entity type priority table for conflict resolution.
//!
//! Supplied by configuration at pipeline construction, not a module
//! constant, so deployments can tune it without recompilation. Higher
//! values win ties between overlapping candidates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only mapping from entity type to resolution priority.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityPriorityTable {
    /// Per-type priorities (higher wins).
    #[serde(default)]
    priorities: BTreeMap<String, i32>,

    /// Priority assigned to types absent from the table.
    #[serde(default)]
    default_priority: i32,
}

impl EntityPriorityTable {
    /// Build a table from configured priorities and a default.
    pub fn new(priorities: BTreeMap<String, i32>, default_priority: i32) -> Self {
        Self {
            priorities,
            default_priority,
        }
    }

    /// Priority for an entity type, falling back to the default.
    pub fn priority_of(&self, entity_type: &str) -> i32 {
        self.priorities
            .get(entity_type)
            .copied()
            .unwrap_or(self.default_priority)
    }
}
