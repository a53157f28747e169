//! Entity detectors.

mod pattern;

pub use pattern::PatternDetector;

use std::collections::BTreeSet;

use crate::registry::Registry;
use scrub_common::{EntityCandidate, Result};

/// Produces PII span candidates for a piece of text.
///
/// Offsets in returned candidates are char-based. A detector filters by
/// the enabled entity set and the confidence threshold itself, so the
/// pipeline never sees candidates it would immediately discard.
pub trait EntityDetector {
    fn detect(
        &self,
        text: &str,
        enabled: &BTreeSet<String>,
        min_confidence: f64,
    ) -> Result<Vec<EntityCandidate>>;
}

pub type BoxedDetector = Box<dyn EntityDetector>;

/// Registry preloaded with the built-in detectors.
pub fn builtin_detectors() -> Result<Registry<BoxedDetector>> {
    let mut registry: Registry<BoxedDetector> = Registry::new("detector");
    registry.register("pattern", false, |_args| {
        Ok(Box::new(PatternDetector::new()) as BoxedDetector)
    })?;
    Ok(registry)
}
