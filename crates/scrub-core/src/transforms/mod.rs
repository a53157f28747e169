//! Document transforms.
//!
//! Pre-transforms run before detection, post-transforms after redaction.
//! A transform takes ownership of the document and returns a new one;
//! on error the document is discarded, so a failed transform can never
//! leak half-modified state downstream.

mod dict_merger;
mod field_selector;
mod redaction_cleaner;
mod text_cleaner;
mod whitespace;

pub use dict_merger::DictMerger;
pub use field_selector::FieldSelector;
pub use redaction_cleaner::RedactionCleaner;
pub use text_cleaner::TextCleaner;
pub use whitespace::WhitespaceNormalizer;

use crate::registry::Registry;
use scrub_common::{Document, Result};

/// A pure document-to-document step.
///
/// Transforms that only operate on free text pass content-less
/// documents through unchanged, so one transform list can serve text
/// and structured sources alike.
pub trait Transform {
    fn apply(&self, document: Document) -> Result<Document>;
}

pub type BoxedTransform = Box<dyn Transform>;

/// Registry preloaded with the built-in transforms.
pub fn builtin_transforms() -> Result<Registry<BoxedTransform>> {
    let mut registry: Registry<BoxedTransform> = Registry::new("transform");

    registry.register("whitespace_normalizer", false, |_args| {
        Ok(Box::new(WhitespaceNormalizer::default()) as BoxedTransform)
    })?;

    registry.register("text_cleaner", false, |_args| {
        Ok(Box::new(TextCleaner::default()) as BoxedTransform)
    })?;

    registry.register("field_selector", false, |args| {
        Ok(Box::new(FieldSelector::new(args.config.selected_fields.clone())) as BoxedTransform)
    })?;

    registry.register("redaction_cleaner", false, |_args| {
        Ok(Box::new(RedactionCleaner::new()) as BoxedTransform)
    })?;

    registry.register("dict_merger", false, |_args| {
        Ok(Box::new(DictMerger::new()) as BoxedTransform)
    })?;

    Ok(registry)
}
