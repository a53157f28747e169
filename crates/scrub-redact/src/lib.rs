//! Redaction engine for scrub.
//!
//! This crate turns a noisy, possibly-overlapping set of entity
//! candidates into a single, deterministic, non-overlapping redaction
//! of a text buffer:
//!
//! - **Conflict resolution**: overlapping candidates are clustered and a
//!   non-overlapping winner set is selected by configured priority,
//!   confidence, span length, and start offset.
//! - **Normalization**: winning spans are canonicalized (whitespace,
//!   case, ASCII transliteration) before hashing, so equivalent values
//!   collide to the same token.
//! - **Keyed hashing**: HMAC-SHA256 with the deployment secret produces
//!   stable, irreversible tokens of the form `<ENTITY_TYPE:digest>`.
//!
//! # Example
//!
//! ```
//! use scrub_common::EntityCandidate;
//! use scrub_redact::{EntityPriorityTable, RedactionEngine};
//!
//! let engine = RedactionEngine::new("secret", EntityPriorityTable::default()).unwrap();
//! let text = "SSN: 123-45-6789";
//! let candidates = vec![EntityCandidate::new("US_SSN", 5, 16, 0.9)];
//! let redacted = engine.redact_text(text, candidates).unwrap();
//! assert!(redacted.text.starts_with("SSN: <US_SSN:"));
//! ```

pub mod codec;
pub mod engine;
pub mod hash;
pub mod normalize;
pub mod priority;
pub mod resolve;

pub use codec::{format_token, upper_snake, DIGEST_DISPLAY_BYTES};
pub use engine::{RedactedText, RedactionEngine};
pub use hash::KeyMaterial;
pub use normalize::normalize;
pub use priority::EntityPriorityTable;
pub use resolve::resolve_conflicts;
