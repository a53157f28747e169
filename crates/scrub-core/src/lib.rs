//! Streaming redaction pipeline.
//!
//! This crate wires the pieces of the system together:
//! - component registries mapping names from configuration to factories
//! - built-in document sources, sinks, transforms, and entity detectors
//! - the [`Pipeline`] orchestrator that streams documents one at a time
//!   through pre-transforms, detection, redaction, post-transforms, and
//!   the output sink
//!
//! stdout is reserved for pipeline output (summaries, `stdout` sink);
//! all diagnostics go to stderr via `tracing`.

pub mod detectors;
pub mod logging;
pub mod pipeline;
pub mod readers;
pub mod registry;
pub mod transforms;
pub mod writers;

pub use detectors::{BoxedDetector, EntityDetector};
pub use pipeline::{Pipeline, Registries, RunOptions};
pub use readers::{BoxedSource, DocumentSource};
pub use registry::{CreateArgs, Registry};
pub use transforms::{BoxedTransform, Transform};
pub use writers::{BoxedSink, DocumentSink};
