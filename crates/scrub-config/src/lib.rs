//! Pipeline configuration loading and validation.
//!
//! Configuration comes from a YAML file and is validated at load time:
//! an empty secret key or an out-of-range confidence threshold is fatal
//! at startup, never per document.

pub mod model;
pub mod validate;

pub use model::{PipelineConfiguration, ProcessingOptions};
pub use validate::{ValidationError, ValidationResult};
