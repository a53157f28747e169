//! Name-to-factory registries for pipeline components.
//!
//! Components are registered under stable string names so a YAML
//! configuration can refer to them without compile-time coupling. Each
//! role (source, sink, transform, detector) gets its own `Registry`.

use std::collections::BTreeMap;
use std::path::Path;

use scrub_common::{Result, ScrubError};
use scrub_config::PipelineConfiguration;

/// Everything a factory may need to build a component instance.
///
/// `path` carries the `--src` / `--out` argument for sources and sinks;
/// transforms and detectors usually only look at `config`.
pub struct CreateArgs<'a> {
    pub path: Option<&'a Path>,
    pub config: &'a PipelineConfiguration,
}

type Factory<T> = Box<dyn Fn(&CreateArgs<'_>) -> Result<T> + Send + Sync>;

/// A registry of named component factories for one role.
pub struct Registry<T> {
    role: &'static str,
    factories: BTreeMap<String, Factory<T>>,
}

impl<T> Registry<T> {
    pub fn new(role: &'static str) -> Self {
        Self {
            role,
            factories: BTreeMap::new(),
        }
    }

    /// Register a factory under `name`.
    ///
    /// Registering a name twice is an error unless `replace` is set;
    /// silent shadowing of a built-in has bitten people before.
    pub fn register<F>(&mut self, name: &str, replace: bool, factory: F) -> Result<()>
    where
        F: Fn(&CreateArgs<'_>) -> Result<T> + Send + Sync + 'static,
    {
        if !replace && self.factories.contains_key(name) {
            return Err(ScrubError::DuplicateRegistration {
                role: self.role.to_string(),
                name: name.to_string(),
            });
        }
        self.factories.insert(name.to_string(), Box::new(factory));
        Ok(())
    }

    /// Remove a registration. Unknown names are reported, not ignored.
    pub fn unregister(&mut self, name: &str) -> Result<()> {
        if self.factories.remove(name).is_none() {
            return Err(self.unknown(name));
        }
        Ok(())
    }

    /// Drop every registration. Test support for building a registry
    /// from scratch.
    pub fn clear(&mut self) {
        self.factories.clear();
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order, for error messages and `--help`.
    pub fn available(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Instantiate the component registered under `name`.
    ///
    /// Factory failures are wrapped as initialization errors so the
    /// caller can tell "no such component" from "component refused to
    /// start".
    pub fn create(&self, name: &str, args: &CreateArgs<'_>) -> Result<T> {
        let factory = self.factories.get(name).ok_or_else(|| self.unknown(name))?;
        factory(args).map_err(|err| match err {
            ScrubError::Initialization { .. } => err,
            other => ScrubError::Initialization {
                role: self.role.to_string(),
                name: name.to_string(),
                message: other.to_string(),
            },
        })
    }

    fn unknown(&self, name: &str) -> ScrubError {
        ScrubError::UnknownComponent {
            role: self.role.to_string(),
            name: name.to_string(),
            available: self.available().join(", "),
        }
    }
}
