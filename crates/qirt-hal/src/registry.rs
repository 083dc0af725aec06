//! Backend registry for selecting a simulator by name.
//!
//! The [`BackendRegistry`] is consulted once, when a program run is set
//! up; the backend it creates stays current for the whole scope.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::backend::{Backend, BackendConfig, BackendFactory};
use crate::error::{HalError, HalResult};

/// Factory function type for registered backends.
type Factory = Box<dyn Fn(BackendConfig) -> HalResult<Box<dyn Backend>> + Send + Sync>;

/// Central registry of simulator backends.
pub struct BackendRegistry {
    /// Backend factories keyed by name.
    factories: FxHashMap<String, Factory>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// Register a backend type under `name`.
    pub fn register<B>(&mut self, name: impl Into<String>)
    where
        B: BackendFactory + 'static,
    {
        let name = name.into();
        debug!("Registering backend: {}", name);
        self.factories.insert(
            name,
            Box::new(|config: BackendConfig| -> HalResult<Box<dyn Backend>> {
                let backend = B::from_config(config)?;
                Ok(Box::new(backend))
            }),
        );
    }

    /// Register a backend factory with a custom constructor.
    pub fn register_factory(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(BackendConfig) -> HalResult<Box<dyn Backend>> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!("Registering factory backend: {}", name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Create a backend from `config`, looked up by `config.name`.
    pub fn create(&self, config: BackendConfig) -> HalResult<Box<dyn Backend>> {
        match self.factories.get(&config.name) {
            Some(factory) => {
                debug!("Creating backend: {}", config.name);
                factory(config)
            }
            None => Err(HalError::BackendUnavailable(format!(
                "No backend registered with name '{}'",
                config.name
            ))),
        }
    }

    /// List all available backend names, sorted.
    pub fn available_backends(&self) -> Vec<String> {
        let mut names: Vec<_> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a backend is available by name.
    pub fn has_backend(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StubBackend;

    #[test]
    fn test_empty_registry() {
        let registry = BackendRegistry::new();
        assert!(registry.available_backends().is_empty());
        assert!(!registry.has_backend("fullstate"));
    }

    #[test]
    fn test_register_factory() {
        let mut registry = BackendRegistry::new();
        registry.register_factory("test", |_config| {
            Err(HalError::BackendUnavailable("test only".into()))
        });

        assert!(registry.has_backend("test"));
        assert_eq!(registry.available_backends(), vec!["test"]);
        assert!(registry.create(BackendConfig::new("test")).is_err());
    }

    #[test]
    fn test_register_type() {
        let mut registry = BackendRegistry::new();
        registry.register::<StubBackend>("stub");

        let backend = registry.create(BackendConfig::new("stub")).unwrap();
        assert_eq!(backend.name(), "stub");
    }

    #[test]
    fn test_create_unknown_backend() {
        let registry = BackendRegistry::new();
        let result = registry.create(BackendConfig::new("nonexistent"));
        assert!(matches!(result, Err(HalError::BackendUnavailable(_))));
    }

    #[test]
    fn test_available_backends_sorted() {
        let mut registry = BackendRegistry::new();
        registry.register_factory("zebra", |_| Err(HalError::BackendUnavailable("test".into())));
        registry.register_factory("alpha", |_| Err(HalError::BackendUnavailable("test".into())));

        assert_eq!(registry.available_backends(), vec!["alpha", "zebra"]);
    }
}
