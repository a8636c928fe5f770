//! Registry of module factories
//!
//! The loader looks each configured module name up here and builds a
//! fresh instance per declaration.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Clock, HelloWorld, ModuleError};
use crate::ui::core::Module;

/// Builds a new module instance.
pub type ModuleFactory = Arc<dyn Fn() -> Box<dyn Module> + Send + Sync>;

/// Registry mapping module names to factories
#[derive(Clone, Default)]
pub struct ModuleFactoryRegistry {
    factories: HashMap<String, ModuleFactory>,
}

impl ModuleFactoryRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the bundled `clock` and `helloworld` modules
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        // Fresh registry, the names cannot collide.
        let _ = registry.register("clock", || Box::new(Clock::default()));
        let _ = registry.register("helloworld", || Box::new(HelloWorld::default()));
        registry
    }

    /// Add a factory
    ///
    /// # Returns
    /// Returns an error if a factory with the same name already exists
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), ModuleError>
    where
        F: Fn() -> Box<dyn Module> + Send + Sync + 'static,
    {
        if self.factories.contains_key(name) {
            return Err(ModuleError::AlreadyRegistered(name.to_string()));
        }
        self.factories.insert(name.to_string(), Arc::new(factory));
        Ok(())
    }

    /// Build a new instance of the named module
    pub fn create(&self, name: &str) -> Result<Box<dyn Module>, ModuleError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ModuleError::UnknownModule(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
