//! Name-indexed handler registry.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::builtins;
use crate::handler::DynHandler;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Unknown handler: {name}")]
    UnknownHandler { name: String },
    #[error("Duplicate handler: {name}")]
    DuplicateHandler { name: String },
}

/// JSON element handlers addressable by name.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<DynHandler>>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with every built-in handler.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        builtins::register_builtins(&mut registry)?;
        Ok(registry)
    }

    pub fn register(&mut self, handler: Box<DynHandler>) -> Result<(), RegistryError> {
        let name = handler.name().to_string();
        if self.handlers.contains_key(&name) {
            return Err(RegistryError::DuplicateHandler { name });
        }
        tracing::trace!(handler = %name, "Registered handler");
        self.handlers.insert(name, handler);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&DynHandler, RegistryError> {
        self.handlers
            .get(name)
            .map(|handler| &**handler)
            .ok_or_else(|| RegistryError::UnknownHandler {
                name: name.to_string(),
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
