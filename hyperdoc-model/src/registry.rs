//! Named schemas.

use crate::{evaluate, Evaluation, Schema, SchemaDefinition};
use hyperdoc_types::{Context, DeclarationError, PropertyReader, Result};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::debug;

/// Schemas by name.
///
/// Nested declarations refer to schemas by name, so self-referencing and
/// mutually-referencing schemas (a user whose friends are users) need no
/// special handling. The registry is read-only during a render and can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `schema` under `name`, replacing any previous schema of
    /// that name.
    pub fn register(&mut self, name: impl Into<String>, schema: Schema) -> &mut Self {
        let name = name.into();
        debug!(schema = %name, type_name = ?schema.type_name(), "Schema registered");
        self.schemas.insert(name, Arc::new(schema));
        self
    }

    /// Looks up a schema.
    pub fn get(&self, name: &str) -> std::result::Result<&Arc<Schema>, DeclarationError> {
        self.schemas
            .get(name)
            .ok_or_else(|| DeclarationError::UnknownSchema {
                name: name.to_string(),
            })
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registers a schema written as JSON, resolving `extends` against the
    /// schemas already registered.
    pub fn register_definition(
        &mut self,
        name: impl Into<String>,
        definition: SchemaDefinition,
    ) -> std::result::Result<&mut Self, DeclarationError> {
        let parent = match &definition.extends {
            Some(parent) => Some(Arc::clone(self.get(parent)?)),
            None => None,
        };
        let schema = definition.into_builder(parent.as_deref()).build();
        Ok(self.register(name, schema))
    }

    /// Loads a JSON object mapping schema names to definitions.
    ///
    /// Definitions are registered in document order, so a schema may extend
    /// any schema registered before it, including earlier entries of the
    /// same document.
    pub fn load_json(&mut self, json: &str) -> Result<&mut Self> {
        let definitions: IndexMap<String, SchemaDefinition> = serde_json::from_str(json)?;
        for (name, definition) in definitions {
            self.register_definition(name, definition)?;
        }
        Ok(self)
    }

    /// Builds a registry from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut registry = Self::new();
        registry.load_json(json)?;
        Ok(registry)
    }

    /// Runs the schema registered as `name` against `subject`.
    pub fn evaluate(
        &self,
        name: &str,
        subject: &dyn PropertyReader,
        context: &Context,
    ) -> std::result::Result<Evaluation, DeclarationError> {
        evaluate(self, self.get(name)?, subject, context)
    }
}
