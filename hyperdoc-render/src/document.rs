//! Rendered documents.

use hyperdoc_types::{LookupError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// A rendered document: a JSON object whose top-level keys are the
/// sections of the target convention (`data`, `included`, `_links`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a section.
    pub fn insert(&mut self, section: impl Into<String>, value: Value) {
        self.0.insert(section.into(), value);
    }

    /// Returns a section, or [`LookupError::MissingSection`] when it was
    /// never populated.
    pub fn fetch(&self, section: &str) -> std::result::Result<&Value, LookupError> {
        self.0.get(section).ok_or_else(|| LookupError::MissingSection {
            section: section.to_string(),
        })
    }

    /// Returns a section if present.
    pub fn get(&self, section: &str) -> Option<&Value> {
        self.0.get(section)
    }

    /// Returns `true` if the section is present.
    pub fn contains(&self, section: &str) -> bool {
        self.0.contains_key(section)
    }

    /// Section names in order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The document as a JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the document into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Encodes the document as compact JSON text.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Encodes the document as indented JSON text.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        document.into_value()
    }
}
