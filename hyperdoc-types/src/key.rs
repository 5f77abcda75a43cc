//! Entity identity.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The `(type, id)` pair an entity is deduplicated by.
///
/// Compared by value: two host objects that report the same type and
/// identifier are the same resource, whatever their address in memory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey {
    #[serde(rename = "type")]
    type_name: String,
    id: String,
}

impl ResourceKey {
    /// Creates a key from a type name and an identifier.
    #[must_use]
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
        }
    }

    /// The resource type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The resource identifier.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name, self.id)
    }
}

/// Renders an identifier value as the string used for identity and
/// relationship links.
///
/// Strings are taken verbatim, numbers and booleans use their JSON text.
/// Null, sequences and mappings are not identifiers.
pub fn identifier_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
