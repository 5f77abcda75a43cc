//! Render context.
//!
//! A context is an immutable bag of caller-supplied values (controller
//! names, base URLs, the current user, ...). Nested schema evaluations never
//! see a mutated parent; they see the result of [`Context::extend`].

use crate::LookupError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied key/value pairs visible to every schema evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(IndexMap<String, Value>);

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value stored under `key`, or [`LookupError::MissingKey`]
    /// when the caller never supplied it.
    pub fn fetch(&self, key: &str) -> Result<&Value, LookupError> {
        self.0.get(key).ok_or_else(|| LookupError::MissingKey {
            key: key.to_string(),
        })
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the context holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a new context holding the union of `self` and `overrides`.
    ///
    /// Keys present in both take the value from `overrides`. `self` is left
    /// untouched.
    #[must_use]
    pub fn extend(&self, overrides: &Context) -> Context {
        if overrides.is_empty() {
            return self.clone();
        }
        let mut merged = self.0.clone();
        for (key, value) in &overrides.0 {
            merged.insert(key.clone(), value.clone());
        }
        Context(merged)
    }

    /// Returns a new context with a single entry added or replaced.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Context {
        let mut merged = self.0.clone();
        merged.insert(key.into(), value.into());
        Context(merged)
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
