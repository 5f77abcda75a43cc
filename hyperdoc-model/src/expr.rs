//! Value expressions.
//!
//! Every declared property, link and meta value is an [`Expr`] evaluated
//! against the subject and the context of the current evaluation. All forms
//! except [`Expr::Computed`] are plain data and can be loaded from JSON.

use hyperdoc_types::{Context, PropertyReader};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Signature of a computed value.
pub type ComputeFn = dyn Fn(&dyn PropertyReader, &Context) -> Value + Send + Sync;

/// How a declared value is derived.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// A fixed value.
    Literal(Value),
    /// A named property of the subject; null when the subject lacks it.
    Attribute(String),
    /// A context entry; null when absent.
    Context(String),
    /// A string with `{name}` placeholders filled from the subject's
    /// properties, then from the context. Placeholders neither can fill
    /// are kept verbatim.
    Format(String),
    /// A mapping whose members are themselves expressions.
    Object(IndexMap<String, Expr>),
    /// Arbitrary code. Builder-only.
    #[serde(skip)]
    Computed(Arc<ComputeFn>),
}

impl Expr {
    /// A fixed value.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Reads `name` from the subject.
    pub fn attr(name: impl Into<String>) -> Self {
        Self::Attribute(name.into())
    }

    /// Reads `key` from the context.
    pub fn context(key: impl Into<String>) -> Self {
        Self::Context(key.into())
    }

    /// Interpolates `{name}` placeholders from the subject, falling back to
    /// the context.
    pub fn format(template: impl Into<String>) -> Self {
        Self::Format(template.into())
    }

    /// Builds a mapping from `(key, expr)` pairs, keeping their order.
    pub fn object<I, K, E>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Expr>,
    {
        Self::Object(
            members
                .into_iter()
                .map(|(k, e)| (k.into(), e.into()))
                .collect(),
        )
    }

    /// Wraps a closure.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&dyn PropertyReader, &Context) -> Value + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    /// Evaluates the expression.
    pub fn eval(&self, subject: &dyn PropertyReader, context: &Context) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Attribute(name) => subject.read(name).unwrap_or(Value::Null),
            Self::Context(key) => context.get(key).cloned().unwrap_or(Value::Null),
            Self::Format(template) => Value::String(interpolate(template, subject, context)),
            Self::Object(members) => {
                let mut map = Map::with_capacity(members.len());
                for (key, expr) in members {
                    map.insert(key.clone(), expr.eval(subject, context));
                }
                Value::Object(map)
            }
            Self::Computed(f) => f(subject, context),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Self::Attribute(n) => f.debug_tuple("Attribute").field(n).finish(),
            Self::Context(k) => f.debug_tuple("Context").field(k).finish(),
            Self::Format(t) => f.debug_tuple("Format").field(t).finish(),
            Self::Object(m) => f.debug_tuple("Object").field(m).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Literal(Value::String(value.to_string()))
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Literal(Value::String(value))
    }
}

fn interpolate(template: &str, subject: &dyn PropertyReader, context: &Context) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        let value = subject
            .read(name)
            .filter(|value| !value.is_null())
            .or_else(|| context.get(name).filter(|value| !value.is_null()).cloned());
        match value {
            Some(Value::String(s)) => out.push_str(&s),
            Some(other) => out.push_str(&other.to_string()),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}
