//! Link declarations and their canonical forms.

use hyperdoc_types::DeclarationError;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Keys a structured link may carry.
pub const RECOGNIZED_LINK_KEYS: [&str; 6] = ["self", "related", "id", "type", "templated", "href"];

/// A resolved link.
#[derive(Debug, Clone, PartialEq)]
pub enum Link {
    /// Declared as null.
    Empty,
    /// A bare href.
    Href(String),
    /// A mapping restricted to [`RECOGNIZED_LINK_KEYS`].
    Object(LinkObject),
    /// A reference to other entities, generated from `entity`/`collection`
    /// declarations.
    Relationship { type_name: String, id: LinkId },
}

impl Link {
    /// Builds a to-one relationship link.
    pub fn to_one(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Relationship {
            type_name: type_name.into(),
            id: LinkId::One(id.into()),
        }
    }

    /// Builds a to-many relationship link; ids keep the given order.
    pub fn to_many<I, S>(type_name: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Relationship {
            type_name: type_name.into(),
            id: LinkId::Many(ids.into_iter().map(Into::into).collect()),
        }
    }

    /// Returns `true` for a structured link declared with `templated: true`.
    pub fn is_templated(&self) -> bool {
        matches!(self, Self::Object(object) if object.is_templated())
    }

    /// The URL this link points at, if it has one: the href itself, or a
    /// structured link's `href`, `self` or `related` member, in that order.
    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Href(href) => Some(href.as_str()),
            Self::Object(object) => object
                .get_str("href")
                .or_else(|| object.get_str("self"))
                .or_else(|| object.get_str("related")),
            Self::Empty | Self::Relationship { .. } => None,
        }
    }

    /// The link as a plain JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Href(href) => Value::String(href.clone()),
            Self::Object(object) => object.to_value(),
            Self::Relationship { type_name, id } => {
                let mut map = Map::new();
                map.insert("type".to_string(), Value::String(type_name.clone()));
                map.insert("id".to_string(), id.to_value());
                Value::Object(map)
            }
        }
    }
}

/// Identifier(s) of a relationship link. The shape records cardinality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LinkId {
    One(String),
    Many(Vec<String>),
}

impl LinkId {
    /// The identifier(s) as a JSON value: a string or an array of strings.
    pub fn to_value(&self) -> Value {
        match self {
            Self::One(id) => Value::String(id.clone()),
            Self::Many(ids) => Value::Array(ids.iter().cloned().map(Value::String).collect()),
        }
    }
}

/// A structured link. Members are kept verbatim and in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkObject(IndexMap<String, Value>);

impl LinkObject {
    /// Returns the member stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns `true` when `templated` is `true`.
    pub fn is_templated(&self) -> bool {
        matches!(self.0.get("templated"), Some(Value::Bool(true)))
    }

    /// Iterates members in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the mapping has no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The members as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

/// Validates a declared link value and converts it to its canonical form.
///
/// - null → [`Link::Empty`]
/// - string → [`Link::Href`]
/// - mapping with only recognized keys → [`Link::Object`]
/// - sequence → [`DeclarationError::SequenceLink`]
/// - mapping with any other key → [`DeclarationError::UnrecognizedLinkKey`]
///
/// The `self` link must be a bare href.
pub fn resolve_link(name: &str, value: Value) -> Result<Link, DeclarationError> {
    match value {
        Value::Null => Ok(Link::Empty),
        Value::String(href) => Ok(Link::Href(href)),
        Value::Array(_) => Err(DeclarationError::SequenceLink {
            name: name.to_string(),
        }),
        Value::Object(_) if name == "self" => Err(DeclarationError::SelfLinkNotHref),
        Value::Object(members) => {
            if let Some(key) = members
                .keys()
                .find(|key| !RECOGNIZED_LINK_KEYS.contains(&key.as_str()))
            {
                return Err(DeclarationError::UnrecognizedLinkKey {
                    name: name.to_string(),
                    key: key.clone(),
                });
            }
            Ok(Link::Object(LinkObject(members.into_iter().collect())))
        }
        Value::Number(_) => Err(DeclarationError::InvalidLinkValue {
            name: name.to_string(),
            found: "number",
        }),
        Value::Bool(_) => Err(DeclarationError::InvalidLinkValue {
            name: name.to_string(),
            found: "boolean",
        }),
    }
}
