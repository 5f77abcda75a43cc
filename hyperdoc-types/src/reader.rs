//! The read-only view the engine has of host objects.
//!
//! The engine never assumes a representation for the objects it renders.
//! Hosts implement [`PropertyReader`] once per object type: named property
//! reads return plain values, associations return already-resolved objects.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Read access to a host object.
///
/// Implementations must not mutate the object graph; a render call only
/// ever reads.
pub trait PropertyReader: Send + Sync {
    /// Reads a named property. `None` means the object has no such property.
    fn read(&self, name: &str) -> Option<Value>;

    /// Resolves a named association.
    ///
    /// `None`, an empty `Many`, or no association at all are treated alike:
    /// the association is absent. Objects without associations can rely on
    /// the default.
    fn association(&self, name: &str) -> Option<Association> {
        let _ = name;
        None
    }
}

/// An already-resolved associated object or collection.
#[derive(Clone)]
pub enum Association {
    /// A to-one association.
    One(Arc<dyn PropertyReader>),
    /// A to-many association, in host order.
    Many(Vec<Arc<dyn PropertyReader>>),
}

impl Association {
    /// Wraps a single object.
    pub fn one(object: impl PropertyReader + 'static) -> Self {
        Self::One(Arc::new(object))
    }

    /// Wraps a sequence of objects.
    pub fn many<I, R>(objects: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: PropertyReader + 'static,
    {
        Self::Many(
            objects
                .into_iter()
                .map(|o| Arc::new(o) as Arc<dyn PropertyReader>)
                .collect(),
        )
    }

    /// Number of objects held.
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(objects) => objects.len(),
        }
    }

    /// Returns `true` for an empty to-many association.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for a to-many association.
    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// The held objects in order.
    pub fn members(&self) -> &[Arc<dyn PropertyReader>] {
        match self {
            Self::One(object) => std::slice::from_ref(object),
            Self::Many(objects) => objects,
        }
    }
}

impl fmt::Debug for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(_) => f.write_str("Association::One"),
            Self::Many(objects) => write!(f, "Association::Many({})", objects.len()),
        }
    }
}

/// JSON documents are readable subjects: object members are properties,
/// nested objects are to-one associations and arrays of objects are
/// to-many associations.
impl PropertyReader for Value {
    fn read(&self, name: &str) -> Option<Value> {
        self.as_object()?.get(name).cloned()
    }

    fn association(&self, name: &str) -> Option<Association> {
        match self.as_object()?.get(name)? {
            nested @ Value::Object(_) => Some(Association::One(Arc::new(nested.clone()))),
            Value::Array(items) => Some(Association::Many(
                items
                    .iter()
                    .filter(|item| item.is_object())
                    .map(|item| Arc::new(item.clone()) as Arc<dyn PropertyReader>)
                    .collect(),
            )),
            _ => None,
        }
    }
}
