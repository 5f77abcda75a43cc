//! Core type definitions for hyperdoc.
//!
//! This crate defines the leaf types shared by the schema layer and the
//! render engine:
//! - [`Context`]: caller-supplied values visible to every schema evaluation
//! - [`ResourceKey`]: the `(type, id)` pair entities are deduplicated by
//! - [`PropertyReader`] / [`Association`]: the capability the host object
//!   model implements so the engine can read it
//! - the error taxonomy shared by every stage of a render call
//!
//! Nothing here knows about a concrete document convention; adapters live
//! in `hyperdoc-render`.

mod context;
mod key;
mod reader;

pub use context::Context;
pub use key::{identifier_string, ResourceKey};
pub use reader::{Association, PropertyReader};

/// Re-export of the dynamic value type used for properties, links and meta.
pub use serde_json::Value;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A schema declared something that cannot be rendered.
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    /// A caller asked for part of a document that was never populated.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A JSON schema definition or context could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Schema authoring errors. Raised while the offending declaration is
/// evaluated and fatal to the render call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    /// A link was declared as an ordered sequence.
    #[error("link `{name}` cannot be a sequence")]
    SequenceLink { name: String },

    /// A structured link carried a key outside the recognized set.
    #[error("link `{name}` has unrecognized key `{key}`")]
    UnrecognizedLinkKey { name: String, key: String },

    /// A link was declared as a number or boolean.
    #[error("link `{name}` must be a string or a mapping, found {found}")]
    InvalidLinkValue { name: String, found: &'static str },

    /// The `self` link was declared as anything but a bare href.
    #[error("link `self` must be a string href")]
    SelfLinkNotHref,

    /// A schema name that was never registered.
    #[error("unknown schema `{name}`")]
    UnknownSchema { name: String },

    /// A subject exposed no usable `id` property.
    #[error("subject of type `{type_name}` has no identifier")]
    MissingIdentifier { type_name: String },

    /// Association traversal went deeper than the configured limit.
    #[error("association nesting exceeded depth limit of {limit}")]
    DepthExceeded { limit: usize },
}

/// Caller-side contract violations on a rendered document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// A top-level document section (`meta`, `links`, ...) is absent.
    #[error("document has no `{section}` section")]
    MissingSection { section: String },

    /// A key is absent from a mapping.
    #[error("no value for key `{key}`")]
    MissingKey { key: String },
}
