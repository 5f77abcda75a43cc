//! Entity graph walker and document adapters for hyperdoc.
//!
//! Rendering happens in two stages:
//!
//! 1. [`walk`] evaluates the root schema against the subject and follows
//!    every present `entity`/`collection` association, producing a
//!    [`CanonicalTree`]: the root resource(s), every entity reached by
//!    traversal deduplicated by `(type, id)`, and the document-level links
//!    and meta declared by the root schema.
//! 2. An [`Adapter`] turns the tree into a [`Document`] for one convention:
//!    [`JsonApi`] (`data` / `included`), [`Hal`] (`_links` / `_embedded`) or
//!    [`Siren`] (`entities` / `links`).
//!
//! [`Serializer`] ties both stages together. Every call is independent: the
//! dedup table lives for exactly one walk and nothing is cached between
//! calls.

pub mod adapter;
mod config;
mod document;
mod serializer;
mod walker;

pub use adapter::{Adapter, AdapterKind, Hal, JsonApi, Siren};
pub use config::{RenderConfig, DEFAULT_MAX_DEPTH};
pub use document::Document;
pub use serializer::Serializer;
pub use walker::{walk, CanonicalTree};

pub use hyperdoc_model::{Entity, Expr, Link, Schema, SchemaBuilder, SchemaRegistry};
pub use hyperdoc_types::{
    Association, Context, DeclarationError, Error, LookupError, PropertyReader, ResourceKey,
    Result,
};
