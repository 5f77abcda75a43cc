//! Schema model for hyperdoc.
//!
//! Defines how a host object type is projected into a resource:
//! - [`Schema`] / [`SchemaBuilder`]: ordered declarations (properties, links,
//!   meta, nested entities and collections) plus an optional type name
//! - [`SchemaRegistry`]: named schemas, built once and shared across renders;
//!   also loads schemas written as JSON
//! - [`Expr`]: how a declared value is derived from the subject and context
//! - [`Link`] and [`resolve_link`]: the canonical link forms and the rules a
//!   declared link value must satisfy
//! - [`Entity`]: one resolved resource
//! - [`evaluate`]: the interpreter that runs a schema against a subject
//!
//! Schemas hold no entity state; evaluation is a pure function of
//! (schema, subject, context).

mod entity;
mod evaluate;
mod expr;
mod link;
mod registry;
mod schema;

pub use entity::{Cardinality, Entity, Relation};
pub use evaluate::{evaluate, identify, Evaluation, NestedEvaluation};
pub use expr::{ComputeFn, Expr};
pub use link::{resolve_link, Link, LinkId, LinkObject, RECOGNIZED_LINK_KEYS};
pub use registry::SchemaRegistry;
pub use schema::{Declaration, NestedDeclaration, Schema, SchemaBuilder, SchemaDefinition};
