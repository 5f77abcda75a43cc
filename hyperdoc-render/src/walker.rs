//! Entity graph traversal.
//!
//! The walker evaluates the root schema once per root object and then follows
//! nested declarations depth-first. Every entity it meets is recorded in one
//! dedup table keyed by `(type, id)`, shared by the whole call:
//!
//! - a key is reserved in the table as soon as its subject is evaluated, so
//!   table order is first-discovery order;
//! - a member whose key is already in the table, or is one of the roots, is
//!   referenced but never evaluated again. This is what makes cyclic graphs
//!   terminate.

use hyperdoc_model::{evaluate, identify, Entity, Link, Schema, SchemaRegistry};
use hyperdoc_types::{Association, Context, DeclarationError, PropertyReader, ResourceKey};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Format-independent result of a walk.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTree {
    collection: bool,
    type_name: Option<String>,
    roots: Vec<ResourceKey>,
    root_set: HashSet<ResourceKey>,
    entities: IndexMap<ResourceKey, Entity>,
    links: IndexMap<String, Link>,
    meta: IndexMap<String, Value>,
}

impl CanonicalTree {
    /// Returns `true` when the subject was a collection.
    pub fn is_collection(&self) -> bool {
        self.collection
    }

    /// The root schema's type name.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Root identities in input order.
    pub fn root_keys(&self) -> &[ResourceKey] {
        &self.roots
    }

    /// Root entities in input order.
    pub fn roots(&self) -> impl Iterator<Item = &Entity> {
        self.roots.iter().filter_map(|key| self.entities.get(key))
    }

    /// The first root entity.
    pub fn root(&self) -> Option<&Entity> {
        self.roots().next()
    }

    /// Returns `true` if `key` is a root of this call.
    pub fn is_root(&self, key: &ResourceKey) -> bool {
        self.root_set.contains(key)
    }

    /// Entities reached by traversal, excluding roots, in first-discovery
    /// order.
    pub fn included(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|(key, _)| !self.root_set.contains(*key))
            .map(|(_, entity)| entity)
    }

    /// Looks up any entity of the tree, root or included.
    pub fn entity(&self, key: &ResourceKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    /// Number of distinct entities, roots included.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` for an empty root collection.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Document-level links: the link templates declared by the root schema.
    pub fn links(&self) -> &IndexMap<String, Link> {
        &self.links
    }

    /// Document-level meta declared by the root schema.
    pub fn meta(&self) -> &IndexMap<String, Value> {
        &self.meta
    }
}

struct Walker<'r> {
    registry: &'r SchemaRegistry,
    max_depth: usize,
    roots: HashSet<ResourceKey>,
    table: IndexMap<ResourceKey, Option<Entity>>,
}

impl Walker<'_> {
    fn resolve(
        &mut self,
        schema: &Schema,
        subject: &dyn PropertyReader,
        context: &Context,
        depth: usize,
    ) -> Result<(), DeclarationError> {
        let registry = self.registry;
        let evaluation = evaluate(registry, schema, subject, context)?;
        let key = evaluation.key.clone();
        trace!(resource = %key, depth, "visiting entity");
        self.table.insert(key.clone(), None);

        let (entity, nested) = evaluation.into_parts();

        for declaration in &nested {
            let nested_schema = registry.get(&declaration.schema)?;
            for (member_key, member) in &declaration.members {
                if self.roots.contains(member_key) || self.table.contains_key(member_key) {
                    trace!(resource = %member_key, "already visited");
                    continue;
                }
                if depth >= self.max_depth {
                    return Err(DeclarationError::DepthExceeded {
                        limit: self.max_depth,
                    });
                }
                self.resolve(nested_schema, &**member, &declaration.context, depth + 1)?;
            }
        }

        self.table.insert(key, Some(entity));
        Ok(())
    }
}

/// Walks the object graph under `subject` with the schema registered as
/// `schema_name`.
///
/// A `One` subject produces a single root; a `Many` subject produces one
/// root per member in input order. Link templates and meta declared by the
/// root schema are lifted off the roots into the tree's document-level
/// links and meta; when several roots declare the same name, the first
/// wins.
pub fn walk(
    registry: &SchemaRegistry,
    schema_name: &str,
    subject: &Association,
    context: &Context,
    max_depth: usize,
) -> Result<CanonicalTree, DeclarationError> {
    let schema = registry.get(schema_name)?;
    let members = subject.members();
    let roots = members
        .iter()
        .map(|member| identify(schema, &**member))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(schema = schema_name, roots = roots.len(), "Walking object graph");

    let mut walker = Walker {
        registry,
        max_depth,
        roots: roots.iter().cloned().collect(),
        table: IndexMap::new(),
    };

    for (key, member) in roots.iter().zip(members) {
        if walker.table.contains_key(key) {
            trace!(resource = %key, "duplicate root");
            continue;
        }
        walker.resolve(schema, &**member, context, 0)?;
    }

    let mut links = IndexMap::new();
    let mut meta = IndexMap::new();
    for key in &roots {
        let Some(Some(entity)) = walker.table.get_mut(key) else {
            continue;
        };
        for (name, link) in entity.take_link_templates() {
            links.entry(name).or_insert(link);
        }
        for (name, value) in entity.take_meta() {
            meta.entry(name).or_insert(value);
        }
    }

    let entities: IndexMap<ResourceKey, Entity> = walker
        .table
        .into_iter()
        .filter_map(|(key, entity)| entity.map(|entity| (key, entity)))
        .collect();
    debug!(
        schema = schema_name,
        entities = entities.len(),
        included = entities.len() - walker.roots.len().min(entities.len()),
        "Walk complete"
    );

    Ok(CanonicalTree {
        collection: subject.is_many(),
        type_name: schema.type_name().map(str::to_string),
        roots,
        root_set: walker.roots,
        entities,
        links,
        meta,
    })
}
