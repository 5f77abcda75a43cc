use crate::{Adapter, CanonicalTree, Document};
use hyperdoc_model::{Cardinality, Entity, Link};
use hyperdoc_types::ResourceKey;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// HAL-style documents.
///
/// Properties sit directly on the resource, links under `_links` and
/// associated resources under `_embedded`, keyed by association name.
///
/// Each resource carries its own `_embedded` exactly once per document: at
/// the root for root resources, otherwise at its first reference in
/// depth-first order. Every other reference renders the resource's
/// properties and `_links` only, which keeps output linear in the number
/// of references and makes cyclic graphs finite.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hal;

impl Hal {
    /// Properties and `_links`, without `_embedded`.
    fn summary(
        &self,
        entity: &Entity,
        extra_links: Option<&IndexMap<String, Link>>,
    ) -> Map<String, Value> {
        let mut map = Map::new();
        for (name, value) in entity.properties() {
            map.insert(name.clone(), value.clone());
        }

        let mut links = Map::new();
        let all_links = entity
            .links()
            .iter()
            .chain(extra_links.into_iter().flatten());
        for (name, link) in all_links {
            if let Some(value) = link_value(link) {
                links.entry(name.clone()).or_insert(value);
            }
        }
        if !links.is_empty() {
            map.insert("_links".to_string(), Value::Object(links));
        }
        map
    }

    /// The full resource. `expanded` must already hold `entity`'s key.
    fn resource(
        &self,
        tree: &CanonicalTree,
        entity: &Entity,
        expanded: &mut HashSet<ResourceKey>,
        extra_links: Option<&IndexMap<String, Link>>,
    ) -> Map<String, Value> {
        let mut map = self.summary(entity, extra_links);

        let mut embedded = Map::new();
        for relation in entity.relations() {
            let mut rendered = relation
                .targets
                .iter()
                .filter_map(|key| tree.entity(key))
                .map(|target| {
                    let body = if expanded.insert(target.key().clone()) {
                        self.resource(tree, target, expanded, None)
                    } else {
                        self.summary(target, None)
                    };
                    Value::Object(body)
                });
            let value = match relation.cardinality {
                Cardinality::One => rendered.next(),
                Cardinality::Many => Some(Value::Array(rendered.collect())),
            };
            if let Some(value) = value {
                embedded.insert(relation.name.clone(), value);
            }
        }
        if !embedded.is_empty() {
            map.insert("_embedded".to_string(), Value::Object(embedded));
        }
        map
    }
}

impl Adapter for Hal {
    fn name(&self) -> &'static str {
        "hal"
    }

    fn render(&self, tree: &CanonicalTree) -> Document {
        let mut expanded: HashSet<ResourceKey> = tree.root_keys().iter().cloned().collect();

        if tree.is_collection() {
            let mut document = Document::new();
            let items = tree
                .roots()
                .map(|root| Value::Object(self.resource(tree, root, &mut expanded, None)))
                .collect();
            let slot = match tree.type_name() {
                Some(type_name) if !type_name.is_empty() => type_name,
                _ => "items",
            };
            let mut embedded = Map::new();
            embedded.insert(slot.to_string(), Value::Array(items));
            document.insert("_embedded", Value::Object(embedded));

            let links: Map<String, Value> = tree
                .links()
                .iter()
                .filter_map(|(name, link)| Some((name.clone(), link_value(link)?)))
                .collect();
            if !links.is_empty() {
                document.insert("_links", Value::Object(links));
            }
            if !tree.meta().is_empty() {
                document.insert("meta", meta(tree.meta()));
            }
            return document;
        }

        let Some(root) = tree.root() else {
            return Document::new();
        };
        let mut map = self.resource(tree, root, &mut expanded, Some(tree.links()));
        if !tree.meta().is_empty() {
            map.insert("meta".to_string(), meta(tree.meta()));
        }
        Document::from(map)
    }
}

fn link_value(link: &Link) -> Option<Value> {
    let href = link.href()?;
    let mut map = Map::new();
    map.insert("href".to_string(), Value::String(href.to_string()));
    if link.is_templated() {
        map.insert("templated".to_string(), Value::Bool(true));
    }
    Some(Value::Object(map))
}

fn meta(entries: &IndexMap<String, Value>) -> Value {
    Value::Object(entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}
