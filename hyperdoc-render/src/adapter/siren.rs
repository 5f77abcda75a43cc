use crate::{Adapter, CanonicalTree, Document};
use hyperdoc_model::{Entity, Link};
use hyperdoc_types::ResourceKey;
use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use std::collections::HashSet;

/// Siren-style documents.
///
/// ```json
/// {
///   "class": ["users"],
///   "properties": {"name": "..."},
///   "entities": [{"class": ["users"], "rel": ["manager"], ...}],
///   "links": [{"rel": ["self"], "href": "/users/1"}]
/// }
/// ```
///
/// Only links with an href are rendered. Sub-entities are expanded once per
/// document, the same way [`Hal`](super::Hal) expands `_embedded`; later
/// references carry no `entities` of their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct Siren;

impl Siren {
    fn summary(
        &self,
        entity: &Entity,
        rel: Option<&str>,
        extra_links: Option<&IndexMap<String, Link>>,
    ) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(type_name) = entity.type_name() {
            map.insert("class".to_string(), json!([type_name]));
        }
        if let Some(rel) = rel {
            map.insert("rel".to_string(), json!([rel]));
        }
        map.insert(
            "properties".to_string(),
            Value::Object(
                entity
                    .properties()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
        );

        let links = links(entity.links().iter().chain(extra_links.into_iter().flatten()));
        if !links.is_empty() {
            map.insert("links".to_string(), Value::Array(links));
        }
        map
    }

    /// The entity with its sub-entities. `expanded` must already hold
    /// `entity`'s key.
    fn entity(
        &self,
        tree: &CanonicalTree,
        entity: &Entity,
        rel: Option<&str>,
        expanded: &mut HashSet<ResourceKey>,
        extra_links: Option<&IndexMap<String, Link>>,
    ) -> Map<String, Value> {
        let mut map = self.summary(entity, rel, extra_links);

        let mut entities = Vec::new();
        for relation in entity.relations() {
            for target in relation.targets.iter().filter_map(|key| tree.entity(key)) {
                let rel = Some(relation.name.as_str());
                let body = if expanded.insert(target.key().clone()) {
                    self.entity(tree, target, rel, expanded, None)
                } else {
                    self.summary(target, rel, None)
                };
                entities.push(Value::Object(body));
            }
        }
        if !entities.is_empty() {
            map.insert("entities".to_string(), Value::Array(entities));
        }
        map
    }
}

impl Adapter for Siren {
    fn name(&self) -> &'static str {
        "siren"
    }

    fn render(&self, tree: &CanonicalTree) -> Document {
        let mut expanded: HashSet<ResourceKey> = tree.root_keys().iter().cloned().collect();

        if tree.is_collection() {
            let mut document = Document::new();
            if let Some(type_name) = tree.type_name() {
                document.insert("class", json!([type_name]));
            }
            if !tree.meta().is_empty() {
                document.insert("properties", json!({ "meta": meta(tree.meta()) }));
            }
            let entities = tree
                .roots()
                .map(|root| {
                    Value::Object(self.entity(tree, root, Some("item"), &mut expanded, None))
                })
                .collect();
            document.insert("entities", Value::Array(entities));
            let links = links(tree.links().iter());
            if !links.is_empty() {
                document.insert("links", Value::Array(links));
            }
            return document;
        }

        let Some(root) = tree.root() else {
            return Document::new();
        };
        let mut map = self.entity(tree, root, None, &mut expanded, Some(tree.links()));
        if !tree.meta().is_empty() {
            if let Some(Value::Object(properties)) = map.get_mut("properties") {
                properties.insert("meta".to_string(), meta(tree.meta()));
            }
        }
        Document::from(map)
    }
}

fn links<'a>(entries: impl Iterator<Item = (&'a String, &'a Link)>) -> Vec<Value> {
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for (name, link) in entries {
        if seen.contains(&name) {
            continue;
        }
        let Some(href) = link.href() else {
            continue;
        };
        seen.push(name);
        out.push(json!({ "rel": [name], "href": href }));
    }
    out
}

fn meta(entries: &IndexMap<String, Value>) -> Value {
    Value::Object(entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}
