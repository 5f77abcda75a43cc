use crate::{Evaluation, Link, NestedEvaluation};
use hyperdoc_types::ResourceKey;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One resolved resource.
///
/// Properties, links and meta are computed once, when the walker first
/// visits the subject, and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    key: ResourceKey,
    id: Value,
    type_name: Option<String>,
    properties: IndexMap<String, Value>,
    links: IndexMap<String, Link>,
    meta: IndexMap<String, Value>,
    relations: Vec<Relation>,
}

impl Entity {
    /// The identity this entity is deduplicated by.
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    /// The identifier exactly as the subject reported it.
    pub fn id(&self) -> &Value {
        &self.id
    }

    /// The declared resource type.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    /// A single property.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Links in declaration order, relationship links included.
    pub fn links(&self) -> &IndexMap<String, Link> {
        &self.links
    }

    /// A single link.
    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.get(name)
    }

    /// Meta entries.
    pub fn meta(&self) -> &IndexMap<String, Value> {
        &self.meta
    }

    /// Nested associations that were present, in declaration order.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Removes and returns the link templates, leaving every other link in
    /// place.
    pub fn take_link_templates(&mut self) -> IndexMap<String, Link> {
        let mut templates = IndexMap::new();
        self.links.retain(|name, link| {
            if link.is_templated() {
                templates.insert(name.clone(), link.clone());
                false
            } else {
                true
            }
        });
        templates
    }

    /// Removes and returns the meta entries.
    pub fn take_meta(&mut self) -> IndexMap<String, Value> {
        std::mem::take(&mut self.meta)
    }
}

impl Evaluation {
    /// Freezes the evaluation into an [`Entity`], handing back the nested
    /// evaluations still to be walked.
    pub fn into_parts(self) -> (Entity, Vec<NestedEvaluation>) {
        let relations = self
            .nested
            .iter()
            .map(|nested| Relation {
                name: nested.name.clone(),
                cardinality: nested.cardinality,
                targets: nested.members.iter().map(|(key, _)| key.clone()).collect(),
            })
            .collect();

        let entity = Entity {
            key: self.key,
            id: self.id,
            type_name: self.type_name,
            properties: self.properties,
            links: self.links,
            meta: self.meta,
            relations,
        };
        (entity, self.nested)
    }
}

impl From<Evaluation> for Entity {
    fn from(evaluation: Evaluation) -> Self {
        evaluation.into_parts().0
    }
}

/// A present association of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// The declaration name.
    pub name: String,
    pub cardinality: Cardinality,
    /// Identities of the associated entities, in host order.
    pub targets: Vec<ResourceKey>,
}

/// Whether an association was declared with `entity` or `collection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    One,
    Many,
}
