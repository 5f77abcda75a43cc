use crate::{Adapter, CanonicalTree, Document};
use hyperdoc_model::Entity;
use serde_json::{Map, Value};
use tracing::debug;

/// JSON:API-style documents.
///
/// ```json
/// {
///   "data": {"id": 1, "type": "users", "name": "...", "links": {...}},
///   "included": [...],
///   "links": {...},
///   "meta": {...}
/// }
/// ```
///
/// `data` is an object for a single root and an array for a collection.
/// `included`, `links` and `meta` are omitted when empty. Document links
/// render as their href; link templates on included resources are dropped
/// since the convention has nowhere to put them.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonApi;

impl JsonApi {
    fn resource(&self, entity: &Entity) -> Value {
        let mut map = Map::new();
        map.insert("id".to_string(), entity.id().clone());
        if let Some(type_name) = entity.type_name() {
            map.insert("type".to_string(), Value::String(type_name.to_string()));
        }
        for (name, value) in entity.properties() {
            match name.as_str() {
                "id" | "type" => continue,
                "links" | "meta" => {
                    debug!(
                        resource = %entity.key(),
                        property = %name,
                        "Skipping property named after a resource member"
                    );
                    continue;
                }
                _ => {}
            }
            map.insert(name.clone(), value.clone());
        }

        let mut links = Map::new();
        for (name, link) in entity.links() {
            if link.is_templated() {
                debug!(
                    resource = %entity.key(),
                    link = %name,
                    "Dropping link template on included resource"
                );
                continue;
            }
            links.insert(name.clone(), link.to_value());
        }
        if !links.is_empty() {
            map.insert("links".to_string(), Value::Object(links));
        }
        if !entity.meta().is_empty() {
            map.insert("meta".to_string(), object(entity.meta()));
        }
        Value::Object(map)
    }
}

impl Adapter for JsonApi {
    fn name(&self) -> &'static str {
        "json_api"
    }

    fn render(&self, tree: &CanonicalTree) -> Document {
        let mut document = Document::new();

        let data = if tree.is_collection() {
            Value::Array(tree.roots().map(|root| self.resource(root)).collect())
        } else {
            tree.root()
                .map(|root| self.resource(root))
                .unwrap_or(Value::Null)
        };
        document.insert("data", data);

        let included: Vec<Value> = tree.included().map(|entity| self.resource(entity)).collect();
        if !included.is_empty() {
            document.insert("included", Value::Array(included));
        }

        if !tree.links().is_empty() {
            let links = tree
                .links()
                .iter()
                .map(|(name, link)| {
                    let value = match link.href() {
                        Some(href) => Value::String(href.to_string()),
                        None => link.to_value(),
                    };
                    (name.clone(), value)
                })
                .collect();
            document.insert("links", Value::Object(links));
        }
        if !tree.meta().is_empty() {
            document.insert("meta", object(tree.meta()));
        }

        document
    }
}

fn object<'a>(entries: impl IntoIterator<Item = (&'a String, &'a Value)>) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}
