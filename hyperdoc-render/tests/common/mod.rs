//! Shared fixtures for render tests.

#![allow(dead_code)]

use hyperdoc_render::{
    Association, Context, Expr, PropertyReader, Schema, SchemaBuilder, SchemaRegistry,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// One stored person. Associations hold ids and are resolved on read, so
/// cyclic graphs need no reference cycles.
#[derive(Debug, Clone)]
pub struct Record {
    pub id: u64,
    pub name: String,
    pub age: u64,
    pub friends: Option<Vec<u64>>,
    pub manager: Option<u64>,
}

impl Record {
    pub fn new(id: u64, name: &str, age: u64) -> Self {
        Self {
            id,
            name: name.to_string(),
            age,
            friends: Some(Vec::new()),
            manager: None,
        }
    }

    pub fn friends(mut self, ids: &[u64]) -> Self {
        self.friends = Some(ids.to_vec());
        self
    }

    pub fn no_friends(mut self) -> Self {
        self.friends = None;
        self
    }

    pub fn manager(mut self, id: u64) -> Self {
        self.manager = Some(id);
        self
    }
}

/// An in-memory object graph.
#[derive(Debug, Default)]
pub struct Directory {
    records: HashMap<u64, Record>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, record: Record) -> Self {
        self.records.insert(record.id, record);
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

/// A handle on one person of a [`Directory`].
#[derive(Debug, Clone)]
pub struct Person {
    directory: Arc<Directory>,
    id: u64,
}

impl Person {
    pub fn new(directory: &Arc<Directory>, id: u64) -> Self {
        Self {
            directory: Arc::clone(directory),
            id,
        }
    }

    fn record(&self) -> Option<&Record> {
        self.directory.records.get(&self.id)
    }

    fn handle(&self, id: u64) -> Arc<dyn PropertyReader> {
        Arc::new(Person::new(&self.directory, id))
    }
}

impl PropertyReader for Person {
    fn read(&self, name: &str) -> Option<Value> {
        let record = self.record()?;
        match name {
            "id" => Some(json!(record.id)),
            "name" => Some(json!(record.name)),
            "age" => Some(json!(record.age)),
            _ => None,
        }
    }

    fn association(&self, name: &str) -> Option<Association> {
        let record = self.record()?;
        match name {
            "friends" => record
                .friends
                .as_ref()
                .map(|ids| Association::Many(ids.iter().map(|id| self.handle(*id)).collect())),
            "manager" => record.manager.map(|id| Association::One(self.handle(id))),
            _ => None,
        }
    }
}

/// The user graph most tests render: Ismael (1) befriends Joe (2), and both
/// report to Jane (3).
pub fn directory() -> Arc<Directory> {
    Directory::new()
        .with(Record::new(1, "Ismael", 35).friends(&[2]).manager(3))
        .with(Record::new(2, "Joe", 33).manager(3))
        .with(Record::new(3, "Jane", 40))
        .into_shared()
}

pub fn person(directory: &Arc<Directory>, id: u64) -> Association {
    Association::One(Arc::new(Person::new(directory, id)))
}

pub fn people(directory: &Arc<Directory>, ids: &[u64]) -> Association {
    Association::Many(
        ids.iter()
            .map(|id| Arc::new(Person::new(directory, *id)) as Arc<dyn PropertyReader>)
            .collect(),
    )
}

pub fn context() -> Context {
    Context::from_iter([("name", "some_controller")])
}

/// The `user` schema without any nested declarations.
pub fn user_base() -> SchemaBuilder {
    Schema::builder()
        .type_name("users")
        .attributes(&["name", "age"])
        .property("controller_name", Expr::context("name"))
        .property("message_from_above", Expr::context("message"))
        .link("self", Expr::format("http://foo.bar.com/{id}"))
        .link("empty", Value::Null)
}

pub fn user_schema() -> Schema {
    user_base()
        .collection("friends", "user")
        .with_context(Context::from_iter([(
            "message",
            "Merged into parent's context",
        )]))
        .entity("manager", "manager")
        .meta("nation", "zulu")
        .build()
}

pub fn manager_schema() -> Schema {
    Schema::builder()
        .type_name("managers")
        .attributes(&["name", "age"])
        .link("self", Expr::format("http://foo.bar.com/{id}"))
        .build()
}

/// A registry with `user` and `manager` registered.
pub fn registry() -> SchemaRegistry {
    registry_with(user_schema())
}

/// A registry with `manager` and the given schema as `user`.
pub fn registry_with(user: Schema) -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register("user", user).register("manager", manager_schema());
    registry
}

/// `size` people who are all friends with each other.
pub fn clique(size: u64) -> Arc<Directory> {
    let mut directory = Directory::new();
    for id in 1..=size {
        let others: Vec<u64> = (1..=size).filter(|other| *other != id).collect();
        directory = directory.with(Record::new(id, "member", id).friends(&others));
    }
    directory.into_shared()
}

/// Number of JSON objects anywhere under `value` that have a `member` key.
pub fn count_objects_with(value: &Value, member: &str) -> usize {
    match value {
        Value::Object(map) => {
            let own = usize::from(map.contains_key(member));
            own + map.values().map(|v| count_objects_with(v, member)).sum::<usize>()
        }
        Value::Array(items) => items.iter().map(|v| count_objects_with(v, member)).sum(),
        _ => 0,
    }
}
