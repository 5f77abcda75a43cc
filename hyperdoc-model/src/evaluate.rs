//! The schema interpreter.

use crate::{
    resolve_link, Cardinality, Declaration, Link, NestedDeclaration, Schema, SchemaRegistry,
};
use hyperdoc_types::{
    identifier_string, Context, DeclarationError, PropertyReader, ResourceKey,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Result of running a schema against one subject.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Identity of the subject under this schema.
    pub key: ResourceKey,
    /// The subject's identifier as read.
    pub id: Value,
    pub type_name: Option<String>,
    pub properties: IndexMap<String, Value>,
    /// Explicit links plus one relationship link per present association,
    /// unless an explicit link took that name.
    pub links: IndexMap<String, Link>,
    pub meta: IndexMap<String, Value>,
    /// Present associations, still to be walked.
    pub nested: Vec<NestedEvaluation>,
}

/// A present `entity`/`collection` association awaiting traversal.
#[derive(Clone)]
pub struct NestedEvaluation {
    pub name: String,
    pub cardinality: Cardinality,
    /// Registered name of the nested schema.
    pub schema: String,
    /// Parent context extended with the declaration's extra context.
    pub context: Context,
    /// Associated objects with their identities, in host order.
    pub members: Vec<(ResourceKey, Arc<dyn PropertyReader>)>,
}

impl fmt::Debug for NestedEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedEvaluation")
            .field("name", &self.name)
            .field("cardinality", &self.cardinality)
            .field("schema", &self.schema)
            .field("context", &self.context)
            .field(
                "members",
                &self.members.iter().map(|(key, _)| key).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Computes the identity of `subject` under `schema`.
///
/// The type is the schema's type name (empty when undeclared); the id is the
/// subject's `id` property rendered as a string.
pub fn identify(
    schema: &Schema,
    subject: &dyn PropertyReader,
) -> Result<ResourceKey, DeclarationError> {
    let type_name = schema.type_name().unwrap_or_default();
    subject
        .read("id")
        .as_ref()
        .and_then(identifier_string)
        .map(|id| ResourceKey::new(type_name, id))
        .ok_or_else(|| DeclarationError::MissingIdentifier {
            type_name: type_name.to_string(),
        })
}

/// Runs `schema` against `subject`.
///
/// Declarations are applied in order. Link values are resolved as soon as
/// they are evaluated, so an invalid link fails the call at that point.
/// Absent associations (none, or an empty collection) are skipped entirely.
pub fn evaluate(
    registry: &SchemaRegistry,
    schema: &Schema,
    subject: &dyn PropertyReader,
    context: &Context,
) -> Result<Evaluation, DeclarationError> {
    let key = identify(schema, subject)?;
    trace!(resource = %key, declarations = schema.declarations().len(), "evaluating schema");

    let mut evaluation = Evaluation {
        id: subject.read("id").unwrap_or(Value::Null),
        key,
        type_name: schema.type_name().map(str::to_string),
        properties: IndexMap::new(),
        links: IndexMap::new(),
        meta: IndexMap::new(),
        nested: Vec::new(),
    };

    for declaration in schema.declarations() {
        match declaration {
            Declaration::Property { name, value } => {
                evaluation
                    .properties
                    .insert(name.clone(), value.eval(subject, context));
            }
            Declaration::Link { name, value } => {
                let link = resolve_link(name, value.eval(subject, context))?;
                evaluation.links.insert(name.clone(), link);
            }
            Declaration::Meta { name, value } => {
                evaluation
                    .meta
                    .insert(name.clone(), value.eval(subject, context));
            }
            Declaration::Entity(nested) => {
                let cardinality = Cardinality::One;
                evaluate_nested(registry, nested, cardinality, subject, context, &mut evaluation)?;
            }
            Declaration::Collection(nested) => {
                let cardinality = Cardinality::Many;
                evaluate_nested(registry, nested, cardinality, subject, context, &mut evaluation)?;
            }
        }
    }

    Ok(evaluation)
}

fn evaluate_nested(
    registry: &SchemaRegistry,
    declaration: &NestedDeclaration,
    cardinality: Cardinality,
    subject: &dyn PropertyReader,
    context: &Context,
    evaluation: &mut Evaluation,
) -> Result<(), DeclarationError> {
    let Some(association) = subject.association(declaration.association_name()) else {
        return Ok(());
    };
    let objects = match cardinality {
        Cardinality::One => &association.members()[..association.len().min(1)],
        Cardinality::Many => association.members(),
    };
    if objects.is_empty() {
        return Ok(());
    }

    let schema = registry.get(&declaration.schema)?;
    let members = objects
        .iter()
        .map(|object| Ok((identify(schema, &**object)?, Arc::clone(object))))
        .collect::<Result<Vec<_>, DeclarationError>>()?;

    let type_name = schema.type_name().unwrap_or_default();
    let relationship = match cardinality {
        Cardinality::One => Link::to_one(type_name, members[0].0.id()),
        Cardinality::Many => Link::to_many(type_name, members.iter().map(|(key, _)| key.id())),
    };
    evaluation
        .links
        .entry(declaration.name.clone())
        .or_insert(relationship);

    evaluation.nested.push(NestedEvaluation {
        name: declaration.name.clone(),
        cardinality,
        schema: declaration.schema.clone(),
        context: context.extend(&declaration.extra_context),
        members,
    });
    Ok(())
}
