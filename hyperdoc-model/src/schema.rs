use crate::Expr;
use hyperdoc_types::{Context, PropertyReader};
use serde::Deserialize;
use serde_json::Value;

/// One declaration of a schema. Evaluated in order.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    /// A property rendered on the resource.
    Property { name: String, value: Expr },
    /// A link. Resolved against the link rules at evaluation time.
    Link { name: String, value: Expr },
    /// A meta entry. Meta entries accumulate into one mapping.
    Meta { name: String, value: Expr },
    /// A to-one association rendered with a nested schema.
    Entity(NestedDeclaration),
    /// A to-many association rendered with a nested schema.
    Collection(NestedDeclaration),
}

/// An `entity` or `collection` declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct NestedDeclaration {
    /// Name of the relationship link and of the embedded slot.
    pub name: String,
    /// Association read from the subject; defaults to `name`.
    #[serde(default)]
    pub association: Option<String>,
    /// Registered name of the schema the associated objects render with.
    pub schema: String,
    /// Values merged over the parent context for the nested evaluation.
    #[serde(default)]
    pub extra_context: Context,
}

impl NestedDeclaration {
    /// Creates a declaration reading the association of the same name.
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            association: None,
            schema: schema.into(),
            extra_context: Context::new(),
        }
    }

    /// The association read from the subject.
    pub fn association_name(&self) -> &str {
        self.association.as_deref().unwrap_or(&self.name)
    }
}

/// Declarative description of how a type is rendered.
///
/// A schema is built once and shared across renders; it holds the rules
/// for deriving a resource, never the resource itself.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    type_name: Option<String>,
    declarations: Vec<Declaration>,
}

impl Schema {
    /// Starts an empty schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// The declared resource type.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Declarations in order.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    type_name: Option<String>,
    declarations: Vec<Declaration>,
}

impl SchemaBuilder {
    /// Starts from a copy of `parent`: its type and declarations come first,
    /// declarations added afterwards follow them.
    #[must_use]
    pub fn inherit(mut self, parent: &Schema) -> Self {
        if self.type_name.is_none() {
            self.type_name = parent.type_name.clone();
        }
        let mut declarations = parent.declarations.clone();
        declarations.append(&mut self.declarations);
        self.declarations = declarations;
        self
    }

    /// Sets the resource type.
    #[must_use]
    pub fn type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = Some(name.into());
        self
    }

    /// Declares a property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.declarations.push(Declaration::Property {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Declares a property computed by a closure.
    #[must_use]
    pub fn property_with<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&dyn PropertyReader, &Context) -> Value + Send + Sync + 'static,
    {
        self.property(name, Expr::computed(f))
    }

    /// Declares one property per name, each read from the subject property
    /// of the same name.
    #[must_use]
    pub fn attributes(mut self, names: &[&str]) -> Self {
        for name in names {
            self = self.property(*name, Expr::attr(*name));
        }
        self
    }

    /// Declares a link.
    #[must_use]
    pub fn link(mut self, name: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.declarations.push(Declaration::Link {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Declares a link computed by a closure.
    #[must_use]
    pub fn link_with<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&dyn PropertyReader, &Context) -> Value + Send + Sync + 'static,
    {
        self.link(name, Expr::computed(f))
    }

    /// Declares a meta entry.
    #[must_use]
    pub fn meta(mut self, name: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.declarations.push(Declaration::Meta {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Declares a to-one association read from the subject association
    /// called `name`.
    #[must_use]
    pub fn entity(self, name: impl Into<String>, schema: impl Into<String>) -> Self {
        self.declaration(Declaration::Entity(NestedDeclaration::new(name, schema)))
    }

    /// Declares a to-one association read from a differently named subject
    /// association, with extra context for the nested evaluation.
    #[must_use]
    pub fn entity_from(
        self,
        name: impl Into<String>,
        association: impl Into<String>,
        schema: impl Into<String>,
        extra_context: Context,
    ) -> Self {
        let mut declaration = NestedDeclaration::new(name, schema);
        declaration.association = Some(association.into());
        declaration.extra_context = extra_context;
        self.declaration(Declaration::Entity(declaration))
    }

    /// Declares a to-many association read from the subject association
    /// called `name`.
    #[must_use]
    pub fn collection(self, name: impl Into<String>, schema: impl Into<String>) -> Self {
        self.declaration(Declaration::Collection(NestedDeclaration::new(name, schema)))
    }

    /// Declares a to-many association read from a differently named subject
    /// association, with extra context for the nested evaluation.
    #[must_use]
    pub fn collection_from(
        self,
        name: impl Into<String>,
        association: impl Into<String>,
        schema: impl Into<String>,
        extra_context: Context,
    ) -> Self {
        let mut declaration = NestedDeclaration::new(name, schema);
        declaration.association = Some(association.into());
        declaration.extra_context = extra_context;
        self.declaration(Declaration::Collection(declaration))
    }

    /// Sets extra context on the most recent `entity`/`collection`
    /// declaration. Has no effect after any other declaration.
    #[must_use]
    pub fn with_context(mut self, extra_context: Context) -> Self {
        match self.declarations.last_mut() {
            Some(Declaration::Entity(nested)) | Some(Declaration::Collection(nested)) => {
                nested.extra_context = extra_context;
            }
            _ => {}
        }
        self
    }

    /// Appends a declaration as is.
    #[must_use]
    pub fn declaration(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Finishes the schema.
    pub fn build(self) -> Schema {
        Schema {
            type_name: self.type_name,
            declarations: self.declarations,
        }
    }
}

/// A schema written as JSON.
///
/// ```json
/// {
///   "type": "users",
///   "extends": "base",
///   "declarations": [
///     {"kind": "property", "name": "name", "value": {"attribute": "name"}},
///     {"kind": "link", "name": "self", "value": {"format": "/users/{id}"}},
///     {"kind": "collection", "name": "friends", "schema": "user"}
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaDefinition {
    /// The resource type.
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,
    /// Registered name of a schema to inherit from.
    #[serde(default)]
    pub extends: Option<String>,
    /// Declarations in order.
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl SchemaDefinition {
    /// Converts to a builder, inheriting from `parent` when given.
    pub fn into_builder(self, parent: Option<&Schema>) -> SchemaBuilder {
        let mut builder = SchemaBuilder::default();
        if let Some(type_name) = self.type_name {
            builder = builder.type_name(type_name);
        }
        for declaration in self.declarations {
            builder = builder.declaration(declaration);
        }
        match parent {
            Some(parent) => builder.inherit(parent),
            None => builder,
        }
    }
}
