//! The render entry point.

use crate::{walk, Adapter, CanonicalTree, Document, RenderConfig};
use hyperdoc_model::SchemaRegistry;
use hyperdoc_types::{Association, Context, Result};
use tracing::debug;

/// Renders one subject with one registered schema.
///
/// ```ignore
/// let document = Serializer::new(&registry, "user", Association::one(user))
///     .context(Context::new().with("locale", "en"))
///     .render()?;
/// ```
///
/// The serializer borrows the registry and holds nothing else between
/// calls; every [`render`](Self::render) walks the graph afresh.
pub struct Serializer<'a> {
    registry: &'a SchemaRegistry,
    schema: String,
    subject: Association,
    context: Context,
    adapter: Option<&'a dyn Adapter>,
    config: RenderConfig,
}

impl<'a> Serializer<'a> {
    /// Creates a serializer with an empty context and default settings.
    pub fn new(
        registry: &'a SchemaRegistry,
        schema: impl Into<String>,
        subject: Association,
    ) -> Self {
        Self {
            registry,
            schema: schema.into(),
            subject,
            context: Context::new(),
            adapter: None,
            config: RenderConfig::default(),
        }
    }

    /// Sets the context passed to the root schema.
    #[must_use]
    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Renders with `adapter`, overriding the configured adapter kind.
    #[must_use]
    pub fn adapter(mut self, adapter: &'a dyn Adapter) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Replaces the render settings.
    #[must_use]
    pub fn config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Walks the graph without rendering.
    pub fn to_tree(&self) -> Result<CanonicalTree> {
        Ok(walk(
            self.registry,
            &self.schema,
            &self.subject,
            &self.context,
            self.config.max_depth,
        )?)
    }

    /// Walks the graph and renders it.
    pub fn render(&self) -> Result<Document> {
        let tree = self.to_tree()?;
        let adapter = self.adapter.unwrap_or_else(|| self.config.adapter.adapter());
        debug!(
            schema = %self.schema,
            adapter = adapter.name(),
            entities = tree.len(),
            "Rendering document"
        );
        Ok(adapter.render(&tree))
    }
}
