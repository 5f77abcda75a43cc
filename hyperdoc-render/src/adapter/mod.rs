//! Document conventions.
//!
//! An adapter is a pure function from a [`CanonicalTree`] to a [`Document`].
//! Adding a convention means implementing [`Adapter`]; the walker and the
//! schema layer do not change.

mod hal;
mod json_api;
mod siren;

pub use hal::Hal;
pub use json_api::JsonApi;
pub use siren::Siren;

use crate::{CanonicalTree, Document};
use serde::{Deserialize, Serialize};

/// Renders a canonical tree in one document convention.
///
/// Implementations must not assume anything about how the tree was built
/// beyond its accessors, and must not keep state between calls.
pub trait Adapter: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Renders the tree.
    fn render(&self, tree: &CanonicalTree) -> Document;
}

/// The built-in adapters, selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    #[default]
    JsonApi,
    Hal,
    Siren,
}

impl AdapterKind {
    /// The adapter instance for this kind.
    pub fn adapter(self) -> &'static dyn Adapter {
        match self {
            Self::JsonApi => &JsonApi,
            Self::Hal => &Hal,
            Self::Siren => &Siren,
        }
    }
}
