use crate::AdapterKind;
use serde::{Deserialize, Serialize};

/// Default bound on association nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Render settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Adapter used when the serializer is not given one explicitly.
    pub adapter: AdapterKind,
    /// Deepest association level the walker will follow.
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            adapter: AdapterKind::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
