//! Error types for resin-scene.

use crate::memory::NodeId;
use thiserror::Error;

/// Errors from hierarchy edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Node with the given ID was not found (never created or removed).
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
}
