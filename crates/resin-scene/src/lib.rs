//! Scene objects and hierarchy traversal for resin.
//!
//! This crate provides:
//!
//! - [`SceneObject`] - detached object tree (name, transform, tags, geometry)
//! - [`SceneGraph`] - read-only traversal interface over a live hierarchy
//! - [`find_active_child`] / [`dirty_signature`] - traversals used by generators
//! - [`MemoryScene`] - arena-backed hierarchy implementing [`SceneGraph`]

mod error;
mod graph;
mod memory;
mod object;

pub use error::SceneError;
pub use graph::{DirtySignature, SceneGraph, dirty_signature, find_active_child};
pub use memory::{MemoryScene, NodeId};
pub use object::{ObjectKind, SceneObject, Tag};
pub use rhizome_resin_spline as spline;
pub use rhizome_resin_transform as transform;
