//! Spline offset generator for resin scenes.
//!
//! The generator consumes the first active child spline below it, moves every
//! point along the parent-space Y axis by a configurable distance and copies
//! the child's closed state, sampling settings and tags onto the result.
//!
//! - [`OffsetSpline`] - the persisted configuration and the pure transform
//! - [`propagate_metadata`] - metadata copy onto a built result
//! - [`Host`] - scene services the generator depends on
//! - [`OffsetSplineGenerator`] - preview/contour entry points with result caching
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use rhizome_resin_scene::{MemoryScene, SceneObject};
//! use rhizome_resin_spline::{Spline, SplineType};
//! use rhizome_resin_spline_offset::OffsetSplineGenerator;
//!
//! let mut scene = MemoryScene::new();
//! let node = scene.add_root(SceneObject::null("offset"));
//! scene
//!     .add_child(
//!         node,
//!         SceneObject::spline("line", Spline::new(SplineType::Linear, vec![Vec3::ZERO, Vec3::X])),
//!     )
//!     .unwrap();
//!
//! let mut generator = OffsetSplineGenerator::new();
//! let result = generator.evaluate_preview(&scene, node);
//! assert_eq!(result.as_spline().unwrap().points()[1], Vec3::new(1.0, 100.0, 0.0));
//! ```

mod error;
mod generator;
mod host;
mod metadata;
mod observer;
mod op;

pub use error::{HostError, OffsetError};
pub use generator::OffsetSplineGenerator;
pub use host::{HierarchyClone, Host, flatten_object, join_contours};
pub use metadata::propagate_metadata;
pub use observer::{EntryPoint, EvalObserver, EvalStats, NoopObserver, Outcome};
pub use op::{DEFAULT_OFFSET, OffsetSpline, offset_points};
