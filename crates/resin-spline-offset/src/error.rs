//! Error types for resin-spline-offset.

use std::collections::TryReserveError;

use rhizome_resin_spline::SplineError;
use thiserror::Error;

/// Failures reported by host services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The node is not part of the hierarchy.
    #[error("node not found")]
    NodeNotFound,

    /// The subtree could not be cloned.
    #[error("clone failed: {0}")]
    CloneFailed(String),

    /// The object could not be converted to concrete geometry.
    #[error("flatten failed: {0}")]
    FlattenFailed(String),

    /// The parts of a flattened container could not be merged.
    #[error("join failed: {0}")]
    JoinFailed(String),
}

/// Reasons an evaluation produced no geometry.
///
/// None of these reach the host; the entry points turn them into the empty
/// placeholder object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OffsetError {
    /// No active child below the generator.
    #[error("no active child")]
    NoActiveChild,

    /// The input does not resolve to a point-based spline.
    #[error("input is not a spline")]
    NotASpline,

    /// A recompute was needed but the host returned no clone.
    #[error("host returned no clone")]
    MissingClone,

    /// A host service failed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The result could not be allocated.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// The result spline could not be built.
    #[error(transparent)]
    Spline(#[from] SplineError),
}
