//! The offset operation.

use std::collections::TryReserveError;

use glam::Vec3;
use rhizome_resin_scene::SceneObject;
use rhizome_resin_spline::{Spline, Tangent};
use rhizome_resin_transform::SpatialTransform;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::OffsetError;

/// Default distance along Y.
pub const DEFAULT_OFFSET: f32 = 100.0;

/// Moves a spline along the Y axis of its parent space.
///
/// Points are mapped through the source's local transform and then shifted
/// by `offset` along Y. Tangents only receive the rotation/scale part of the
/// transform and never the offset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OffsetSpline {
    /// Distance to move along Y.
    pub offset: f32,
}

impl Default for OffsetSpline {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
        }
    }
}

impl OffsetSpline {
    /// Creates an offset operation with the given distance.
    pub fn new(offset: f32) -> Self {
        Self { offset }
    }

    /// Builds the offset spline of `source`.
    ///
    /// The result keeps the source's point count, tangent presence and
    /// segment type. Its points are already in parent space, so it carries an
    /// identity transform. Closed state, sampling settings and tags are left
    /// at their defaults; see [`propagate_metadata`](crate::propagate_metadata).
    pub fn apply(&self, source: &SceneObject) -> Result<SceneObject, OffsetError> {
        let spline = source.real_spline().ok_or(OffsetError::NotASpline)?;
        let (points, tangents) = offset_points(
            &source.transform,
            spline.points(),
            spline.tangents(),
            self.offset,
        )?;
        let result = Spline::with_tangents(spline.spline_type(), points, tangents)?;
        Ok(SceneObject::spline(source.name.clone(), result))
    }
}

/// Maps points and tangents into parent space and shifts the points along Y.
///
/// An empty tangent slice yields an empty tangent list.
pub fn offset_points<T: SpatialTransform<Vector = Vec3>>(
    transform: &T,
    points: &[Vec3],
    tangents: &[Tangent],
    offset: f32,
) -> Result<(Vec<Vec3>, Vec<Tangent>), TryReserveError> {
    let mut out_points = Vec::new();
    out_points.try_reserve_exact(points.len())?;
    out_points.extend(
        points
            .iter()
            .map(|&p| transform.transform_point(p) + Vec3::Y * offset),
    );

    let mut out_tangents = Vec::new();
    out_tangents.try_reserve_exact(tangents.len())?;
    out_tangents.extend(
        tangents
            .iter()
            .map(|t| t.map(|v| transform.transform_vector(v))),
    );

    Ok((out_points, out_tangents))
}
