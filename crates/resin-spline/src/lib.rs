//! Point-based spline model.
//!
//! Provides the concrete curve representation shared by scene objects:
//! - [`Spline`] - ordered points with optional per-point [`Tangent`] pairs
//! - [`SplineParams`] - interpolation settings carried alongside the points
//! - [`PrimitiveSpline`] - procedural shapes that resolve to a [`Spline`]
//!
//! The tangent list is either empty or holds exactly one entry per point.
//! All mutating operations keep that invariant.

use glam::Vec3;
use thiserror::Error;

mod primitive;

pub use primitive::{PrimitiveShape, PrimitiveSpline};

/// Errors from spline construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplineError {
    /// Tangent list length does not match the point list.
    #[error("tangent count mismatch: {points} points, {tangents} tangents")]
    TangentCountMismatch {
        /// Number of points.
        points: usize,
        /// Number of tangents supplied.
        tangents: usize,
    },
}

/// Left/right control vectors of a spline point.
///
/// Both vectors are relative to the point they belong to, so they transform
/// as directions rather than positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tangent {
    /// Incoming control vector.
    pub left: Vec3,
    /// Outgoing control vector.
    pub right: Vec3,
}

impl Tangent {
    /// Creates a tangent pair.
    pub fn new(left: Vec3, right: Vec3) -> Self {
        Self { left, right }
    }

    /// Creates a smooth tangent pair (left mirrors right).
    pub fn smooth(right: Vec3) -> Self {
        Self { left: -right, right }
    }

    /// Applies `f` to both control vectors.
    pub fn map(self, f: impl Fn(Vec3) -> Vec3) -> Self {
        Self {
            left: f(self.left),
            right: f(self.right),
        }
    }
}

/// Segment type of a spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SplineType {
    /// Straight segments between points.
    #[default]
    Linear,
    /// Cubic interpolation through the points.
    Cubic,
    /// Akima interpolation through the points.
    Akima,
    /// Uniform B-spline approximating the points.
    BSpline,
    /// Bezier segments shaped by per-point tangents.
    Bezier,
}

/// How intermediate points are generated when the spline is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    /// Only the control points.
    None,
    /// Fixed subdivisions, distributed by curvature.
    Natural,
    /// Fixed subdivisions, evenly spaced.
    Uniform,
    /// Points inserted where the angle exceeds a threshold.
    #[default]
    Adaptive,
    /// Adaptive with a maximum segment length.
    Subdivided,
}

/// Interpolation settings of a spline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplineParams {
    /// Sampling mode.
    pub interpolation: Interpolation,
    /// Intermediate points per segment (natural/uniform).
    pub subdivisions: u32,
    /// Angle threshold in radians (adaptive/subdivided).
    pub angle: f32,
    /// Maximum segment length (subdivided).
    pub max_segment_length: f32,
}

impl Default for SplineParams {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::Adaptive,
            subdivisions: 8,
            angle: 5.0_f32.to_radians(),
            max_segment_length: 5.0,
        }
    }
}

/// A single-contour spline: points, optional tangents and sampling settings.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spline {
    points: Vec<Vec3>,
    tangents: Vec<Tangent>,
    closed: bool,
    spline_type: SplineType,
    /// Sampling settings.
    pub params: SplineParams,
}

impl Spline {
    /// Creates an open spline without tangents.
    pub fn new(spline_type: SplineType, points: Vec<Vec3>) -> Self {
        Self {
            points,
            spline_type,
            ..Self::default()
        }
    }

    /// Creates an open spline with one tangent pair per point.
    pub fn with_tangents(
        spline_type: SplineType,
        points: Vec<Vec3>,
        tangents: Vec<Tangent>,
    ) -> Result<Self, SplineError> {
        let mut spline = Self::new(spline_type, points);
        spline.set_tangents(tangents)?;
        Ok(spline)
    }

    /// Creates an open spline from point/tangent pairs.
    ///
    /// Cannot mismatch, so unlike [`with_tangents`](Self::with_tangents) this
    /// does not fail.
    pub fn from_pairs(
        spline_type: SplineType,
        pairs: impl IntoIterator<Item = (Vec3, Tangent)>,
    ) -> Self {
        let (points, tangents) = pairs.into_iter().unzip();
        Self {
            points,
            tangents,
            spline_type,
            ..Self::default()
        }
    }

    /// Sets the closed flag, builder style.
    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    /// Sets the sampling settings, builder style.
    pub fn with_params(mut self, params: SplineParams) -> Self {
        self.params = params;
        self
    }

    /// Returns the number of points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the spline has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns all points.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Returns mutable access to the points. The count cannot change.
    pub fn points_mut(&mut self) -> &mut [Vec3] {
        &mut self.points
    }

    /// Replaces the points.
    ///
    /// Tangents are dropped when the new count differs from the old one.
    pub fn set_points(&mut self, points: Vec<Vec3>) {
        if points.len() != self.points.len() {
            self.tangents.clear();
        }
        self.points = points;
    }

    /// Returns the number of tangent pairs (0 or `point_count()`).
    pub fn tangent_count(&self) -> usize {
        self.tangents.len()
    }

    /// Returns true if the spline carries tangents.
    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty()
    }

    /// Returns all tangent pairs.
    pub fn tangents(&self) -> &[Tangent] {
        &self.tangents
    }

    /// Replaces the tangents. Pass an empty list to remove them.
    pub fn set_tangents(&mut self, tangents: Vec<Tangent>) -> Result<(), SplineError> {
        if !tangents.is_empty() && tangents.len() != self.points.len() {
            return Err(SplineError::TangentCountMismatch {
                points: self.points.len(),
                tangents: tangents.len(),
            });
        }
        self.tangents = tangents;
        Ok(())
    }

    /// Returns true if the last point connects back to the first.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Sets the closed flag.
    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Returns the segment type.
    pub fn spline_type(&self) -> SplineType {
        self.spline_type
    }

    /// Returns the number of segments between points.
    pub fn segment_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// Appends the points and tangents of `other`.
    ///
    /// Tangents survive only if both splines carry them; otherwise the result
    /// has none.
    pub fn append(&mut self, other: &Spline) {
        let keep_tangents =
            (self.has_tangents() || self.is_empty()) && other.has_tangents();
        if keep_tangents {
            self.tangents.extend_from_slice(&other.tangents);
        } else {
            self.tangents.clear();
        }
        self.points.extend_from_slice(&other.points);
    }
}
