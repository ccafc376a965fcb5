//! Spatial transforms for scene objects.
//!
//! This crate provides [`SpatialTransform`], the interface generic geometry code
//! uses to map local coordinates into a parent space, and [`LocalTransform`], the
//! 4x3 local-to-parent matrix carried by every scene object.
//!
//! A transform has two separable parts: a rotation/scale block and a translation.
//! Positions receive both, directions (tangents, normals before renormalization)
//! receive only the rotation/scale block.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use rhizome_resin_transform::{LocalTransform, SpatialTransform};
//!
//! let t = LocalTransform::from_translation(Vec3::new(0.0, 5.0, 0.0));
//!
//! // Points move with the translation...
//! assert_eq!(t.transform_point(Vec3::X), Vec3::new(1.0, 5.0, 0.0));
//! // ...directions do not.
//! assert_eq!(t.transform_vector(Vec3::X), Vec3::X);
//! ```

use glam::{Affine3A, Mat4, Quat, Vec3, Vec3A};

/// Unified interface for spatial transforms.
///
/// # Associated Types
///
/// - `Vector`: The position/translation type
/// - `Rotation`: The rotation representation
/// - `Matrix`: The matrix type for the full transformation
pub trait SpatialTransform {
    /// The vector type for positions, directions and translations.
    type Vector: Copy;

    /// The rotation representation.
    type Rotation: Copy;

    /// The matrix type for the full transformation.
    type Matrix: Copy;

    /// Returns the translation component.
    fn translation(&self) -> Self::Vector;

    /// Returns the rotation component.
    fn rotation(&self) -> Self::Rotation;

    /// Returns the scale component.
    fn scale(&self) -> Self::Vector;

    /// Converts to a transformation matrix.
    ///
    /// The matrix transforms points from local space to parent space.
    fn to_matrix(&self) -> Self::Matrix;

    /// Transforms a point from local space to parent space.
    fn transform_point(&self, point: Self::Vector) -> Self::Vector;

    /// Transforms a direction from local space to parent space.
    ///
    /// Only the rotation/scale part applies; translation is ignored and the
    /// result is not normalized.
    fn transform_vector(&self, vector: Self::Vector) -> Self::Vector;
}

/// A local-to-parent transform: 3x3 rotation/scale block plus translation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalTransform {
    affine: Affine3A,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl LocalTransform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        affine: Affine3A::IDENTITY,
    };

    /// Wraps an existing affine matrix.
    pub fn from_affine(affine: Affine3A) -> Self {
        Self { affine }
    }

    /// Creates a transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_affine(Affine3A::from_translation(translation))
    }

    /// Creates a transform from scale, rotation and translation (applied in that order).
    pub fn from_scale_rotation_translation(scale: Vec3, rotation: Quat, translation: Vec3) -> Self {
        Self::from_affine(Affine3A::from_scale_rotation_translation(
            scale,
            rotation,
            translation,
        ))
    }

    /// Creates a transform from its three axis columns and translation.
    ///
    /// Accepts arbitrary (sheared, non-orthogonal) axes.
    pub fn from_cols(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3, translation: Vec3) -> Self {
        Self::from_affine(Affine3A::from_cols(
            Vec3A::from(x_axis),
            Vec3A::from(y_axis),
            Vec3A::from(z_axis),
            Vec3A::from(translation),
        ))
    }

    /// Returns the underlying affine matrix.
    pub fn affine(&self) -> Affine3A {
        self.affine
    }

    /// Combines two transforms (self applied after `local`).
    pub fn then(&self, local: &LocalTransform) -> LocalTransform {
        Self::from_affine(self.affine * local.affine)
    }

    /// Returns true if this transform maps every point to itself.
    pub fn is_identity(&self) -> bool {
        self.affine == Affine3A::IDENTITY
    }
}

impl From<Affine3A> for LocalTransform {
    fn from(affine: Affine3A) -> Self {
        Self::from_affine(affine)
    }
}

impl From<LocalTransform> for Mat4 {
    fn from(t: LocalTransform) -> Self {
        Mat4::from(t.affine)
    }
}

impl SpatialTransform for LocalTransform {
    type Vector = Vec3;
    type Rotation = Quat;
    type Matrix = Mat4;

    fn translation(&self) -> Vec3 {
        Vec3::from(self.affine.translation)
    }

    fn rotation(&self) -> Quat {
        self.affine.to_scale_rotation_translation().1
    }

    fn scale(&self) -> Vec3 {
        self.affine.to_scale_rotation_translation().0
    }

    fn to_matrix(&self) -> Mat4 {
        Mat4::from(self.affine)
    }

    fn transform_point(&self, point: Vec3) -> Vec3 {
        self.affine.transform_point3(point)
    }

    fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.affine.transform_vector3(vector)
    }
}
