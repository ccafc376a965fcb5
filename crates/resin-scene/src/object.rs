//! Detached scene object trees.

use glam::Vec3;
use rhizome_resin_spline::{PrimitiveSpline, Spline};
use rhizome_resin_transform::LocalTransform;

/// Decorative data attached to an object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tag {
    /// Viewport display color.
    Display {
        /// RGB color, 0-1.
        color: Vec3,
    },
    /// Smoothing angle for generated surfaces.
    Phong {
        /// Angle limit in radians.
        angle_limit: f32,
    },
    /// Free-form note.
    Annotation(String),
}

/// Geometry carried by an object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    /// Concrete point-based spline.
    Spline(Spline),
    /// Procedural spline, resolved on demand.
    Primitive(PrimitiveSpline),
    /// Non-curve point geometry.
    Mesh {
        /// Vertex positions.
        points: Vec<Vec3>,
    },
    /// Deforms sibling or parent geometry.
    Deformer {
        /// Whether the deformer lets the hierarchy below it through unchanged.
        pass_through: bool,
    },
    /// Container without geometry of its own.
    Null,
}

/// A scene object with its subtree, detached from any live hierarchy.
///
/// Used for hierarchy clones, flatten results and generator output.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneObject {
    /// Display name.
    pub name: String,
    /// Local-to-parent transform.
    pub transform: LocalTransform,
    /// Attached tags, in order.
    pub tags: Vec<Tag>,
    /// Geometry.
    pub kind: ObjectKind,
    /// Child objects, in order.
    pub children: Vec<SceneObject>,
}

impl SceneObject {
    /// Creates an object with an identity transform and no tags or children.
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            transform: LocalTransform::IDENTITY,
            tags: Vec::new(),
            kind,
            children: Vec::new(),
        }
    }

    /// Creates a spline object.
    pub fn spline(name: impl Into<String>, spline: Spline) -> Self {
        Self::new(name, ObjectKind::Spline(spline))
    }

    /// Creates a procedural spline object.
    pub fn primitive(name: impl Into<String>, primitive: PrimitiveSpline) -> Self {
        Self::new(name, ObjectKind::Primitive(primitive))
    }

    /// Creates an empty container.
    pub fn null(name: impl Into<String>) -> Self {
        Self::new(name, ObjectKind::Null)
    }

    /// The neutral placeholder returned when nothing could be generated.
    pub fn empty() -> Self {
        Self::null("")
    }

    /// Returns true for a container with no children.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, ObjectKind::Null) && self.children.is_empty()
    }

    /// Sets the transform, builder style.
    pub fn with_transform(mut self, transform: LocalTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Adds a tag, builder style.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Adds a child, builder style.
    pub fn with_child(mut self, child: SceneObject) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the concrete spline, if this is a spline object.
    pub fn as_spline(&self) -> Option<&Spline> {
        match &self.kind {
            ObjectKind::Spline(spline) => Some(spline),
            _ => None,
        }
    }

    /// Returns mutable access to the concrete spline, if this is a spline object.
    pub fn as_spline_mut(&mut self) -> Option<&mut Spline> {
        match &mut self.kind {
            ObjectKind::Spline(spline) => Some(spline),
            _ => None,
        }
    }

    /// Returns true for concrete and procedural splines.
    pub fn is_spline_like(&self) -> bool {
        matches!(self.kind, ObjectKind::Spline(_) | ObjectKind::Primitive(_))
    }

    /// Returns true if the object produces geometry of its own.
    pub fn has_geometry(&self) -> bool {
        matches!(
            self.kind,
            ObjectKind::Spline(_) | ObjectKind::Primitive(_) | ObjectKind::Mesh { .. }
        )
    }

    /// Returns the closed state as the object currently reports it.
    ///
    /// Procedural splines answer from their shape without resolving.
    pub fn is_closed(&self) -> bool {
        match &self.kind {
            ObjectKind::Spline(spline) => spline.is_closed(),
            ObjectKind::Primitive(primitive) => primitive.is_closed(),
            _ => false,
        }
    }

    /// Resolves to the concrete point-based spline.
    ///
    /// Procedural splines are generated; non-curve objects return `None`.
    pub fn real_spline(&self) -> Option<Spline> {
        match &self.kind {
            ObjectKind::Spline(spline) => Some(spline.clone()),
            ObjectKind::Primitive(primitive) => Some(primitive.resolve()),
            _ => None,
        }
    }

    /// Total number of objects in this tree, including self.
    pub fn object_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(SceneObject::object_count)
            .sum::<usize>()
    }
}
