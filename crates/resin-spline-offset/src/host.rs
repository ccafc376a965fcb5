//! Host services consumed by the generator.

use rhizome_resin_scene::{MemoryScene, NodeId, ObjectKind, SceneGraph, SceneObject};
use rhizome_resin_spline::Spline;
use rhizome_resin_transform::LocalTransform;

use crate::error::HostError;
use crate::op::offset_points;

/// Result of a hierarchy-aware clone.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyClone {
    /// Whether the host considers the cloned subtree changed.
    pub dirty: bool,
    /// The clone coerced to spline form.
    ///
    /// `None` if the host could not produce one, or if the subtree is clean
    /// and the caller did not ask for a clone anyway.
    pub clone: Option<SceneObject>,
}

/// Scene services a generator depends on.
///
/// The traversal half comes from [`SceneGraph`]; the rest covers object
/// access, the self-dirty flag and the conversion commands.
pub trait Host: SceneGraph {
    /// Returns the object at `node`.
    fn object(&self, node: Self::NodeId) -> Option<&SceneObject>;

    /// Returns the self-dirty flag of `node`.
    fn is_dirty(&self, node: Self::NodeId) -> bool;

    /// Raises the self-dirty flag of `node` so pollers notice a change.
    fn mark_dirty(&mut self, node: Self::NodeId);

    /// Checks `node` with its subtree for changes and clones it if needed.
    ///
    /// The dirty verdict reports whether the subtree changed since the host
    /// last cleared its dirty state. A clean subtree is only cloned when
    /// `force` is set. The clone's root is coerced into spline form.
    fn clone_as_spline(&self, node: Self::NodeId, force: bool) -> HierarchyClone;

    /// Copies `node` and its subtree by value.
    fn clone_subtree(&self, node: Self::NodeId) -> Result<SceneObject, HostError>;

    /// Converts an object tree into concrete geometry.
    fn flatten(&self, object: &SceneObject) -> Result<SceneObject, HostError>;

    /// Merges the contours below a container into one spline.
    fn join(&self, container: &SceneObject) -> Result<SceneObject, HostError>;
}

impl Host for MemoryScene {
    fn object(&self, node: NodeId) -> Option<&SceneObject> {
        MemoryScene::object(self, node)
    }

    fn is_dirty(&self, node: NodeId) -> bool {
        MemoryScene::is_dirty(self, node)
    }

    fn mark_dirty(&mut self, node: NodeId) {
        MemoryScene::mark_dirty(self, node);
    }

    fn clone_as_spline(&self, node: NodeId, force: bool) -> HierarchyClone {
        if !self.contains(node) {
            return HierarchyClone {
                dirty: true,
                clone: None,
            };
        }
        let dirty = subtree_dirty(self, node);
        if !dirty && !force {
            return HierarchyClone { dirty, clone: None };
        }

        let clone = self.detach(node).map(|mut clone| {
            if let ObjectKind::Primitive(primitive) = &clone.kind {
                clone.kind = ObjectKind::Spline(primitive.resolve());
            }
            clone
        });
        HierarchyClone { dirty, clone }
    }

    fn clone_subtree(&self, node: NodeId) -> Result<SceneObject, HostError> {
        self.detach(node).ok_or(HostError::NodeNotFound)
    }

    fn flatten(&self, object: &SceneObject) -> Result<SceneObject, HostError> {
        Ok(flatten_object(object))
    }

    fn join(&self, container: &SceneObject) -> Result<SceneObject, HostError> {
        join_contours(container)
    }
}

/// Returns true if `root` or any of its descendants is self-dirty.
fn subtree_dirty(scene: &MemoryScene, root: NodeId) -> bool {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if scene.is_dirty(node) {
            return true;
        }
        stack.extend(scene.children(node));
    }
    false
}

/// Resolves primitives and reduces objects without geometry to containers.
pub fn flatten_object(object: &SceneObject) -> SceneObject {
    let kind = match &object.kind {
        ObjectKind::Primitive(primitive) => ObjectKind::Spline(primitive.resolve()),
        ObjectKind::Spline(spline) => ObjectKind::Spline(spline.clone()),
        ObjectKind::Mesh { points } => ObjectKind::Mesh {
            points: points.clone(),
        },
        ObjectKind::Deformer { .. } | ObjectKind::Null => ObjectKind::Null,
    };
    SceneObject {
        name: object.name.clone(),
        transform: object.transform,
        tags: object.tags.clone(),
        kind,
        children: object.children.iter().map(flatten_object).collect(),
    }
}

/// Concatenates every spline below `container`, in the container's space.
///
/// Contours are visited depth-first in child order. The segment type and
/// sampling settings of the first contour win.
pub fn join_contours(container: &SceneObject) -> Result<SceneObject, HostError> {
    let mut joined: Option<Spline> = None;
    let mut stack: Vec<(&SceneObject, LocalTransform)> = container
        .children
        .iter()
        .rev()
        .map(|child| (child, child.transform))
        .collect();

    while let Some((object, to_container)) = stack.pop() {
        if let Some(spline) = object.real_spline() {
            let (points, tangents) =
                offset_points(&to_container, spline.points(), spline.tangents(), 0.0)
                    .map_err(|e| HostError::JoinFailed(e.to_string()))?;
            let part = Spline::with_tangents(spline.spline_type(), points, tangents)
                .map_err(|e| HostError::JoinFailed(e.to_string()))?
                .with_params(spline.params);
            match joined.as_mut() {
                Some(joined) => joined.append(&part),
                None => joined = Some(part),
            }
        }
        for child in object.children.iter().rev() {
            stack.push((child, to_container.then(&child.transform)));
        }
    }

    let joined = joined.ok_or_else(|| {
        HostError::JoinFailed(format!("no contours below '{}'", container.name))
    })?;
    Ok(SceneObject {
        name: container.name.clone(),
        transform: container.transform,
        tags: container.tags.clone(),
        kind: ObjectKind::Spline(joined),
        children: Vec::new(),
    })
}
