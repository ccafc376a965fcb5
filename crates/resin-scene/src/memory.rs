//! Arena-backed live hierarchy.

use std::fmt;

use crate::error::SceneError;
use crate::graph::SceneGraph;
use crate::object::{ObjectKind, SceneObject};

/// Handle to a node in a [`MemoryScene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    /// Object data; `children` is always empty, structure lives in the links.
    object: SceneObject,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
    dirty_count: u64,
    self_dirty: bool,
    deformable: bool,
}

/// A live object hierarchy stored in an arena.
///
/// Every edit through [`object_mut`](Self::object_mut) or
/// [`touch`](Self::touch) bumps the node's change counter and raises its
/// self-dirty flag. Structural edits bump the counter of the node whose
/// child list changed.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    entries: Vec<Option<Entry>>,
    first_root: Option<NodeId>,
}

impl MemoryScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Returns true if the scene has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_some()
    }

    /// Adds a top-level object (and its children) after the existing roots.
    pub fn add_root(&mut self, object: SceneObject) -> NodeId {
        let id = self.insert_tree(None, object);
        match self.last_of(self.first_root) {
            Some(last) => self.link_after(last, id),
            None => self.first_root = Some(id),
        }
        id
    }

    /// Adds an object (and its children) as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, object: SceneObject) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = self.insert_tree(Some(parent), object);
        self.append_child(parent, id);
        self.bump(parent);
        Ok(id)
    }

    /// Removes `id` and its whole subtree.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<(), SceneError> {
        let parent = self
            .entry(id)
            .ok_or(SceneError::NodeNotFound(id))?
            .parent;
        self.unlink(id, parent);
        if let Some(parent) = parent {
            self.bump(parent);
        }

        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if let Some(entry) = self.entries[node.index()].take() {
                stack.extend(self.collect_children(entry.first_child));
            }
        }
        Ok(())
    }

    /// Returns the object stored at `id`, without its children.
    pub fn object(&self, id: NodeId) -> Option<&SceneObject> {
        self.entry(id).map(|e| &e.object)
    }

    /// Returns mutable access to the object at `id` and records an edit.
    pub fn object_mut(&mut self, id: NodeId) -> Option<&mut SceneObject> {
        self.bump(id);
        self.entry_mut(id).map(|e| &mut e.object)
    }

    /// Records an edit on `id` without changing it.
    pub fn touch(&mut self, id: NodeId) {
        self.bump(id);
    }

    /// Returns the parent of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).and_then(|e| e.parent)
    }

    /// Returns the children of `id` in order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.collect_children(self.entry(id).and_then(|e| e.first_child))
    }

    /// Overrides whether `id` reports itself as contributing geometry.
    pub fn set_deformable(&mut self, id: NodeId, deformable: bool) {
        if let Some(entry) = self.entry_mut(id) {
            entry.deformable = deformable;
        }
    }

    /// Returns the self-dirty flag of `id`.
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.entry(id).is_some_and(|e| e.self_dirty)
    }

    /// Raises the self-dirty flag of `id`.
    pub fn mark_dirty(&mut self, id: NodeId) {
        if let Some(entry) = self.entry_mut(id) {
            entry.self_dirty = true;
        }
    }

    /// Clears the self-dirty flag of every node, as the host does after a redraw.
    pub fn clear_dirty(&mut self) {
        for entry in self.entries.iter_mut().flatten() {
            entry.self_dirty = false;
        }
    }

    /// Copies `id` and its descendants into a detached [`SceneObject`] tree.
    pub fn detach(&self, id: NodeId) -> Option<SceneObject> {
        let entry = self.entry(id)?;
        let mut object = entry.object.clone();
        object.children = self
            .collect_children(entry.first_child)
            .into_iter()
            .filter_map(|child| self.detach(child))
            .collect();
        Some(object)
    }

    fn entry(&self, id: NodeId) -> Option<&Entry> {
        self.entries.get(id.index()).and_then(Option::as_ref)
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry> {
        self.entries.get_mut(id.index()).and_then(Option::as_mut)
    }

    fn bump(&mut self, id: NodeId) {
        if let Some(entry) = self.entry_mut(id) {
            entry.dirty_count = entry.dirty_count.wrapping_add(1);
            entry.self_dirty = true;
        }
    }

    /// Inserts `object` and its children; links children but not `object` itself.
    fn insert_tree(&mut self, parent: Option<NodeId>, mut object: SceneObject) -> NodeId {
        let children = std::mem::take(&mut object.children);
        let deformable = object.has_geometry();
        let id = NodeId(self.entries.len());
        self.entries.push(Some(Entry {
            object,
            parent,
            first_child: None,
            next_sibling: None,
            dirty_count: 1,
            self_dirty: true,
            deformable,
        }));
        for child in children {
            let child_id = self.insert_tree(Some(id), child);
            self.append_child(id, child_id);
        }
        id
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let first = self.entry(parent).and_then(|e| e.first_child);
        match self.last_of(first) {
            Some(last) => self.link_after(last, child),
            None => {
                if let Some(entry) = self.entry_mut(parent) {
                    entry.first_child = Some(child);
                }
            }
        }
    }

    fn link_after(&mut self, node: NodeId, next: NodeId) {
        if let Some(entry) = self.entry_mut(node) {
            entry.next_sibling = Some(next);
        }
    }

    fn unlink(&mut self, id: NodeId, parent: Option<NodeId>) {
        let next = self.entry(id).and_then(|e| e.next_sibling);
        let first = match parent {
            Some(parent) => self.entry(parent).and_then(|e| e.first_child),
            None => self.first_root,
        };

        if first == Some(id) {
            match parent {
                Some(parent) => {
                    if let Some(entry) = self.entry_mut(parent) {
                        entry.first_child = next;
                    }
                }
                None => self.first_root = next,
            }
            return;
        }

        let mut current = first;
        while let Some(node) = current {
            let following = self.entry(node).and_then(|e| e.next_sibling);
            if following == Some(id) {
                if let Some(entry) = self.entry_mut(node) {
                    entry.next_sibling = next;
                }
                return;
            }
            current = following;
        }
    }

    fn last_of(&self, first: Option<NodeId>) -> Option<NodeId> {
        let mut current = first?;
        while let Some(next) = self.entry(current).and_then(|e| e.next_sibling) {
            current = next;
        }
        Some(current)
    }

    fn collect_children(&self, first: Option<NodeId>) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = first;
        while let Some(node) = current {
            out.push(node);
            current = self.entry(node).and_then(|e| e.next_sibling);
        }
        out
    }
}

impl SceneGraph for MemoryScene {
    type NodeId = NodeId;

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).and_then(|e| e.first_child)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).and_then(|e| e.next_sibling)
    }

    fn dirty_count(&self, node: NodeId) -> u64 {
        self.entry(node).map_or(0, |e| e.dirty_count)
    }

    fn is_deforming_modifier(&self, node: NodeId) -> bool {
        self.entry(node).is_some_and(|e| {
            matches!(
                e.object.kind,
                ObjectKind::Deformer {
                    pass_through: false
                }
            )
        })
    }

    fn is_deformable(&self, node: NodeId) -> bool {
        self.entry(node).is_some_and(|e| e.deformable)
    }
}
