//! Read-only hierarchy traversal.
//!
//! Generators never own the objects below them. They see the live hierarchy
//! through [`SceneGraph`], a first-child/next-sibling view with a per-node
//! change counter. Both traversals here are iterative and never mutate the
//! graph; the hierarchy is assumed acyclic.

use std::fmt;

/// Read-only view of a first-child/next-sibling hierarchy.
pub trait SceneGraph {
    /// Node handle.
    type NodeId: Copy + Eq + fmt::Debug;

    /// Returns the first child of `node`.
    fn first_child(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// Returns the sibling following `node`.
    fn next_sibling(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// Returns the node's change counter, bumped by the host on every edit.
    fn dirty_count(&self, node: Self::NodeId) -> u64;

    /// Returns true if `node` deforms geometry and does not pass its input through.
    fn is_deforming_modifier(&self, node: Self::NodeId) -> bool;

    /// Returns true if `node` actively contributes geometry a generator can consume.
    fn is_deformable(&self, node: Self::NodeId) -> bool;
}

/// Additive fingerprint of a subtree's change counters.
///
/// Equal signatures are treated as "unchanged". Different edit patterns can
/// sum to the same value; this matches the host's own lenient dirty semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirtySignature(u64);

impl DirtySignature {
    /// Wraps a raw counter sum.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw counter sum.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DirtySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Finds the child a generator below `parent` should consume.
///
/// Descends through first-child links only. A non-pass-through deforming
/// modifier on the path rejects the search; the first node reporting itself
/// as deformable is returned.
///
/// Only the returned node is reported. Callers see its local transform and
/// not those of the pass-through nodes above it; a translated group between
/// generator and spline does not move the spline.
pub fn find_active_child<G: SceneGraph + ?Sized>(
    graph: &G,
    parent: G::NodeId,
) -> Option<G::NodeId> {
    let mut current = graph.first_child(parent);
    while let Some(node) = current {
        if graph.is_deforming_modifier(node) {
            log::trace!("active child search stopped at modifier {node:?}");
            return None;
        }
        if graph.is_deformable(node) {
            return Some(node);
        }
        current = graph.first_child(node);
    }
    None
}

/// Sums the change counters of `root`, its descendants, and every following
/// sibling of `root` and of each descendant.
///
/// The sum wraps on overflow.
pub fn dirty_signature<G: SceneGraph + ?Sized>(graph: &G, root: G::NodeId) -> DirtySignature {
    let mut sum = 0u64;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        sum = sum.wrapping_add(graph.dirty_count(node));
        if let Some(sibling) = graph.next_sibling(node) {
            stack.push(sibling);
        }
        if let Some(child) = graph.first_child(node) {
            stack.push(child);
        }
    }
    DirtySignature(sum)
}
