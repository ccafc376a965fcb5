//! The offset spline generator and its result cache.
//!
//! A generator sits above a single child curve in the host hierarchy. The
//! host asks it for geometry through two entry points:
//!
//! - [`evaluate_preview`](OffsetSplineGenerator::evaluate_preview) runs on
//!   every redraw and reuses the cached result while the child subtree is
//!   unchanged.
//! - [`evaluate_contour`](OffsetSplineGenerator::evaluate_contour) runs when
//!   exact geometry is required and always recomputes from flattened input.
//!
//! [`check_dirty`](OffsetSplineGenerator::check_dirty) is the polling hook
//! that raises the host's dirty flag on the generator when the child changed
//! since the last poll.
//!
//! Neither entry point fails. Any problem yields [`SceneObject::empty`], and
//! the reason is passed to the [`EvalObserver`].

use rhizome_resin_scene::{DirtySignature, SceneObject, dirty_signature, find_active_child};

use crate::error::{HostError, OffsetError};
use crate::host::{HierarchyClone, Host};
use crate::metadata::propagate_metadata;
use crate::observer::{EntryPoint, EvalObserver, EvalStats, NoopObserver, Outcome};
use crate::op::OffsetSpline;

/// Generator that offsets its child spline along Y.
#[derive(Debug, Clone)]
pub struct OffsetSplineGenerator<O = NoopObserver> {
    op: OffsetSpline,
    cache: Option<SceneObject>,
    last_child_signature: Option<DirtySignature>,
    last_contour_signature: Option<DirtySignature>,
    stats: EvalStats,
    observer: O,
}

impl Default for OffsetSplineGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OffsetSplineGenerator {
    /// Creates a generator with the default offset and an empty cache.
    pub fn new() -> Self {
        Self::from_op(OffsetSpline::default())
    }

    /// Creates a generator from a persisted configuration.
    pub fn from_op(op: OffsetSpline) -> Self {
        Self {
            op,
            cache: None,
            last_child_signature: None,
            last_contour_signature: None,
            stats: EvalStats::default(),
            observer: NoopObserver,
        }
    }
}

impl<O: EvalObserver> OffsetSplineGenerator<O> {
    /// Replaces the observer, builder style.
    pub fn with_observer<P: EvalObserver>(self, observer: P) -> OffsetSplineGenerator<P> {
        OffsetSplineGenerator {
            op: self.op,
            cache: self.cache,
            last_child_signature: self.last_child_signature,
            last_contour_signature: self.last_contour_signature,
            stats: self.stats,
            observer,
        }
    }

    /// Sets the offset, builder style.
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.set_offset(offset);
        self
    }

    /// Returns the configuration.
    pub fn op(&self) -> &OffsetSpline {
        &self.op
    }

    /// Returns the offset distance.
    pub fn offset(&self) -> f32 {
        self.op.offset
    }

    /// Sets the offset distance. A different value drops the cached result.
    pub fn set_offset(&mut self, offset: f32) {
        if self.op.offset != offset {
            self.op.offset = offset;
            self.cache = None;
        }
    }

    /// Signature of the child subtree at the last preview recompute.
    pub fn last_child_signature(&self) -> Option<DirtySignature> {
        self.last_child_signature
    }

    /// Signature of the child subtree at the last dirty poll.
    pub fn last_contour_signature(&self) -> Option<DirtySignature> {
        self.last_contour_signature
    }

    /// The cached preview result.
    pub fn cached(&self) -> Option<&SceneObject> {
        self.cache.as_ref()
    }

    /// Evaluation counters.
    pub fn stats(&self) -> EvalStats {
        self.stats
    }

    /// The installed observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutable access to the installed observer.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Live preview evaluation of the generator at `node`.
    ///
    /// Returns a copy of the cached result when the host reports no change,
    /// the generator itself is not dirty and the child signature matches the
    /// one recorded at the last recompute. Otherwise rebuilds and caches.
    pub fn evaluate_preview<H: Host>(&mut self, host: &H, node: H::NodeId) -> SceneObject {
        self.observer.before_eval(EntryPoint::Preview);
        let (result, outcome) = match self.preview(host, node) {
            Ok(done) => done,
            Err(err) => (self.empty(&err), Outcome::Empty(err)),
        };
        self.finish(EntryPoint::Preview, outcome);
        result
    }

    /// Contour evaluation of the generator at `node`.
    ///
    /// Flattens a copy of the child to concrete geometry, joining the parts
    /// if the flattened root has no geometry of its own. Never cached.
    pub fn evaluate_contour<H: Host>(&mut self, host: &H, node: H::NodeId) -> SceneObject {
        self.observer.before_eval(EntryPoint::Contour);
        let (result, outcome) = match self.contour(host, node) {
            Ok(result) => (result, Outcome::Recomputed),
            Err(err) => (self.empty(&err), Outcome::Empty(err)),
        };
        self.finish(EntryPoint::Contour, outcome);
        result
    }

    /// Raises the host dirty flag on `node` if the child subtree changed
    /// since the previous poll.
    pub fn check_dirty<H: Host>(&mut self, host: &mut H, node: H::NodeId) {
        let Some(child) = find_active_child(&*host, node) else {
            self.last_contour_signature = None;
            return;
        };
        let signature = dirty_signature(&*host, child);
        if self.last_contour_signature != Some(signature) {
            log::debug!(
                "child {child:?} signature changed ({:?} -> {signature}), marking {node:?} dirty",
                self.last_contour_signature.map(DirtySignature::value),
            );
            self.last_contour_signature = Some(signature);
            host.mark_dirty(node);
        }
    }

    fn preview<H: Host>(
        &mut self,
        host: &H,
        node: H::NodeId,
    ) -> Result<(SceneObject, Outcome), OffsetError> {
        let child = self.active_child(host, node)?;
        // Read before cloning; the clone may report a different state.
        let closed = host
            .object(child)
            .ok_or(HostError::NodeNotFound)?
            .is_closed();

        let signature = dirty_signature(host, child);
        let locally_dirty = host.is_dirty(node)
            || self.last_child_signature != Some(signature)
            || self.cache.is_none();
        // The host only builds a clone if its own verdict or ours needs one.
        let HierarchyClone {
            dirty: host_dirty,
            clone,
        } = host.clone_as_spline(child, locally_dirty);
        let dirty = host_dirty || locally_dirty;

        if !dirty {
            if let Some(cached) = &self.cache {
                log::trace!("reusing cached offset spline for {node:?}");
                return Ok((cached.clone(), Outcome::Reused));
            }
        }

        let clone = clone.ok_or(OffsetError::MissingClone)?;
        let mut result = self.op.apply(&clone)?;
        propagate_metadata(&clone, &mut result, closed);

        log::debug!(
            "recomputed offset spline for {node:?} (signature {signature}, offset {})",
            self.op.offset
        );
        self.cache = Some(result.clone());
        self.last_child_signature = Some(signature);
        Ok((result, Outcome::Recomputed))
    }

    fn contour<H: Host>(&mut self, host: &H, node: H::NodeId) -> Result<SceneObject, OffsetError> {
        let child = self.active_child(host, node)?;
        let closed = host
            .object(child)
            .ok_or(HostError::NodeNotFound)?
            .is_closed();

        let copy = host.clone_subtree(child)?;
        let mut flat = host.flatten(&copy)?;
        if !flat.has_geometry() {
            flat = host.join(&flat)?;
        }

        let mut result = self.op.apply(&flat)?;
        propagate_metadata(&flat, &mut result, closed);
        log::debug!("built offset contour for {node:?}");
        Ok(result)
    }

    /// Finds the active child, forgetting both signatures if there is none.
    fn active_child<H: Host>(&mut self, host: &H, node: H::NodeId) -> Result<H::NodeId, OffsetError> {
        find_active_child(host, node).ok_or_else(|| {
            self.last_child_signature = None;
            self.last_contour_signature = None;
            OffsetError::NoActiveChild
        })
    }

    fn empty(&self, err: &OffsetError) -> SceneObject {
        match err {
            OffsetError::NoActiveChild => log::debug!("offset spline: {err}"),
            _ => log::warn!("offset spline: {err}"),
        }
        SceneObject::empty()
    }

    fn finish(&mut self, entry: EntryPoint, outcome: Outcome) {
        self.stats.record(entry, &outcome);
        self.observer.after_eval(entry, &outcome);
    }
}

impl From<OffsetSpline> for OffsetSplineGenerator {
    fn from(op: OffsetSpline) -> Self {
        Self::from_op(op)
    }
}
