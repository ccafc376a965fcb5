use std::cell::Cell;

use glam::{Quat, Vec3};
use rhizome_resin_scene::{
    MemoryScene, NodeId, ObjectKind, SceneGraph, SceneObject, Tag, dirty_signature,
};
use rhizome_resin_spline::{
    Interpolation, PrimitiveSpline, Spline, SplineParams, SplineType, Tangent,
};
use rhizome_resin_spline_offset::{
    EntryPoint, EvalObserver, HierarchyClone, Host, HostError, OffsetError,
    OffsetSplineGenerator, Outcome,
};
use rhizome_resin_transform::{LocalTransform, SpatialTransform};

/// In-memory host with switchable misbehavior.
#[derive(Default)]
struct TestHost {
    scene: MemoryScene,
    /// Flatten and clone report every spline as open.
    reopen: bool,
    /// Hierarchy clones come back without an object.
    drop_clone: bool,
    /// Flatten fails outright.
    fail_flatten: bool,
    /// Number of hierarchy clones handed out.
    clones: Cell<usize>,
}

impl SceneGraph for TestHost {
    type NodeId = NodeId;

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.scene.first_child(node)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.scene.next_sibling(node)
    }

    fn dirty_count(&self, node: NodeId) -> u64 {
        self.scene.dirty_count(node)
    }

    fn is_deforming_modifier(&self, node: NodeId) -> bool {
        self.scene.is_deforming_modifier(node)
    }

    fn is_deformable(&self, node: NodeId) -> bool {
        self.scene.is_deformable(node)
    }
}

impl Host for TestHost {
    fn object(&self, node: NodeId) -> Option<&SceneObject> {
        self.scene.object(node)
    }

    fn is_dirty(&self, node: NodeId) -> bool {
        self.scene.is_dirty(node)
    }

    fn mark_dirty(&mut self, node: NodeId) {
        self.scene.mark_dirty(node);
    }

    fn clone_as_spline(&self, node: NodeId, force: bool) -> HierarchyClone {
        let mut result = self.scene.clone_as_spline(node, force);
        if result.clone.is_some() {
            self.clones.set(self.clones.get() + 1);
        }
        if self.drop_clone {
            result.clone = None;
        }
        if self.reopen {
            if let Some(spline) = result.clone.as_mut().and_then(SceneObject::as_spline_mut) {
                spline.set_closed(false);
            }
        }
        result
    }

    fn clone_subtree(&self, node: NodeId) -> Result<SceneObject, HostError> {
        self.scene.clone_subtree(node)
    }

    fn flatten(&self, object: &SceneObject) -> Result<SceneObject, HostError> {
        if self.fail_flatten {
            return Err(HostError::FlattenFailed("refused".into()));
        }
        let mut flat = self.scene.flatten(object)?;
        if self.reopen {
            if let Some(spline) = flat.as_spline_mut() {
                spline.set_closed(false);
            }
        }
        Ok(flat)
    }

    fn join(&self, container: &SceneObject) -> Result<SceneObject, HostError> {
        self.scene.join(container)
    }
}

fn square_points() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, 1.0),
    ]
}

fn square_tangents() -> Vec<Tangent> {
    vec![
        Tangent::smooth(Vec3::new(0.3, 0.0, 0.0)),
        Tangent::smooth(Vec3::new(0.0, 0.0, 0.3)),
        Tangent::smooth(Vec3::new(-0.3, 0.0, 0.0)),
        Tangent::smooth(Vec3::new(0.0, 0.0, -0.3)),
    ]
}

fn bezier_square() -> SceneObject {
    SceneObject::spline(
        "square",
        Spline::with_tangents(SplineType::Bezier, square_points(), square_tangents())
            .unwrap()
            .closed(true),
    )
}

/// Generator node with `child` below it.
fn host_with(child: SceneObject) -> (TestHost, NodeId, NodeId) {
    let mut host = TestHost::default();
    let node = host.scene.add_root(SceneObject::null("offset"));
    let child = host.scene.add_child(node, child).unwrap();
    (host, node, child)
}

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

#[test]
fn test_square_lifts_to_offset() {
    let (host, node, _) = host_with(bezier_square());
    let mut generator = OffsetSplineGenerator::new();

    let result = generator.evaluate_preview(&host, node);
    let spline = result.as_spline().unwrap();

    assert_eq!(spline.point_count(), 4);
    for (out, src) in spline.points().iter().zip(square_points()) {
        assert_eq!(out.y, 100.0);
        assert_eq!(out.x, src.x);
        assert_eq!(out.z, src.z);
    }
    assert_eq!(spline.tangents(), square_tangents().as_slice());
    assert!(spline.is_closed());
}

#[test]
fn test_transform_applies_before_offset() {
    let child = bezier_square().with_transform(LocalTransform::from_scale_rotation_translation(
        Vec3::ONE,
        Quat::from_rotation_y(0.5),
        Vec3::new(5.0, 5.0, 5.0),
    ));
    let transform = child.transform;
    let (host, node, _) = host_with(child);

    let result = OffsetSplineGenerator::new()
        .with_offset(10.0)
        .evaluate_preview(&host, node);
    let spline = result.as_spline().unwrap();

    for (out, src) in spline.points().iter().zip(square_points()) {
        assert!(approx(*out, transform.transform_point(src) + Vec3::new(0.0, 10.0, 0.0)));
    }
    for (out, src) in spline.tangents().iter().zip(square_tangents()) {
        assert!(approx(out.right, transform.transform_vector(src.right)));
        assert!(approx(out.left, transform.transform_vector(src.left)));
    }
}

#[test]
fn test_offset_never_changes_tangents() {
    let child = bezier_square().with_transform(LocalTransform::from_scale_rotation_translation(
        Vec3::splat(3.0),
        Quat::from_rotation_x(1.2),
        Vec3::new(-4.0, 2.0, 9.0),
    ));
    let (host, node, _) = host_with(child);
    let mut generator = OffsetSplineGenerator::new();

    let mut seen = Vec::new();
    for offset in [0.0, 100.0, -37.5, 1.0e4] {
        generator.set_offset(offset);
        let result = generator.evaluate_contour(&host, node);
        seen.push(result.as_spline().unwrap().tangents().to_vec());
    }
    assert!(seen.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn test_zero_tangents_stay_zero() {
    let line = SceneObject::spline(
        "line",
        Spline::new(SplineType::Akima, vec![Vec3::ZERO, Vec3::X, Vec3::Z]),
    );
    let (host, node, _) = host_with(line);
    let mut generator = OffsetSplineGenerator::new();

    let preview = generator.evaluate_preview(&host, node);
    let contour = generator.evaluate_contour(&host, node);
    for result in [preview, contour] {
        let spline = result.as_spline().unwrap();
        assert_eq!(spline.point_count(), 3);
        assert_eq!(spline.tangent_count(), 0);
    }
}

#[test]
fn test_unchanged_subtree_reuses_cache() {
    let (mut host, node, child) = host_with(bezier_square());
    let mut generator = OffsetSplineGenerator::new();

    let first = generator.evaluate_preview(&host, node);
    let signature = dirty_signature(&host, child);
    host.scene.clear_dirty();

    let second = generator.evaluate_preview(&host, node);
    let third = generator.evaluate_preview(&host, node);

    assert_eq!(dirty_signature(&host, child), signature);
    assert_eq!(second.as_spline().unwrap().points(), first.as_spline().unwrap().points());
    assert_eq!(third, first);
    assert_eq!(generator.stats().recomputed, 1);
    assert_eq!(generator.stats().reused, 2);
}

#[test]
fn test_reuse_does_not_clone_child() {
    let (mut host, node, _) = host_with(SceneObject::primitive(
        "polygon",
        PrimitiveSpline::polygon(10.0, 10_000),
    ));
    let mut generator = OffsetSplineGenerator::new();

    generator.evaluate_preview(&host, node);
    assert_eq!(host.clones.get(), 1);
    host.scene.clear_dirty();

    for _ in 0..3 {
        let result = generator.evaluate_preview(&host, node);
        assert_eq!(result.as_spline().unwrap().point_count(), 10_000);
    }
    assert_eq!(generator.stats().reused, 3);
    assert_eq!(host.clones.get(), 1);

    // A dropped cache asks for a clone even though the scene is clean.
    generator.set_offset(1.0);
    generator.evaluate_preview(&host, node);
    assert_eq!(host.clones.get(), 2);
    assert_eq!(generator.stats().recomputed, 2);
}

#[test]
fn test_returned_copy_is_independent_of_cache() {
    let (mut host, node, _) = host_with(bezier_square());
    let mut generator = OffsetSplineGenerator::new();

    let mut first = generator.evaluate_preview(&host, node);
    host.scene.clear_dirty();
    first.as_spline_mut().unwrap().points_mut()[0] = Vec3::splat(-1.0);

    let second = generator.evaluate_preview(&host, node);
    assert_eq!(second.as_spline().unwrap().points()[0], Vec3::new(0.0, 100.0, 0.0));
}

#[test]
fn test_descendant_edit_forces_recompute() {
    let (mut host, node, child) = host_with(bezier_square());
    let grandchild = host
        .scene
        .add_child(child, SceneObject::null("helper"))
        .unwrap();
    let mut generator = OffsetSplineGenerator::new();

    generator.evaluate_preview(&host, node);
    let before = generator.last_child_signature();
    host.scene.clear_dirty();

    // Only the counter moves; every self-dirty flag is cleared again.
    host.scene.touch(grandchild);
    host.scene.clear_dirty();

    generator.evaluate_preview(&host, node);
    assert_ne!(generator.last_child_signature(), before);
    assert_eq!(generator.stats().recomputed, 2);
    assert_eq!(generator.stats().reused, 0);
}

#[test]
fn test_edit_shows_up_in_result() {
    let (mut host, node, child) = host_with(bezier_square());
    let mut generator = OffsetSplineGenerator::new();
    generator.evaluate_preview(&host, node);
    host.scene.clear_dirty();

    if let Some(spline) = host.scene.object_mut(child).and_then(SceneObject::as_spline_mut) {
        spline.points_mut()[0] = Vec3::new(0.0, 7.0, 0.0);
    }
    let result = generator.evaluate_preview(&host, node);
    assert_eq!(result.as_spline().unwrap().points()[0], Vec3::new(0.0, 107.0, 0.0));
}

#[test]
fn test_missing_child_resets_signatures() {
    let (mut host, node, child) = host_with(bezier_square());
    let mut generator = OffsetSplineGenerator::new();
    generator.evaluate_preview(&host, node);
    generator.check_dirty(&mut host, node);
    assert!(generator.last_child_signature().is_some());
    assert!(generator.last_contour_signature().is_some());

    host.scene.remove_subtree(child).unwrap();

    assert!(generator.evaluate_preview(&host, node).is_empty());
    assert_eq!(generator.last_child_signature(), None);
    assert_eq!(generator.last_contour_signature(), None);

    generator.check_dirty(&mut host, node);
    assert!(generator.evaluate_contour(&host, node).is_empty());
    assert_eq!(generator.last_child_signature(), None);
    assert_eq!(generator.last_contour_signature(), None);
    assert_eq!(generator.stats().empty, 2);
}

#[test]
fn test_closed_snapshot_survives_flatten() {
    let (mut host, node, _) = host_with(bezier_square());
    host.reopen = true;
    let mut generator = OffsetSplineGenerator::new();

    let contour = generator.evaluate_contour(&host, node);
    assert!(contour.as_spline().unwrap().is_closed());

    let preview = generator.evaluate_preview(&host, node);
    assert!(preview.as_spline().unwrap().is_closed());
}

#[test]
fn test_metadata_reaches_result() {
    let params = SplineParams {
        interpolation: Interpolation::Uniform,
        subdivisions: 2,
        angle: 0.1,
        max_segment_length: 3.0,
    };
    let child = SceneObject::spline(
        "tagged",
        Spline::new(SplineType::Cubic, square_points())
            .closed(true)
            .with_params(params),
    )
    .with_tag(Tag::Display { color: Vec3::Y })
    .with_tag(Tag::Annotation("keep".into()));
    let tags = child.tags.clone();
    let (host, node, _) = host_with(child);

    let result = OffsetSplineGenerator::new().evaluate_preview(&host, node);
    let spline = result.as_spline().unwrap();
    assert_eq!(spline.params, params);
    assert_eq!(spline.spline_type(), SplineType::Cubic);
    assert!(spline.is_closed());
    assert_eq!(result.tags, tags);
}

#[test]
fn test_blocking_modifier_hides_child() {
    let deformer = SceneObject::new(
        "bend",
        ObjectKind::Deformer {
            pass_through: false,
        },
    )
    .with_child(bezier_square());
    let (host, node, _) = host_with(deformer);
    let mut generator = OffsetSplineGenerator::new();

    assert!(generator.evaluate_preview(&host, node).is_empty());
}

#[test]
fn test_pass_through_modifier_is_descended() {
    let deformer = SceneObject::new("twist", ObjectKind::Deformer { pass_through: true })
        .with_child(bezier_square());
    let (host, node, _) = host_with(deformer);
    let mut generator = OffsetSplineGenerator::new();

    let result = generator.evaluate_preview(&host, node);
    assert_eq!(result.name, "square");
}

#[test]
fn test_intermediate_transforms_are_not_composed() {
    let group = SceneObject::new("twist", ObjectKind::Deformer { pass_through: true })
        .with_transform(LocalTransform::from_translation(Vec3::new(0.0, 50.0, 7.0)))
        .with_child(bezier_square());
    let (host, node, _) = host_with(group);
    let mut generator = OffsetSplineGenerator::new();

    // Only the spline's own transform applies, in both paths.
    let preview = generator.evaluate_preview(&host, node);
    let contour = generator.evaluate_contour(&host, node);
    for result in [preview, contour] {
        let spline = result.as_spline().unwrap();
        assert_eq!(spline.points()[2], Vec3::new(1.0, 100.0, 1.0));
    }
}

#[test]
fn test_missing_clone_keeps_previous_state() {
    let (mut host, node, _) = host_with(bezier_square());
    let mut generator = OffsetSplineGenerator::new();
    let good = generator.evaluate_preview(&host, node);
    let signature = generator.last_child_signature();

    host.drop_clone = true;
    host.scene.mark_dirty(node);
    assert!(generator.evaluate_preview(&host, node).is_empty());
    assert_eq!(generator.cached(), Some(&good));
    assert_eq!(generator.last_child_signature(), signature);

    // Unchanged subtree: the cache answers without needing a clone.
    host.scene.clear_dirty();
    assert_eq!(generator.evaluate_preview(&host, node), good);
}

#[test]
fn test_flatten_failure_is_empty() {
    let (mut host, node, _) = host_with(bezier_square());
    host.fail_flatten = true;
    let mut generator = OffsetSplineGenerator::new();

    assert!(generator.evaluate_contour(&host, node).is_empty());
    assert_eq!(generator.stats().empty, 1);
}

#[derive(Default)]
struct Recorder {
    events: Vec<(EntryPoint, Option<Outcome>)>,
}

impl EvalObserver for Recorder {
    fn before_eval(&mut self, entry: EntryPoint) {
        self.events.push((entry, None));
    }

    fn after_eval(&mut self, entry: EntryPoint, outcome: &Outcome) {
        self.events.push((entry, Some(outcome.clone())));
    }
}

#[test]
fn test_observer_sees_every_evaluation() {
    let (mut host, node, child) = host_with(bezier_square());
    let mut generator = OffsetSplineGenerator::new().with_observer(Recorder::default());

    generator.evaluate_preview(&host, node);
    host.scene.clear_dirty();
    generator.evaluate_preview(&host, node);
    host.scene.remove_subtree(child).unwrap();
    generator.evaluate_contour(&host, node);

    assert_eq!(
        generator.observer().events,
        vec![
            (EntryPoint::Preview, None),
            (EntryPoint::Preview, Some(Outcome::Recomputed)),
            (EntryPoint::Preview, None),
            (EntryPoint::Preview, Some(Outcome::Reused)),
            (EntryPoint::Contour, None),
            (
                EntryPoint::Contour,
                Some(Outcome::Empty(OffsetError::NoActiveChild))
            ),
        ]
    );
}
