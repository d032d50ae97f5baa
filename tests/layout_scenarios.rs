//! Layout, context and clip scenarios through the public API, plus
//! property-based invariants on the geometry/constraint layer.

use paintbox::geometry::{rotated_corners, rotated_envelope};
use paintbox::prelude::*;
use proptest::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn layout_result_respects_min_max_envelope() {
    init_logging();
    let mut scene = Scene::new();
    let id = scene.insert(
        Node::new()
            .width(Dimension::Fill)
            .min_height_px(20.0)
            .max_width_px(200.0),
    );
    scene.layout(id, Constraint::loose(800.0, 600.0), false).unwrap();

    // Fill asks for 800 but the node's own max narrows it; the auto
    // height clamps up to the node's own min.
    let size = scene.resolved_size(id).unwrap();
    assert_eq!(size, Size::new(200.0, 20.0));
}

#[test]
fn quarter_turn_swaps_bounding_extents() {
    let mut scene = Scene::new();
    let id = scene.insert(Node::new().width(100.0).height(50.0).rotate(90.0));
    let bounds = scene.layout(id, Constraint::loose(800.0, 600.0), false).unwrap();
    assert!((bounds.width - 50.0).abs() < 1e-3);
    assert!((bounds.height - 100.0).abs() < 1e-3);
}

#[test]
fn translate_accumulates_root_to_node_skipping_zeros() {
    let mut scene = Scene::new();
    let a = scene.insert(Node::new().translate(10.0, 1.0));
    let b = scene.insert(Node::new()); // zero delta, must not drift
    let c = scene.insert(Node::new().translate(2.5, 0.0));
    scene.link(b, a);
    scene.link(c, b);

    scene.refresh_context(a);
    let ctx = *scene.node(c).unwrap().cached_context();
    assert_eq!(ctx.translate_x, 12.5);
    assert_eq!(ctx.translate_y, 1.0);
}

/// An overflow-hidden parent with a rotated, oversized child establishes
/// its rounded-rect clip before any of the child's paint, inside the
/// parent's save/restore scope.
#[test]
fn rotated_child_is_clipped_by_parent_region() {
    init_logging();
    let canvas = SharedRecordingCanvas::new();
    let mut root = Root::new(RootConfig::default(), Box::new(canvas.clone()));
    let root_id = root.root_id();

    let frame = root.insert_node(
        Node::new()
            .width(100.0)
            .height(100.0)
            .radius(12.0)
            .overflow(Overflow::Hidden),
    );
    let blade = root.insert_node(
        Node::new()
            .width(300.0)
            .height(40.0)
            .rotate(45.0)
            .background(Color::WHITE),
    );
    root.append_child(root_id, frame).unwrap();
    root.append_child(frame, blade).unwrap();

    canvas.clear_ops();
    root.render().unwrap();
    let ops = canvas.ops();

    let clip_index = ops
        .iter()
        .position(|op| {
            matches!(op, CanvasOp::ClipRoundRect { rect, radius }
                if rect.width == 100.0 && radius.top_left == 12.0)
        })
        .expect("parent clip established");
    let child_fill_index = ops
        .iter()
        .position(|op| {
            matches!(op, CanvasOp::FillRoundRect { rect, .. } if rect.width == 300.0)
        })
        .expect("child painted");
    assert!(clip_index < child_fill_index);

    // The clip lives in the parent's scope: its save precedes the clip
    // and the matching restore comes after the child's paint.
    let restore_after = ops[child_fill_index..]
        .iter()
        .any(|op| matches!(op, CanvasOp::Restore));
    assert!(restore_after);
}

#[test]
fn lookup_miss_is_absent_not_failure() {
    let mut root = Root::new(
        RootConfig::default(),
        Box::new(RecordingCanvas::new()),
    );
    assert_eq!(root.node_by_key("nobody"), None);

    let id = root.insert_node(Node::new().key_name("somebody"));
    let root_id = root.root_id();
    root.append_child(root_id, id).unwrap();
    assert_eq!(root.node_by_key("somebody"), Some(id));
}

proptest! {
    /// `resolve` always lands in the envelope and is idempotent.
    #[test]
    fn resolve_is_clamping_and_idempotent(
        min_w in 0.0f32..200.0,
        extra_w in 0.0f32..400.0,
        min_h in 0.0f32..200.0,
        extra_h in 0.0f32..400.0,
        cand_w in -100.0f32..1000.0,
        cand_h in -100.0f32..1000.0,
    ) {
        let constraint = Constraint::new(min_w, min_h, min_w + extra_w, min_h + extra_h);
        let resolved = constraint.resolve(Size::new(cand_w, cand_h));
        prop_assert!(resolved.width >= constraint.min_width);
        prop_assert!(resolved.width <= constraint.max_width);
        prop_assert!(resolved.height >= constraint.min_height);
        prop_assert!(resolved.height <= constraint.max_height);
        prop_assert_eq!(constraint.resolve(resolved), resolved);
    }

    /// The rotated envelope contains every rotated corner.
    #[test]
    fn envelope_covers_rotated_corners(
        x in -200.0f32..200.0,
        y in -200.0f32..200.0,
        width in 1.0f32..300.0,
        height in 1.0f32..300.0,
        degrees in -360.0f32..360.0,
    ) {
        let rect = Rect::new(x, y, width, height);
        let pivot = rect.center();
        let envelope = rotated_envelope(rect, pivot, degrees);
        for corner in rotated_corners(rect, pivot, degrees) {
            // Tolerate float slop at the envelope edge.
            prop_assert!(corner.x >= envelope.x - 1e-3);
            prop_assert!(corner.x <= envelope.x + envelope.width + 1e-3);
            prop_assert!(corner.y >= envelope.y - 1e-3);
            prop_assert!(corner.y <= envelope.y + envelope.height + 1e-3);
        }
    }

    /// The box center hits under any rotation: the default pivot is the
    /// center, which maps to itself.
    #[test]
    fn box_center_hits_for_every_rotation(degrees in -360.0f32..360.0) {
        let mut scene = Scene::new();
        let id = scene.insert(
            Node::new().at(10.0, 10.0).width(100.0).height(50.0).rotate(degrees),
        );
        scene.layout(id, Constraint::loose(800.0, 600.0), false).unwrap();
        scene.refresh_context(id);
        prop_assert!(scene.contains_point(id, 60.0, 35.0).unwrap());
    }

    /// Layout output always lands inside the node's effective envelope —
    /// the incoming constraint extended by the node's own dimensions.
    #[test]
    fn layout_stays_in_effective_envelope(
        req_w in 0.0f32..900.0,
        req_h in 0.0f32..900.0,
        max_w in 50.0f32..800.0,
        max_h in 50.0f32..800.0,
    ) {
        let mut scene = Scene::new();
        let id = scene.insert(Node::new().width(req_w).height(req_h));
        let effective = Constraint::loose(max_w, max_h)
            .extend(scene.node(id).unwrap());
        scene.layout(id, Constraint::loose(max_w, max_h), false).unwrap();
        let size = scene.resolved_size(id).unwrap();
        prop_assert!(size.width <= effective.max_width);
        prop_assert!(size.height <= effective.max_height);
        prop_assert!(size.width >= effective.min_width.min(effective.max_width));
        prop_assert!(size.height >= effective.min_height.min(effective.max_height));
    }
}
