//! Box constraints and the layout pass.
//!
//! Layout is a strict single top-down/bottom-up pass: a constraint flows
//! down, each node extends it with its own explicit dimensions, offers a
//! padding-deflated constraint to its children, and resolves its own size
//! from the children's envelope (or its own request, for a leaf). There is
//! no relayout loop — a full relayout happens only by re-entering the pass
//! from the Root.

use crate::error::{Result, SceneError};
use crate::geometry::rotated_extent;
use crate::node::{Dimension, Node};
use crate::tree::{NodeId, Scene};

/// A resolved width/height pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::zero()
    }
}

/// A min/max width/height envelope passed top-down during layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub min_width: f32,
    pub min_height: f32,
    pub max_width: f32,
    pub max_height: f32,
}

impl Constraint {
    pub fn new(min_width: f32, min_height: f32, max_width: f32, max_height: f32) -> Self {
        Self {
            min_width,
            min_height,
            max_width,
            max_height,
        }
    }

    /// Zero minimums with the given maximums.
    pub fn loose(max_width: f32, max_height: f32) -> Self {
        Self {
            min_width: 0.0,
            min_height: 0.0,
            max_width,
            max_height,
        }
    }

    /// Exact size, no slack.
    pub fn tight(size: Size) -> Self {
        Self {
            min_width: size.width,
            min_height: size.height,
            max_width: size.width,
            max_height: size.height,
        }
    }

    pub fn unbounded() -> Self {
        Self {
            min_width: 0.0,
            min_height: 0.0,
            max_width: f32::INFINITY,
            max_height: f32::INFINITY,
        }
    }

    /// Merge a node's explicit width/height/min/max into this constraint,
    /// producing the node's effective constraint.
    ///
    /// An explicit pixel dimension overrides the incoming bounds — a child
    /// may exceed its parent's envelope, which is what overflow (and
    /// clipping) are for. The fill-remaining sentinel consumes the full
    /// available maximum; `Auto` leaves the incoming bounds untouched. The
    /// node's own min/max then narrow the result.
    pub fn extend(&self, node: &Node) -> Constraint {
        let mut out = *self;

        match node.width {
            Dimension::Px(width) => {
                out.min_width = width;
                out.max_width = width;
            }
            Dimension::Fill => {
                out.min_width = self.max_width;
                out.max_width = self.max_width;
            }
            Dimension::Auto => {}
        }
        match node.height {
            Dimension::Px(height) => {
                out.min_height = height;
                out.max_height = height;
            }
            Dimension::Fill => {
                out.min_height = self.max_height;
                out.max_height = self.max_height;
            }
            Dimension::Auto => {}
        }

        if let Some(min_width) = node.min_width {
            out.min_width = out.min_width.max(min_width);
        }
        if let Some(max_width) = node.max_width {
            out.max_width = out.max_width.min(max_width);
        }
        if let Some(min_height) = node.min_height {
            out.min_height = out.min_height.max(min_height);
        }
        if let Some(max_height) = node.max_height {
            out.max_height = out.max_height.min(max_height);
        }

        out
    }

    /// The constraint offered to children: this box minus its own padding.
    pub fn child_constraint(&self, node: &Node) -> Constraint {
        let horizontal = node.padding.horizontal();
        let vertical = node.padding.vertical();
        Constraint::loose(
            (self.max_width - horizontal).max(0.0),
            (self.max_height - vertical).max(0.0),
        )
    }

    /// Clamp a candidate size into this envelope. Never fails; out-of-range
    /// candidates clamp silently, and when merged bounds conflict the
    /// maximum wins.
    pub fn resolve(&self, candidate: Size) -> Size {
        Size {
            width: candidate.width.max(self.min_width).min(self.max_width),
            height: candidate.height.max(self.min_height).min(self.max_height),
        }
    }
}

impl Default for Constraint {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Scene {
    /// Lay out the subtree rooted at `id` against `constraint`.
    ///
    /// Stores each node's resolved (unrotated) size and returns the
    /// rotation-aware bounding size the parent folds into its envelope —
    /// layout already accounts for in-place rotation extents.
    ///
    /// With `allow_overflow`, the children's envelope is used directly as
    /// the resolved size even when it exceeds this node's own constraint;
    /// scrollable content relies on this escape hatch.
    pub fn layout(
        &mut self,
        id: NodeId,
        constraint: Constraint,
        allow_overflow: bool,
    ) -> Result<Size> {
        let node = self.node(id)?;
        let self_constraint = constraint.extend(node);
        let child_constraint = self_constraint.child_constraint(node);
        let requested = node.requested_size(&self_constraint);
        let rotate = node.rotate;
        let children = self.children(id);

        let resolved = if children.is_empty() {
            // A leaf measures against its own requested dimensions.
            self_constraint.resolve(requested)
        } else {
            let mut envelope = requested;
            for child in children {
                self.link(child, id);
                let child_size = self.layout(child, child_constraint, false)?;
                envelope.width = envelope.width.max(child_size.width);
                envelope.height = envelope.height.max(child_size.height);
            }
            if allow_overflow {
                envelope
            } else {
                self_constraint.resolve(envelope)
            }
        };

        self.node_mut(id)?.size = Some(resolved);
        log::trace!(
            "layout {:?}: resolved {}x{} (rotate {}deg)",
            id,
            resolved.width,
            resolved.height,
            rotate
        );

        let (width, height) = rotated_extent(resolved.width, resolved.height, rotate);
        Ok(Size::new(width, height))
    }

    /// The node's resolved size from the last layout pass, or the typed
    /// precondition failure when layout has not measured it yet.
    pub fn resolved_size(&self, id: NodeId) -> Result<Size> {
        self.node(id)?.size.ok_or(SceneError::LayoutNotRun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Edges;

    #[test]
    fn extend_tightens_explicit_width() {
        let node = Node::new().width(80.0);
        let constraint = Constraint::loose(200.0, 200.0).extend(&node);
        assert_eq!(constraint.min_width, 80.0);
        assert_eq!(constraint.max_width, 80.0);
        assert_eq!(constraint.min_height, 0.0);
        assert_eq!(constraint.max_height, 200.0);
    }

    #[test]
    fn extend_explicit_width_overrides_incoming() {
        // A child may exceed its parent's envelope; overflow handling is
        // the parent's concern, not the constraint's.
        let node = Node::new().width(500.0);
        let constraint = Constraint::loose(200.0, 200.0).extend(&node);
        assert_eq!(constraint.min_width, 500.0);
        assert_eq!(constraint.max_width, 500.0);
    }

    #[test]
    fn fill_consumes_available_maximum() {
        let mut node = Node::new();
        node.width = Dimension::Fill;
        let constraint = Constraint::loose(320.0, 200.0).extend(&node);
        assert_eq!(constraint.min_width, 320.0);
        assert_eq!(constraint.max_width, 320.0);
    }

    #[test]
    fn child_constraint_subtracts_padding() {
        let node = Node::new().padding(Edges::new(5.0, 10.0, 5.0, 10.0));
        let child = Constraint::loose(100.0, 100.0).child_constraint(&node);
        assert_eq!(child.max_width, 80.0);
        assert_eq!(child.max_height, 90.0);
        assert_eq!(child.min_width, 0.0);
    }

    #[test]
    fn resolve_clamps_silently() {
        let constraint = Constraint::new(10.0, 10.0, 50.0, 50.0);
        assert_eq!(
            constraint.resolve(Size::new(200.0, 5.0)),
            Size::new(50.0, 10.0)
        );
    }

    #[test]
    fn auto_leaf_resolves_through_min_clamp() {
        let mut scene = Scene::new();
        let id = scene.insert(Node::new().height(50.0).min_width_px(120.0));
        scene
            .layout(id, Constraint::loose(400.0, 300.0), false)
            .unwrap();
        assert_eq!(scene.resolved_size(id).unwrap(), Size::new(120.0, 50.0));
    }

    #[test]
    fn layout_reports_rotated_bounding_size() {
        let mut scene = Scene::new();
        let id = scene.insert(Node::new().width(100.0).height(50.0).rotate(90.0));
        let size = scene.layout(id, Constraint::loose(400.0, 300.0), false).unwrap();
        assert!((size.width - 50.0).abs() < 1e-3);
        assert!((size.height - 100.0).abs() < 1e-3);
        // The stored size stays unrotated.
        assert_eq!(scene.resolved_size(id).unwrap(), Size::new(100.0, 50.0));
    }

    #[test]
    fn parent_envelope_is_children_max_seeded_by_request() {
        let mut scene = Scene::new();
        let parent = scene.insert(Node::new().width(30.0));
        let a = scene.insert(Node::new().width(80.0).height(20.0));
        let b = scene.insert(Node::new().width(50.0).height(60.0));
        scene.link(a, parent);
        scene.link(b, parent);

        let size = scene
            .layout(parent, Constraint::loose(400.0, 300.0), true)
            .unwrap();
        assert_eq!(size, Size::new(80.0, 60.0));
    }

    #[test]
    fn overflow_escape_bypasses_own_constraint() {
        let mut scene = Scene::new();
        let parent = scene.insert(Node::new().width(40.0).height(40.0));
        let child = scene.insert(Node::new().width(100.0).height(100.0));
        scene.link(child, parent);

        let clamped = scene
            .layout(parent, Constraint::loose(400.0, 300.0), false)
            .unwrap();
        assert_eq!(clamped, Size::new(40.0, 40.0));

        let overflowed = scene
            .layout(parent, Constraint::loose(400.0, 300.0), true)
            .unwrap();
        assert_eq!(overflowed, Size::new(100.0, 100.0));
    }

    #[test]
    fn resolved_size_before_layout_is_typed_error() {
        let mut scene = Scene::new();
        let id = scene.insert(Node::new());
        assert_eq!(scene.resolved_size(id), Err(SceneError::LayoutNotRun));
    }
}
