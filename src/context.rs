//! Inherited per-node context.
//!
//! Each node carries a value snapshot of everything its ancestry
//! contributes to rendering and hit-testing: accumulated translate and
//! rotation, the nearest clip/fill/scroll ancestors, the pivot-offset
//! override and the internal flag. The snapshot is derived by a pure
//! function from the parent's snapshot plus the node's own deltas, and is
//! recomputed for the whole subtree immediately before every render and
//! hit-test traversal. `Node::cached_context` exposes the last snapshot
//! for readers that must not force recomputation.

use crate::geometry::Point;
use crate::node::{Node, Overflow};
use crate::tree::{NodeId, Scene};

/// Snapshot of a node's inherited rendering context.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocalContext {
    /// Sum of all non-zero translate deltas, root to node.
    pub translate_x: f32,
    pub translate_y: f32,
    /// Sum of all non-zero rotation deltas, in degrees.
    pub rotate: f32,
    /// The ancestor (or self) clipping this subtree via overflow:hidden.
    /// Once an ancestor establishes a clip, deeper ones do not replace it.
    pub clip_ancestor: Option<NodeId>,
    /// Nearest ancestor (or self) declaring a background fill.
    pub fill_ancestor: Option<NodeId>,
    /// Nearest scroll-region ancestor, populated by the scroll
    /// collaborator's flag.
    pub scroll_ancestor: Option<NodeId>,
    /// Pivot-offset override in effect; an ancestor's override redirects
    /// descendants' rotation centers until another override replaces it.
    pub pivot_offset: Option<Point>,
    /// Set when this node or any ancestor is internal.
    pub internal: bool,
}

impl LocalContext {
    /// Derive a node's snapshot from its parent's.
    ///
    /// A zero translate or rotation delta is the identity and is never
    /// accumulated, so a node that declares no transform cannot drift the
    /// chain.
    pub fn derive(parent: &LocalContext, node: &Node, id: NodeId) -> LocalContext {
        LocalContext {
            translate_x: if node.translate_x != 0.0 {
                parent.translate_x + node.translate_x
            } else {
                parent.translate_x
            },
            translate_y: if node.translate_y != 0.0 {
                parent.translate_y + node.translate_y
            } else {
                parent.translate_y
            },
            rotate: if node.rotate != 0.0 {
                parent.rotate + node.rotate
            } else {
                parent.rotate
            },
            clip_ancestor: parent.clip_ancestor.or(if node.overflow == Overflow::Hidden {
                Some(id)
            } else {
                None
            }),
            fill_ancestor: if node.background.is_some() {
                Some(id)
            } else {
                parent.fill_ancestor
            },
            scroll_ancestor: if node.scroll_region {
                Some(id)
            } else {
                parent.scroll_ancestor
            },
            pivot_offset: node.pivot_offset.or(parent.pivot_offset),
            internal: node.internal || parent.internal,
        }
    }
}

impl Scene {
    /// Recompute context snapshots for the subtree rooted at `id`, parent
    /// snapshots before children. Called just before render and hit-test
    /// traversals; between those points `cached_context` may be stale.
    pub fn refresh_context(&mut self, id: NodeId) {
        let parent_ctx = self
            .parent(id)
            .and_then(|parent| self.get(parent))
            .map(|node| node.ctx)
            .unwrap_or_default();
        self.refresh_context_from(id, &parent_ctx);
    }

    pub(crate) fn refresh_context_from(&mut self, id: NodeId, parent_ctx: &LocalContext) {
        let ctx = match self.get(id) {
            Some(node) => LocalContext::derive(parent_ctx, node, id),
            None => return,
        };
        if let Some(node) = self.get_mut(id) {
            node.ctx = ctx;
        }
        for child in self.children(id) {
            self.refresh_context_from(child, &ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Color;

    #[test]
    fn zero_deltas_never_accumulate() {
        let mut scene = Scene::new();
        let root = scene.insert(Node::new().translate(5.0, 0.0));
        let mid = scene.insert(Node::new()); // no transform at all
        let leaf = scene.insert(Node::new().translate(3.0, 2.0));
        scene.link(mid, root);
        scene.link(leaf, mid);

        scene.refresh_context(root);
        let leaf_ctx = scene.get(leaf).unwrap().cached_context();
        assert_eq!(leaf_ctx.translate_x, 8.0);
        assert_eq!(leaf_ctx.translate_y, 2.0);
        assert_eq!(scene.get(mid).unwrap().cached_context().translate_x, 5.0);
    }

    #[test]
    fn rotation_accumulates_root_to_node() {
        let mut scene = Scene::new();
        let root = scene.insert(Node::new().rotate(30.0));
        let leaf = scene.insert(Node::new().rotate(15.0));
        scene.link(leaf, root);

        scene.refresh_context(root);
        assert_eq!(scene.get(leaf).unwrap().cached_context().rotate, 45.0);
    }

    #[test]
    fn outermost_clip_ancestor_wins() {
        let mut scene = Scene::new();
        let root = scene.insert(Node::new().overflow(Overflow::Hidden));
        let mid = scene.insert(Node::new().overflow(Overflow::Hidden));
        let leaf = scene.insert(Node::new());
        scene.link(mid, root);
        scene.link(leaf, mid);

        scene.refresh_context(root);
        // The outermost clip wins: once an ancestor clips, deeper
        // overflow:hidden nodes do not replace it.
        assert_eq!(scene.get(leaf).unwrap().cached_context().clip_ancestor, Some(root));
        assert_eq!(scene.get(mid).unwrap().cached_context().clip_ancestor, Some(root));
    }

    #[test]
    fn fill_ancestor_is_nearest_filled_node() {
        let mut scene = Scene::new();
        let root = scene.insert(Node::new().background(Color::BLACK));
        let mid = scene.insert(Node::new().background(Color::WHITE));
        let leaf = scene.insert(Node::new());
        scene.link(mid, root);
        scene.link(leaf, mid);

        scene.refresh_context(root);
        assert_eq!(scene.get(leaf).unwrap().cached_context().fill_ancestor, Some(mid));
        assert_eq!(scene.get(mid).unwrap().cached_context().fill_ancestor, Some(mid));
        assert_eq!(scene.get(root).unwrap().cached_context().fill_ancestor, Some(root));
    }

    #[test]
    fn pivot_override_inherits_until_replaced() {
        let mut scene = Scene::new();
        let root = scene.insert(Node::new().pivot_offset(10.0, 20.0));
        let mid = scene.insert(Node::new());
        let leaf = scene.insert(Node::new().pivot_offset(0.0, 0.0));
        scene.link(mid, root);
        scene.link(leaf, mid);

        scene.refresh_context(root);
        assert_eq!(
            scene.get(mid).unwrap().cached_context().pivot_offset,
            Some(Point::new(10.0, 20.0))
        );
        assert_eq!(
            scene.get(leaf).unwrap().cached_context().pivot_offset,
            Some(Point::new(0.0, 0.0))
        );
    }

    #[test]
    fn internal_flag_is_inherited_or() {
        let mut scene = Scene::new();
        let root = scene.insert(Node::new().internal());
        let leaf = scene.insert(Node::new());
        scene.link(leaf, root);

        scene.refresh_context(root);
        assert!(scene.get(leaf).unwrap().cached_context().internal);
    }

    #[test]
    fn scroll_region_flag_names_scroll_ancestor() {
        let mut scene = Scene::new();
        let root = scene.insert(Node::new());
        let viewport = scene.insert(Node::new().scroll_region());
        let content = scene.insert(Node::new());
        scene.link(viewport, root);
        scene.link(content, viewport);

        scene.refresh_context(root);
        assert_eq!(
            scene.get(content).unwrap().cached_context().scroll_ancestor,
            Some(viewport)
        );
        assert_eq!(scene.get(root).unwrap().cached_context().scroll_ancestor, None);
    }
}
