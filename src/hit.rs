//! Hit-testing and viewport visibility.
//!
//! All queries read the cached context snapshot; the Root refreshes the
//! subtree's snapshots immediately before dispatching events, so a query
//! through the Root always sees current ancestry. Rotated nodes are
//! tested by inverse-rotating the query point about the same pivot the
//! render pass spins about.

use crate::error::{Result, SceneError};
use crate::geometry::{rotate_about, rotated_envelope, Point, Rect};
use crate::render::rotation_pivot;
use crate::tree::{NodeId, Scene};

impl Scene {
    /// The node's unrotated screen-space rectangle: placement plus own
    /// offset plus accumulated translate.
    pub(crate) fn screen_rect(&self, id: NodeId) -> Result<Rect> {
        let node = self.node(id)?;
        let size = node.size.ok_or(SceneError::LayoutNotRun)?;
        let ctx = node.cached_context();
        let x = node.x + node.placement.x + node.margin.left + ctx.translate_x;
        let y = node.y + node.placement.y + node.margin.top + ctx.translate_y;
        Ok(Rect::new(x, y, size.width, size.height))
    }

    /// Axis-aligned bounding box of the node's painted extent, expanded to
    /// the envelope of all four rotated corners when the accumulated
    /// rotation is non-zero.
    pub fn bounding_box(&self, id: NodeId) -> Result<Rect> {
        let rect = self.screen_rect(id)?;
        let ctx = self.node(id)?.cached_context();
        if ctx.rotate == 0.0 {
            return Ok(rect);
        }
        let pivot = rotation_pivot(ctx, rect);
        Ok(rotated_envelope(rect, pivot, ctx.rotate))
    }

    /// Rotation-aware point containment.
    ///
    /// With accumulated rotation, the query point is inverse-rotated about
    /// the render pivot and tested against the unrotated box; the default
    /// pivot is the box center, so the center hits under any rotation.
    pub fn contains_point(&self, id: NodeId, x: f32, y: f32) -> Result<bool> {
        let rect = self.screen_rect(id)?;
        let ctx = self.node(id)?.cached_context();
        if ctx.rotate == 0.0 {
            return Ok(rect.contains(x, y));
        }
        let pivot = rotation_pivot(ctx, rect);
        let local = rotate_about(Point::new(x, y), pivot, -ctx.rotate);
        Ok(rect.contains(local.x, local.y))
    }

    /// True unless a scroll ancestor is in context, in which case the
    /// node's box must overlap the scroll ancestor's box.
    pub fn is_in_viewport(&self, id: NodeId) -> Result<bool> {
        let scroll_ancestor = self.node(id)?.cached_context().scroll_ancestor;
        let Some(scroll_ancestor) = scroll_ancestor else {
            return Ok(true);
        };
        if scroll_ancestor == id {
            return Ok(true);
        }
        let own = self.screen_rect(id)?;
        let viewport = self.bounding_box(scroll_ancestor)?;
        Ok(own.intersects(&viewport))
    }
}
