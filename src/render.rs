//! The recursive paint pass.
//!
//! Rendering walks the tree in document order, threading a placement
//! point: each node places itself at the parent's point plus its margin
//! and own offset, paints inside a backend save/restore pair, and offers
//! its children the padding-advanced point. Context snapshots are derived
//! on the way down, so every node paints against a fresh snapshot.

use crate::backend::Canvas;
use crate::context::LocalContext;
use crate::error::{Result, SceneError};
use crate::geometry::{Point, Rect};
use crate::node::Overflow;
use crate::tree::{NodeId, Scene};

/// Paint the subtree rooted at `id`, placed at `parent_point`.
///
/// Returns the node's placement (word) point. Requires a prior layout
/// pass; an unmeasured node is the typed `LayoutNotRun` failure.
pub(crate) fn render_subtree(
    scene: &mut Scene,
    canvas: &mut dyn Canvas,
    id: NodeId,
    parent_point: Point,
) -> Result<Point> {
    let parent_ctx = scene
        .parent(id)
        .and_then(|parent| scene.get(parent))
        .map(|node| *node.cached_context())
        .unwrap_or_default();
    render_node(scene, canvas, id, parent_point, &parent_ctx)
}

fn render_node(
    scene: &mut Scene,
    canvas: &mut dyn Canvas,
    id: NodeId,
    parent_point: Point,
    parent_ctx: &LocalContext,
) -> Result<Point> {
    let ctx = {
        let node = scene.node(id)?;
        LocalContext::derive(parent_ctx, node, id)
    };

    let node = scene.node_mut(id)?;
    node.placement = parent_point;
    node.ctx = ctx;

    let size = node.size.ok_or(SceneError::LayoutNotRun)?;
    let word_point = Point::new(parent_point.x + node.margin.left, parent_point.y);
    let self_point = Point::new(
        node.x + word_point.x,
        node.y + word_point.y + node.margin.top,
    );
    let self_rect = Rect::new(self_point.x, self_point.y, size.width, size.height);

    let dirty = std::mem::replace(&mut node.dirty, false);
    let translate = (node.translate_x, node.translate_y);
    let rotate = node.rotate;
    let radius = node.radius;
    let background = node.background;
    let overflow = node.overflow;
    let padding = node.padding;
    let backfill = parent_ctx
        .fill_ancestor
        .and_then(|ancestor| scene.get(ancestor))
        .and_then(|ancestor| ancestor.background);

    canvas.save();

    if dirty {
        // Reset the previously painted region, restoring whatever the
        // nearest filled ancestor had underneath it.
        let tracked = self_rect.offset(ctx.translate_x, ctx.translate_y);
        canvas.save();
        canvas.clear_rect(tracked);
        if let Some(color) = backfill {
            canvas.set_fill(color);
            canvas.fill_rect(tracked);
        }
        canvas.restore();
    }

    if translate.0 != 0.0 || translate.1 != 0.0 {
        canvas.translate(translate.0, translate.1);
    }

    if rotate != 0.0 {
        let pivot = rotation_pivot(&ctx, self_rect);
        canvas.translate(pivot.x, pivot.y);
        canvas.rotate(rotate.to_radians());
        canvas.translate(-pivot.x, -pivot.y);
    }

    if let Some(color) = background {
        canvas.set_fill(color);
        canvas.fill_round_rect(self_rect, radius);
    }

    if overflow == Overflow::Hidden {
        canvas.clip_round_rect(self_rect, radius);
    }

    let child_point = Point::new(self_point.x + padding.left, self_point.y + padding.top);
    for child in scene.children(id) {
        render_node(scene, canvas, child, child_point, &ctx)?;
    }

    canvas.restore();
    log::trace!("render {:?} at ({}, {})", id, self_point.x, self_point.y);
    Ok(word_point)
}

/// The point rotation spins about: pivot-offset override (own or
/// inherited) plus accumulated translate plus the node's own box center.
/// The override term is how an ancestor redirects a descendant's rotation
/// center away from its local center.
pub(crate) fn rotation_pivot(ctx: &LocalContext, self_rect: Rect) -> Point {
    let offset = ctx.pivot_offset.unwrap_or(Point::ZERO);
    let center = self_rect.center();
    Point::new(
        offset.x + ctx.translate_x + center.x,
        offset.y + ctx.translate_y + center.y,
    )
}
