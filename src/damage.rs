//! The damage engine: selective repaint after localized mutations.
//!
//! Dirty marks accumulate in a Root-owned set; a debounced trigger folds
//! every mark within one host tick into a single pass that computes the
//! minimal correct repaint set. Anything visually entangled with a dirty
//! region — ancestors carrying clip or fill, overlapping siblings — is
//! pulled into the set; everything else keeps its pixels.

use std::collections::HashSet;

use crate::error::Result;
use crate::geometry::Rect;
use crate::tree::{NodeId, Scene};

/// Root-owned dirty bookkeeping.
#[derive(Debug, Default)]
pub(crate) struct DamageTracker {
    dirty: HashSet<NodeId>,
    scheduled: bool,
}

impl DamageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dirty node and arm the debounced trigger. Repeated marks
    /// within one tick collapse into a single pass.
    pub fn mark(&mut self, id: NodeId) {
        self.dirty.insert(id);
        self.scheduled = true;
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Disarm the trigger and drain the accumulated marks.
    pub fn take(&mut self) -> HashSet<NodeId> {
        self.scheduled = false;
        std::mem::take(&mut self.dirty)
    }

    pub fn clear(&mut self) {
        self.dirty.clear();
        self.scheduled = false;
    }
}

/// Output of a damage pass.
#[derive(Debug, PartialEq)]
pub(crate) enum RepaintPlan {
    /// Repaint the whole surface from the Root.
    Full,
    /// Repaint exactly these nodes, in document order.
    Partial(Vec<NodeId>),
}

/// Merge all pairwise-overlapping rectangles into a minimal set of damage
/// rectangles. Runs to fixpoint: merging two boxes can create overlap
/// with a third.
pub(crate) fn merge_damage_rects(mut rects: Vec<Rect>) -> Vec<Rect> {
    loop {
        let mut merged_any = false;
        let mut merged: Vec<Rect> = Vec::with_capacity(rects.len());
        'outer: for rect in rects.drain(..) {
            for existing in merged.iter_mut() {
                if existing.intersects(&rect) {
                    *existing = existing.union(&rect);
                    merged_any = true;
                    continue 'outer;
                }
            }
            merged.push(rect);
        }
        rects = merged;
        if !merged_any {
            return rects;
        }
    }
}

/// Compute the repaint set for the drained dirty marks.
///
/// Context snapshots must be fresh (the Root refreshes them before
/// calling); bounding boxes require a completed layout pass.
pub(crate) fn compute_plan(
    scene: &Scene,
    root: NodeId,
    dirty: &HashSet<NodeId>,
) -> Result<RepaintPlan> {
    // A dirty Root short-circuits everything.
    if dirty.contains(&root) {
        return Ok(RepaintPlan::Full);
    }

    let live: Vec<NodeId> = dirty
        .iter()
        .copied()
        .filter(|&id| scene.contains(id))
        .collect();
    if live.is_empty() {
        return Ok(RepaintPlan::Partial(Vec::new()));
    }

    let mut damage: Vec<Rect> = Vec::with_capacity(live.len());
    for &id in &live {
        damage.push(scene.bounding_box(id)?);
    }
    let mut damage = merge_damage_rects(damage);
    log::debug!(
        "damage pass: {} dirty nodes, {} damage rects",
        live.len(),
        damage.len()
    );

    let mut repaint: HashSet<NodeId> = HashSet::new();

    for &id in &live {
        let replacement = ancestor_replacement(scene, id, &damage)?;
        repaint.insert(replacement.unwrap_or(id));
    }

    // Sibling sweep: a clean sibling overlapping a damage rectangle must
    // repaint too, and a genuine area overlap extends the damage so later
    // siblings in the same scan are caught transitively.
    for &id in &live {
        for sibling in scene.siblings(id) {
            if dirty.contains(&sibling) || repaint.contains(&sibling) {
                continue;
            }
            let bounds = scene.bounding_box(sibling)?;
            let touches = damage.iter().any(|rect| bounds.touches(rect));
            if !touches {
                continue;
            }
            repaint.insert(sibling);
            if damage.iter().any(|rect| bounds.intersects(rect)) {
                damage.push(bounds);
                damage = merge_damage_rects(damage);
            }
        }
    }

    if repaint.contains(&root) {
        return Ok(RepaintPlan::Full);
    }

    // Document order keeps overlapping repaints layered like a full pass.
    let order = scene.subtree_document_order(root);
    let mut ordered: Vec<NodeId> = order
        .into_iter()
        .filter(|id| repaint.contains(id))
        .collect();
    // Repaint targets detached from the root (never rendered under it)
    // would vanish here; keep them at the end.
    for id in repaint {
        if !ordered.contains(&id) {
            ordered.push(id);
        }
    }
    Ok(RepaintPlan::Partial(ordered))
}

/// Walk `id`'s ancestor chain for the first ancestor whose box partially
/// intersects a damage rectangle — partial, because an ancestor that
/// fully contains the damage keeps its pixels and only the descendant
/// repaints. Falls back to the paint-relevant ancestor's own chain when
/// the direct walk finds nothing and the nearest fill/clip ancestor is
/// not the immediate parent.
fn ancestor_replacement(
    scene: &Scene,
    id: NodeId,
    damage: &[Rect],
) -> Result<Option<NodeId>> {
    if let Some(found) = walk_chain(scene, scene.ancestors(id), damage)? {
        return Ok(Some(found));
    }

    let parent = scene.parent(id);
    let ctx = *scene.node(id)?.cached_context();
    // Fill first, then clip; set semantics downstream collapse a region
    // reachable through both.
    for paint_ancestor in [ctx.fill_ancestor, ctx.clip_ancestor] {
        let Some(paint_ancestor) = paint_ancestor else {
            continue;
        };
        if paint_ancestor == id || Some(paint_ancestor) == parent {
            continue;
        }
        let mut chain = vec![paint_ancestor];
        chain.extend(scene.ancestors(paint_ancestor));
        if let Some(found) = walk_chain(scene, chain, damage)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

fn walk_chain(scene: &Scene, chain: Vec<NodeId>, damage: &[Rect]) -> Result<Option<NodeId>> {
    for ancestor in chain {
        let bounds = scene.bounding_box(ancestor)?;
        let partial = damage
            .iter()
            .any(|rect| bounds.intersects(rect) && !bounds.contains_rect(rect));
        if partial {
            return Ok(Some(ancestor));
        }
    }
    Ok(None)
}
