//! The Root: owner of the surface, the registries and the damage engine.
//!
//! Exactly one Root owns a drawing surface. All registries — key lookup,
//! quick-lookup (hit-test) set, dirty set, listeners, pointer capture —
//! are state of the Root instance, initialized on construction and
//! cleared on unmount, so multiple independent Roots coexist without
//! interference.

use std::collections::HashMap;

use crate::animation::{FixedStepEngine, InterpolationEngine, Track, Tween};
use crate::backend::{Canvas, Color};
use crate::damage::{compute_plan, DamageTracker, RepaintPlan};
use crate::error::{Result, SceneError};
use crate::event::{Listener, PointerEvent, PointerKind};
use crate::geometry::{Point, Rect};
use crate::layout::Constraint;
use crate::node::{prop_traits, CursorIcon, Node, PropKey, PropSample, PropTraits};
use crate::render::render_subtree;
use crate::tree::{NodeId, Scene};

/// Construction-time Root configuration.
#[derive(Debug, Clone)]
pub struct RootConfig {
    pub width: f32,
    pub height: f32,
    /// Dirty-rectangle mode. When off, every repaint request escalates to
    /// a full-surface pass.
    pub incremental: bool,
    /// Font assigned to the backend at the start of every full pass.
    pub font: String,
    pub background: Option<Color>,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            incremental: true,
            font: "16px sans-serif".to_string(),
            background: None,
        }
    }
}

/// The specialized node owning a drawing surface and its scene.
pub struct Root {
    scene: Scene,
    node: NodeId,
    canvas: Box<dyn Canvas>,
    engine: Box<dyn InterpolationEngine>,
    width: f32,
    height: f32,
    incremental: bool,
    font: String,

    key_map: HashMap<String, NodeId>,
    /// Hit-test candidates in registration order: nodes with listeners, a
    /// cursor hint, or the explicit quick-lookup flag.
    quick_lookup: Vec<NodeId>,
    listeners: HashMap<NodeId, Vec<(PointerKind, Listener)>>,
    damage: DamageTracker,
    tweens: Vec<Tween>,

    /// In-flight-render guard: a second pass requested during an active
    /// one is a no-op.
    rendering: bool,
    layout_done: bool,
    /// Pointer capture: set on press, cleared on release; while locked the
    /// captured node keeps receiving events even off its bounds.
    pointer_locked: bool,
    capture_target: Option<NodeId>,
    hover_target: Option<NodeId>,
}

impl Root {
    pub fn new(config: RootConfig, canvas: Box<dyn Canvas>) -> Self {
        Self::with_engine(config, canvas, Box::new(FixedStepEngine::instant()))
    }

    pub fn with_engine(
        config: RootConfig,
        canvas: Box<dyn Canvas>,
        engine: Box<dyn InterpolationEngine>,
    ) -> Self {
        let mut scene = Scene::new();
        let mut root_node = Node::new().width(config.width).height(config.height);
        root_node.background = config.background;
        let node = scene.insert(root_node);
        if let Some(root) = scene.get_mut(node) {
            root.mounted = true;
        }

        Self {
            scene,
            node,
            canvas,
            engine,
            width: config.width,
            height: config.height,
            incremental: config.incremental,
            font: config.font,
            key_map: HashMap::new(),
            quick_lookup: Vec::new(),
            listeners: HashMap::new(),
            damage: DamageTracker::new(),
            tweens: Vec::new(),
            rendering: false,
            layout_done: false,
            pointer_locked: false,
            capture_target: None,
            hover_target: None,
        }
    }

    /// The Root's own node.
    pub fn root_id(&self) -> NodeId {
        self.node
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Direct scene access for collaborators (widget variants, scroll
    /// regions). Mutations made here bypass repaint requests; follow up
    /// with `mark_dirty` or `render`.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn insert_node(&mut self, node: Node) -> NodeId {
        self.scene.insert(node)
    }

    /// Key-based lookup among mounted, non-internal nodes.
    pub fn node_by_key(&self, key: &str) -> Option<NodeId> {
        self.key_map.get(key).copied()
    }

    /// Link `child` under `parent`, repaint, and mount the subtree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.scene.contains(parent) || !self.scene.contains(child) {
            return Err(SceneError::NodeGone);
        }
        self.scene.link(child, parent);
        self.render()?;
        self.mount_subtree(child);
        Ok(())
    }

    /// Unmount `child`'s subtree, unlink it, and repaint. In-flight
    /// tweens for the removed subtree are cancelled and released.
    pub fn remove_child(&mut self, child: NodeId) -> Result<()> {
        if !self.scene.contains(child) {
            return Err(SceneError::NodeGone);
        }
        let subtree = self.scene.subtree_document_order(child);
        self.cancel_tweens(&subtree);
        // Unlink while the parent back-reference is still present;
        // unmounting detaches it.
        self.scene.unlink(child);
        self.unmount_subtree(child);
        self.render()
    }

    /// Register the subtree into the Root registries, children before
    /// self. Internal nodes are skipped but still flagged mounted. Runs
    /// synchronously to completion; no partially-mounted state is ever
    /// observable.
    pub fn mount_subtree(&mut self, id: NodeId) {
        for node_id in self.scene.subtree_children_first(id) {
            let Some(node) = self.scene.get_mut(node_id) else {
                continue;
            };
            if !node.mounted && !node.internal {
                let key = node.key.clone();
                let quick = node.wants_quick_lookup();
                node.mounted = true;
                if let Some(key) = key {
                    if let Some(previous) = self.key_map.insert(key.clone(), node_id) {
                        if previous != node_id {
                            log::warn!("duplicate key {key:?}: replacing {previous:?}");
                        }
                    }
                }
                if quick && !self.quick_lookup.contains(&node_id) {
                    self.quick_lookup.push(node_id);
                }
            } else {
                node.mounted = true;
            }
        }
    }

    /// Clear registry entries for the subtree and detach parent links.
    /// Layout relinks children on the next pass, so a re-appended subtree
    /// reassembles itself.
    pub fn unmount_subtree(&mut self, id: NodeId) {
        for node_id in self.scene.subtree_document_order(id) {
            let Some(node) = self.scene.get_mut(node_id) else {
                continue;
            };
            node.mounted = false;
            node.parent = None;
            let key = node.key.clone();
            if let Some(key) = key {
                if self.key_map.get(&key) == Some(&node_id) {
                    self.key_map.remove(&key);
                }
            }
            self.quick_lookup.retain(|&quick| quick != node_id);
        }
    }

    fn cancel_tweens(&mut self, nodes: &[NodeId]) {
        let mut kept = Vec::with_capacity(self.tweens.len());
        for tween in self.tweens.drain(..) {
            if nodes.contains(&tween.node) {
                self.engine.release(tween.handle);
            } else {
                kept.push(tween);
            }
        }
        self.tweens = kept;
    }

    /// Mark a node's painted content stale and arm the debounced damage
    /// trigger.
    pub fn mark_dirty(&mut self, id: NodeId) -> Result<()> {
        self.scene.node_mut(id)?.dirty = true;
        self.damage.mark(id);
        Ok(())
    }

    /// Apply a partial attribute update.
    ///
    /// Properties are classified through the declared trait table:
    /// cosmetic changes apply immediately and cost one repaint (a
    /// dirty-mark in incremental mode); animatable numerics snapshot the
    /// current values and start an interpolation; any layout-affecting
    /// property escalates the repaint decision to a full pass.
    pub fn set_attributes(&mut self, id: NodeId, patch: crate::node::AttrPatch) -> Result<()> {
        let keys = patch.keys();
        let has_layout = keys
            .iter()
            .any(|&key| prop_traits(key).contains(PropTraits::LAYOUT));

        let mut tracks = Vec::new();
        {
            let node = self.scene.node_mut(id)?;
            for &key in &keys {
                if !prop_traits(key).contains(PropTraits::ANIMATABLE) {
                    continue;
                }
                match (node.numeric_value(key), patch.numeric_target(key)) {
                    (Some(from), Some(to)) => tracks.push(Track { key, from, to }),
                    // No measured baseline yet: snap straight to target.
                    (None, Some(to)) => node.apply_sample(PropSample { key, value: to }),
                    // Non-numeric dimension target (`Auto`/`Fill`).
                    (_, None) => match key {
                        PropKey::Width => {
                            if let Some(width) = patch.width {
                                node.width = width;
                            }
                        }
                        PropKey::Height => {
                            if let Some(height) = patch.height {
                                node.height = height;
                            }
                        }
                        _ => {}
                    },
                }
            }
            patch.apply_cosmetic(node);
        }

        if tracks.is_empty() {
            if has_layout {
                // Layout-affecting with nothing to interpolate: repaint in
                // full, which re-runs layout.
                return self.render();
            }
            if self.incremental {
                return self.mark_dirty(id);
            }
            return self.render();
        }

        let handle = self.engine.begin(&tracks);
        self.tweens.push(Tween {
            handle,
            node: id,
            tracks,
            needs_layout: has_layout,
        });
        Ok(())
    }

    /// Whether any interpolation is still running.
    pub fn has_active_tweens(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Host tick entry: advance interpolations, apply their samples, then
    /// run the debounced damage pass at most once. Returns true while
    /// tweens remain active and the host should keep ticking.
    pub fn pump(&mut self) -> Result<bool> {
        let mut full = false;
        let mut survivors = Vec::new();
        let tweens = std::mem::take(&mut self.tweens);
        for tween in tweens {
            if !self.scene.contains(tween.node) {
                self.engine.release(tween.handle);
                continue;
            }
            let mut samples = Vec::with_capacity(tween.tracks.len());
            let done = self
                .engine
                .advance(tween.handle, &tween.tracks, &mut samples);
            let node = self.scene.node_mut(tween.node)?;
            for sample in samples {
                node.apply_sample(sample);
            }
            if tween.needs_layout || !self.incremental {
                full = true;
            } else {
                node.dirty = true;
                self.damage.mark(tween.node);
            }
            if done {
                self.engine.release(tween.handle);
            } else {
                survivors.push(tween);
            }
        }
        let still_active = !survivors.is_empty();
        self.tweens = survivors;

        if full {
            // The full pass clears the whole surface; per-node dirty
            // clears from this tick's marks would be redundant.
            let taken = self.damage.take();
            self.reset_dirty_flags(taken);
            self.render()?;
        } else if self.damage.is_scheduled() {
            self.flush_damage()?;
        }
        Ok(still_active)
    }

    /// Full-surface pass: clear, assign the font, lay out from the Root,
    /// paint the whole tree. Idempotent while a pass is already active —
    /// the second call is a no-op.
    pub fn render(&mut self) -> Result<()> {
        if self.rendering {
            log::debug!("render re-entered during an active pass; ignoring");
            return Ok(());
        }
        self.rendering = true;
        self.canvas
            .clear_rect(Rect::new(0.0, 0.0, self.width, self.height));
        self.canvas.set_font(&self.font);
        let result = self
            .scene
            .layout(self.node, Constraint::loose(self.width, self.height), false)
            .and_then(|_| {
                render_subtree(
                    &mut self.scene,
                    self.canvas.as_mut(),
                    self.node,
                    Point::ZERO,
                )
            });
        self.rendering = false;
        result?;
        self.layout_done = true;
        Ok(())
    }

    /// Run the damage pass now: drain the dirty set, compute the minimal
    /// repaint set, repaint exactly those nodes. Normally driven by
    /// [`Root::pump`]; calling before the first layout is the typed
    /// precondition failure.
    pub fn flush_damage(&mut self) -> Result<()> {
        if !self.layout_done {
            return Err(SceneError::LayoutNotRun);
        }
        if self.rendering {
            return Ok(());
        }
        let dirty = self.damage.take();
        if dirty.is_empty() {
            return Ok(());
        }

        // Fresh snapshots before any bounding box is trusted.
        self.scene.refresh_context(self.node);
        let plan = compute_plan(&self.scene, self.node, &dirty)?;
        match plan {
            RepaintPlan::Full => {
                self.reset_dirty_flags(dirty);
                self.render()
            }
            RepaintPlan::Partial(nodes) => {
                log::debug!("incremental repaint of {} nodes", nodes.len());
                self.rendering = true;
                let result = self.repaint_nodes(nodes);
                self.rendering = false;
                result
            }
        }
    }

    fn reset_dirty_flags(&mut self, nodes: std::collections::HashSet<NodeId>) {
        for id in nodes {
            if let Some(node) = self.scene.get_mut(id) {
                node.dirty = false;
            }
        }
    }

    fn repaint_nodes(&mut self, nodes: Vec<NodeId>) -> Result<()> {
        for id in nodes {
            if !self.scene.contains(id) {
                continue;
            }
            // Each target clears and redraws its own tracked region.
            self.scene.node_mut(id)?.dirty = true;
            let placement = self.scene.node(id)?.placement;
            render_subtree(&mut self.scene, self.canvas.as_mut(), id, placement)?;
        }
        Ok(())
    }

    /// Resolve the topmost hit-test candidate at surface coordinates.
    pub fn hit_test(&mut self, x: f32, y: f32) -> Result<Option<NodeId>> {
        if !self.layout_done {
            return Err(SceneError::LayoutNotRun);
        }
        self.scene.refresh_context(self.node);
        for index in 0..self.quick_lookup.len() {
            let id = self.quick_lookup[index];
            if !self.scene.contains(id) {
                continue;
            }
            if !self.scene.node(id)?.is_mounted() {
                continue;
            }
            if self.scene.contains_point(id, x, y)? && self.scene.is_in_viewport(id)? {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// Attach a listener for one event kind. Mounted nodes with listeners
    /// become hit-test candidates.
    pub fn add_listener(
        &mut self,
        id: NodeId,
        kind: PointerKind,
        listener: Listener,
    ) -> Result<()> {
        {
            let node = self.scene.node_mut(id)?;
            node.has_listeners = true;
            if node.mounted && !node.internal && !self.quick_lookup.contains(&id) {
                self.quick_lookup.push(id);
            }
        }
        self.listeners.entry(id).or_default().push((kind, listener));
        Ok(())
    }

    /// Route a normalized pointer event.
    ///
    /// While pointer capture is locked, the captured node receives every
    /// event regardless of the pointer position; the lock is set on press
    /// and cleared after the release is delivered.
    pub fn dispatch(&mut self, event: PointerEvent) -> Result<Option<NodeId>> {
        let target = if self.pointer_locked {
            self.capture_target.filter(|&id| self.scene.contains(id))
        } else if event.kind == PointerKind::Leave {
            None
        } else {
            self.hit_test(event.x, event.y)?
        };

        match event.kind {
            PointerKind::Down => {
                if target.is_some() {
                    self.pointer_locked = true;
                    self.capture_target = target;
                }
            }
            PointerKind::Move => self.hover_target = target,
            PointerKind::Leave => self.hover_target = None,
            _ => {}
        }

        if let Some(target) = target {
            self.notify(target, &event);
        }

        if event.kind == PointerKind::Up {
            self.pointer_locked = false;
            self.capture_target = None;
        }
        Ok(target)
    }

    fn notify(&mut self, target: NodeId, event: &PointerEvent) {
        if let Some(mut entries) = self.listeners.remove(&target) {
            for (kind, listener) in entries.iter_mut() {
                if *kind == event.kind {
                    listener(target, event);
                }
            }
            self.listeners.insert(target, entries);
        }
    }

    /// Cursor hint of the hovered node, for the host to apply.
    pub fn current_cursor(&self) -> CursorIcon {
        self.hover_target
            .and_then(|id| self.scene.get(id))
            .and_then(|node| node.cursor)
            .unwrap_or_default()
    }
}
