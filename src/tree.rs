//! Arena storage for the scene graph.
//!
//! Nodes live in a dense array owned by the [`Scene`]; parent and child
//! links are generational [`NodeId`] handles, never owning references, so
//! the parent/child cycle of a retained tree needs no manual breaking.
//! Generations detect stale handles to recycled slots.

use crate::error::{Result, SceneError};
use crate::node::Node;

/// Handle to a node in a [`Scene`].
///
/// Contains index + generation so a handle kept across a removal can be
/// detected instead of silently addressing whatever node reused the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

struct SparseEntry {
    dense_index: usize,
    generation: u32,
}

struct Slot {
    node: Node,
    id: NodeId,
}

/// Central node storage: dense array for cache-friendly traversal, sparse
/// map for O(1) handle lookup, swap-remove without holes.
pub struct Scene {
    dense: Vec<Slot>,
    sparse: Vec<Option<SparseEntry>>,
    free_indices: Vec<u32>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            sparse: Vec::new(),
            free_indices: Vec::new(),
        }
    }

    /// Store a node and return its handle. The node starts detached;
    /// [`Scene::link`] makes it a child.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let (sparse_index, generation) = if let Some(index) = self.free_indices.pop() {
            let old_generation = self.sparse[index as usize]
                .as_ref()
                .map(|entry| entry.generation)
                .unwrap_or(0);
            (index, old_generation.wrapping_add(1))
        } else {
            let index = self.sparse.len() as u32;
            self.sparse.push(None);
            (index, 0)
        };

        let id = NodeId::new(sparse_index, generation);
        let dense_index = self.dense.len();
        self.dense.push(Slot { node, id });
        self.sparse[sparse_index as usize] = Some(SparseEntry {
            dense_index,
            generation,
        });
        id
    }

    /// Remove a node. The slot is recycled; stale handles to it become
    /// detectable through the generation check.
    pub fn remove(&mut self, id: NodeId) {
        let dense_index = match self.dense_index(id) {
            Some(index) => index,
            None => return,
        };

        if let Some(parent) = self.dense[dense_index].node.parent {
            if let Some(parent_dense) = self.dense_index(parent) {
                self.dense[parent_dense]
                    .node
                    .children
                    .retain(|&child| child != id);
            }
        }

        let last = self.dense.len() - 1;
        self.dense.swap_remove(dense_index);
        if dense_index != last && !self.dense.is_empty() {
            let moved_id = self.dense[dense_index].id;
            if let Some(entry) = self.sparse[moved_id.index as usize].as_mut() {
                entry.dense_index = dense_index;
            }
        }

        self.sparse[id.index as usize] = None;
        self.free_indices.push(id.index);
    }

    fn dense_index(&self, id: NodeId) -> Option<usize> {
        self.sparse
            .get(id.index as usize)
            .and_then(|entry| entry.as_ref())
            .filter(|entry| entry.generation == id.generation)
            .map(|entry| entry.dense_index)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.dense_index(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.dense_index(id).map(|index| &self.dense[index].node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.dense_index(id)
            .map(move |index| &mut self.dense[index].node)
    }

    /// Like [`Scene::get`] but a stale handle is the typed `NodeGone`.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(SceneError::NodeGone)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.get_mut(id).ok_or(SceneError::NodeGone)
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Link `child` under `parent`, relinking from any previous parent
    /// first — a node has at most one parent at any time.
    pub fn link(&mut self, child: NodeId, parent: NodeId) {
        let previous = self.get(child).and_then(|node| node.parent);
        if previous == Some(parent) {
            return;
        }
        if let Some(previous) = previous {
            if let Some(node) = self.get_mut(previous) {
                node.children.retain(|&existing| existing != child);
            }
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            if !node.children.contains(&child) {
                node.children.push(child);
            }
        }
    }

    /// Detach `child` from its parent, keeping it in the scene.
    pub fn unlink(&mut self, child: NodeId) {
        let parent = self.get(child).and_then(|node| node.parent);
        if let Some(parent) = parent {
            if let Some(node) = self.get_mut(parent) {
                node.children.retain(|&existing| existing != child);
            }
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Siblings of `id` under its parent, excluding `id` itself.
    pub fn siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.parent(id) {
            Some(parent) => self
                .children(parent)
                .into_iter()
                .filter(|&sibling| sibling != id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Ancestor chain from `id`'s parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            chain.push(ancestor);
            current = self.parent(ancestor);
        }
        chain
    }

    /// Subtree of `id` with children listed before their parent — the
    /// order mount registration runs in.
    pub fn subtree_children_first(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        self.collect_children_first(id, &mut order);
        order
    }

    fn collect_children_first(&self, id: NodeId, order: &mut Vec<NodeId>) {
        for child in self.children(id) {
            self.collect_children_first(child, order);
        }
        order.push(id);
    }

    /// Subtree of `id` in document order (parent before children,
    /// children in child order) — the order repaints run in.
    pub fn subtree_document_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            let children = self.children(current);
            for child in children.into_iter().rev() {
                stack.push(child);
            }
        }
        order
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_remove_roundtrip() {
        let mut scene = Scene::new();
        let id = scene.insert(Node::new());
        assert!(scene.contains(id));
        scene.remove(id);
        assert!(!scene.contains(id));
        assert!(scene.node(id).is_err());
    }

    #[test]
    fn stale_handle_detected_after_slot_reuse() {
        let mut scene = Scene::new();
        let first = scene.insert(Node::new());
        scene.remove(first);
        let second = scene.insert(Node::new());

        assert!(!scene.contains(first));
        assert!(scene.contains(second));
        assert!(scene.node(first).is_err());
    }

    #[test]
    fn link_unlink_maintains_single_parent() {
        let mut scene = Scene::new();
        let a = scene.insert(Node::new());
        let b = scene.insert(Node::new());
        let child = scene.insert(Node::new());

        scene.link(child, a);
        assert_eq!(scene.parent(child), Some(a));
        assert_eq!(scene.children(a), vec![child]);

        // Relinking moves the child; it never has two parents.
        scene.link(child, b);
        assert_eq!(scene.parent(child), Some(b));
        assert!(scene.children(a).is_empty());
        assert_eq!(scene.children(b), vec![child]);

        scene.unlink(child);
        assert_eq!(scene.parent(child), None);
        assert!(scene.children(b).is_empty());
    }

    #[test]
    fn remove_detaches_from_parent() {
        let mut scene = Scene::new();
        let parent = scene.insert(Node::new());
        let child = scene.insert(Node::new());
        scene.link(child, parent);

        scene.remove(child);
        assert!(scene.children(parent).is_empty());
    }

    #[test]
    fn swap_remove_keeps_other_handles_valid() {
        let mut scene = Scene::new();
        let a = scene.insert(Node::new());
        let b = scene.insert(Node::new());
        let c = scene.insert(Node::new());

        scene.remove(a);
        assert!(scene.contains(b));
        assert!(scene.contains(c));
    }

    #[test]
    fn ancestors_walk_to_root() {
        let mut scene = Scene::new();
        let root = scene.insert(Node::new());
        let mid = scene.insert(Node::new());
        let leaf = scene.insert(Node::new());
        scene.link(mid, root);
        scene.link(leaf, mid);

        assert_eq!(scene.ancestors(leaf), vec![mid, root]);
        assert!(scene.ancestors(root).is_empty());
    }

    #[test]
    fn subtree_orders() {
        let mut scene = Scene::new();
        let root = scene.insert(Node::new());
        let a = scene.insert(Node::new());
        let b = scene.insert(Node::new());
        let a1 = scene.insert(Node::new());
        scene.link(a, root);
        scene.link(b, root);
        scene.link(a1, a);

        assert_eq!(scene.subtree_children_first(root), vec![a1, a, b, root]);
        assert_eq!(scene.subtree_document_order(root), vec![root, a, a1, b]);
    }
}
