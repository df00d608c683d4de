// =====================================================================
// File: tree/core.rs
//
// The B+-tree core: point find, insert with proactive top-down split,
// unbalanced lazy delete, successor/predecessor, and height/size
// bookkeeping. Operates at a fixed branching factor `max_children`
// captured at tree-init time; it never rebuilds itself — widening or
// narrowing `b` and re-packing is the policy layer's job
// (`crate::jump_tree`).
// =====================================================================
use log::trace;

use super::node::{
    locate_child, num_children, Arena, InternalNode, LeafNode, Node, NodeBody, NodeId,
    NodeIdSource, RandomNodeIdSource,
};

pub const NOT_FOUND: i32 = -1;

/// The B+-tree header plus its node arena.
pub struct Tree {
    pub(crate) arena: Arena,
    pub(crate) root: Option<NodeId>,
    pub(crate) min: Option<NodeId>,
    pub max_children: usize,
    pub height: i32,
    pub number_items: usize,
    pub num_leaves: usize,
    id_source: Box<dyn NodeIdSource>,
}

impl Tree {
    pub fn new(max_children: usize) -> Self {
        Self::with_id_source(max_children, Box::new(RandomNodeIdSource::default()))
    }

    pub fn with_id_source(max_children: usize, id_source: Box<dyn NodeIdSource>) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            min: None,
            max_children,
            height: -1,
            number_items: 0,
            num_leaves: 0,
            id_source,
        }
    }

    pub(crate) fn next_id(&mut self) -> u64 {
        self.id_source.next_id()
    }

    // =========================
    // Lookup
    // =========================

    pub fn find(&self, key: i32) -> i32 {
        let Some(mut current) = self.root else {
            return NOT_FOUND;
        };
        loop {
            match &self.arena.get(current).body {
                NodeBody::Internal(internal) => {
                    let i = locate_child(&internal.keys, key);
                    current = internal.children[i];
                }
                NodeBody::Leaf(leaf) => {
                    return match leaf.values.binary_search_by_key(&key, |v| v.0) {
                        Ok(pos) => leaf.values[pos].1,
                        Err(_) => NOT_FOUND,
                    };
                }
            }
        }
    }

    /// Returns the queried cell's own value when it has a same-leaf
    /// successor; only crosses into the next leaf at a leaf boundary.
    /// See DESIGN.md for why this (deliberately) does not return the
    /// strictly-next cell in the same-leaf case.
    pub fn successor(&self, key: i32) -> i32 {
        let Some(leaf_id) = self.descend_to_leaf(key) else {
            return NOT_FOUND;
        };
        let NodeBody::Leaf(leaf) = &self.arena.get(leaf_id).body else {
            unreachable!("descend_to_leaf always returns a leaf")
        };
        match leaf.values.binary_search_by_key(&key, |v| v.0) {
            Err(_) => NOT_FOUND,
            Ok(pos) => {
                if pos + 1 < leaf.values.len() {
                    leaf.values[pos].1
                } else {
                    match leaf.next {
                        Some(next_id) => {
                            let NodeBody::Leaf(next_leaf) = &self.arena.get(next_id).body else {
                                unreachable!("leaf chain links only leaves")
                            };
                            next_leaf.values[0].1
                        }
                        None => NOT_FOUND,
                    }
                }
            }
        }
    }

    pub fn predecessor(&self, key: i32) -> i32 {
        let Some(leaf_id) = self.descend_to_leaf(key) else {
            return NOT_FOUND;
        };
        let NodeBody::Leaf(leaf) = &self.arena.get(leaf_id).body else {
            unreachable!("descend_to_leaf always returns a leaf")
        };
        match leaf.values.binary_search_by_key(&key, |v| v.0) {
            Err(_) => NOT_FOUND,
            Ok(pos) => {
                if pos > 0 {
                    leaf.values[pos].1
                } else {
                    match leaf.prev {
                        Some(prev_id) => {
                            let NodeBody::Leaf(prev_leaf) = &self.arena.get(prev_id).body else {
                                unreachable!("leaf chain links only leaves")
                            };
                            prev_leaf.values[prev_leaf.values.len() - 1].1
                        }
                        None => NOT_FOUND,
                    }
                }
            }
        }
    }

    fn descend_to_leaf(&self, key: i32) -> Option<NodeId> {
        let mut current = self.root?;
        loop {
            match &self.arena.get(current).body {
                NodeBody::Internal(internal) => {
                    let i = locate_child(&internal.keys, key);
                    current = internal.children[i];
                }
                NodeBody::Leaf(_) => return Some(current),
            }
        }
    }

    // =========================
    // Insertion
    // =========================

    pub fn insert(&mut self, key: i32, value: i32) {
        let Some(mut root_id) = self.root else {
            let mut leaf = Node::new_leaf(self.next_id());
            let NodeBody::Leaf(l) = &mut leaf.body else {
                unreachable!()
            };
            l.values.push((key, value));
            let id = self.arena.alloc(leaf);
            self.root = Some(id);
            self.min = Some(id);
            self.height = 0;
            self.num_leaves = 1;
            self.number_items = 1;
            return;
        };

        if num_children(self.arena.get(root_id)) == self.max_children {
            let new_root_id_source = self.next_id();
            let new_root_id = self.arena.alloc(Node::new_internal(new_root_id_source));
            let NodeBody::Internal(new_root) = &mut self.arena.get_mut(new_root_id).body else {
                unreachable!()
            };
            new_root.children.push(root_id);
            self.root = Some(new_root_id);
            self.height += 1;
            self.split_child(new_root_id, 0);
            root_id = new_root_id;
        }

        self.insert_descend(root_id, key, value);
    }

    fn insert_descend(&mut self, node_id: NodeId, key: i32, value: i32) {
        if self.arena.get(node_id).is_leaf() {
            let NodeBody::Leaf(leaf) = &mut self.arena.get_mut(node_id).body else {
                unreachable!()
            };
            match leaf.values.binary_search_by_key(&key, |v| v.0) {
                Ok(pos) => leaf.values[pos].1 = value,
                Err(pos) => {
                    leaf.values.insert(pos, (key, value));
                    leaf.resync_keys();
                    self.number_items += 1;
                }
            }
            return;
        }

        let mut i = {
            let NodeBody::Internal(internal) = &self.arena.get(node_id).body else {
                unreachable!()
            };
            locate_child(&internal.keys, key)
        };

        let child_full = {
            let NodeBody::Internal(internal) = &self.arena.get(node_id).body else {
                unreachable!()
            };
            num_children(self.arena.get(internal.children[i])) == self.max_children
        };

        if child_full {
            self.split_child(node_id, i);
            let NodeBody::Internal(internal) = &self.arena.get(node_id).body else {
                unreachable!()
            };
            if key > internal.keys[i] {
                i += 1;
            }
        }

        let child_id = {
            let NodeBody::Internal(internal) = &self.arena.get(node_id).body else {
                unreachable!()
            };
            internal.children[i]
        };
        self.insert_descend(child_id, key, value);
    }

    /// Splits the full child at `parent.children[i]`. Only ever called
    /// on a child known to be full; debug builds assert this.
    pub(crate) fn split_child(&mut self, parent_id: NodeId, i: usize) {
        let b = self.max_children;
        let keep = (b + 1) / 2;

        let child_id = {
            let NodeBody::Internal(parent) = &self.arena.get(parent_id).body else {
                panic!("split_child called with a non-internal parent")
            };
            parent.children[i]
        };

        trace!(
            "split_child: parent index {i} child_nonce {}",
            self.arena.get(child_id).id
        );

        let is_leaf = self.arena.get(child_id).is_leaf();
        let new_id_nonce = self.next_id();

        let (new_body, promoted) = if is_leaf {
            let NodeBody::Leaf(leaf) = &mut self.arena.get_mut(child_id).body else {
                unreachable!()
            };
            debug_assert_eq!(
                leaf.values.len(),
                b,
                "split_child invoked on a non-full leaf"
            );
            let promoted = leaf.values[keep - 1].0;
            let moved = leaf.values.split_off(keep);
            leaf.resync_keys();
            let old_next = leaf.next;
            let mut new_leaf = LeafNode {
                values: moved,
                keys: Vec::new(),
                next: old_next,
                prev: None,
            };
            new_leaf.resync_keys();
            (NodeBody::Leaf(new_leaf), promoted)
        } else {
            let NodeBody::Internal(internal) = &mut self.arena.get_mut(child_id).body else {
                unreachable!()
            };
            debug_assert_eq!(
                internal.children.len(),
                b,
                "split_child invoked on a non-full internal node"
            );
            let moved_children = internal.children.split_off(keep);
            let mut moved_keys = internal.keys.split_off(keep - 1);
            let promoted = moved_keys.remove(0);
            let new_internal = InternalNode {
                children: moved_children,
                keys: moved_keys,
            };
            (NodeBody::Internal(new_internal), promoted)
        };

        let new_id = self.arena.alloc(Node {
            id: new_id_nonce,
            body: new_body,
        });

        if is_leaf {
            let old_next = {
                let NodeBody::Leaf(new_leaf) = &self.arena.get(new_id).body else {
                    unreachable!()
                };
                new_leaf.next
            };
            if let Some(next_id) = old_next {
                let NodeBody::Leaf(next_leaf) = &mut self.arena.get_mut(next_id).body else {
                    unreachable!()
                };
                next_leaf.prev = Some(new_id);
            }
            {
                let NodeBody::Leaf(new_leaf) = &mut self.arena.get_mut(new_id).body else {
                    unreachable!()
                };
                new_leaf.prev = Some(child_id);
            }
            {
                let NodeBody::Leaf(child_leaf) = &mut self.arena.get_mut(child_id).body else {
                    unreachable!()
                };
                child_leaf.next = Some(new_id);
            }
            self.num_leaves += 1;
        }

        let NodeBody::Internal(parent) = &mut self.arena.get_mut(parent_id).body else {
            unreachable!()
        };
        parent.children.insert(i + 1, new_id);
        parent.keys.insert(i, promoted);
    }

    // =========================
    // Deletion
    // =========================

    pub fn delete(&mut self, key: i32) {
        let Some(root_id) = self.root else {
            return;
        };
        if num_children(self.arena.get(root_id)) == 0 {
            return;
        }

        self.delete_recursive(root_id, key);

        match &self.arena.get(root_id).body {
            NodeBody::Internal(internal) if internal.children.len() == 1 => {
                let only_child = internal.children[0];
                self.arena.free(root_id);
                self.root = Some(only_child);
                self.height -= 1;
            }
            NodeBody::Leaf(leaf) if leaf.values.is_empty() => {
                self.arena.free(root_id);
                self.root = None;
                self.min = None;
                self.height = -1;
                self.num_leaves -= 1;
            }
            _ => {}
        }
    }

    fn delete_recursive(&mut self, node_id: NodeId, key: i32) {
        if self.arena.get(node_id).is_leaf() {
            let NodeBody::Leaf(leaf) = &mut self.arena.get_mut(node_id).body else {
                unreachable!()
            };
            if let Ok(pos) = leaf.values.binary_search_by_key(&key, |v| v.0) {
                leaf.values.remove(pos);
                leaf.resync_keys();
                self.number_items -= 1;
            }
            return;
        }

        let i = {
            let NodeBody::Internal(internal) = &self.arena.get(node_id).body else {
                unreachable!()
            };
            locate_child(&internal.keys, key)
        };
        let child_id = {
            let NodeBody::Internal(internal) = &self.arena.get(node_id).body else {
                unreachable!()
            };
            internal.children[i]
        };

        self.delete_recursive(child_id, key);

        let child_empty = num_children(self.arena.get(child_id)) == 0;
        if !child_empty {
            return;
        }

        if self.arena.get(child_id).is_leaf() {
            let (prev, next) = {
                let NodeBody::Leaf(leaf) = &self.arena.get(child_id).body else {
                    unreachable!()
                };
                (leaf.prev, leaf.next)
            };
            match prev {
                Some(p) => {
                    let NodeBody::Leaf(pl) = &mut self.arena.get_mut(p).body else {
                        unreachable!()
                    };
                    pl.next = next;
                }
                None => self.min = next,
            }
            if let Some(n) = next {
                let NodeBody::Leaf(nl) = &mut self.arena.get_mut(n).body else {
                    unreachable!()
                };
                nl.prev = prev;
            }
            self.num_leaves -= 1;
        }

        self.arena.free(child_id);

        let NodeBody::Internal(internal) = &mut self.arena.get_mut(node_id).body else {
            unreachable!()
        };
        let keys_len = internal.keys.len();
        internal.children.remove(i);
        if i < keys_len {
            internal.keys.remove(i);
        } else if keys_len > 0 {
            internal.keys.remove(i - 1);
        }
    }

    // =========================
    // Diagnostics
    // =========================

    pub fn len(&self) -> usize {
        self.number_items
    }

    pub fn is_empty(&self) -> bool {
        self.number_items == 0
    }

    /// Mean of (value-cell-or-child count) across every live node.
    /// Diagnostic only; not used by any invariant.
    pub fn average_node_size(&self) -> f64 {
        if self.arena.live_count() == 0 {
            return 0.0;
        }
        let total: usize = self.arena.live_nodes().map(num_children).sum();
        total as f64 / self.arena.live_count() as f64
    }

    pub fn debug_dump(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        writeln!(out, "==========================").unwrap();
        let min_nonce = self.min.map(|id| self.arena.get(id).id).unwrap_or(0);
        writeln!(
            out,
            "Height: {}\nMax Children: {}\nMin: {}\nNumber of items: {}\nNumber of leaves: {}",
            self.height, self.max_children, min_nonce, self.number_items, self.num_leaves
        )
        .unwrap();
        self.dump_node(self.root, &mut out);
        writeln!(out, "==========================").unwrap();
        out
    }

    fn dump_node(&self, node: Option<NodeId>, out: &mut String) {
        use std::fmt::Write;
        writeln!(out, "--------------------------").unwrap();
        let Some(id) = node else {
            writeln!(out, "Empty").unwrap();
            writeln!(out, "--------------------------").unwrap();
            return;
        };
        let n = self.arena.get(id);
        write!(out, "ID: {}\nNumber of children: {}\nKeys: ", n.id, num_children(n)).unwrap();
        match &n.body {
            NodeBody::Leaf(leaf) => {
                for k in &leaf.keys {
                    write!(out, "{k}, ").unwrap();
                }
                write!(out, "\nValues: ").unwrap();
                for (k, v) in &leaf.values {
                    write!(out, "{k}:{v}, ").unwrap();
                }
                let next_nonce = leaf.next.map(|id| self.arena.get(id).id).unwrap_or(0);
                let prev_nonce = leaf.prev.map(|id| self.arena.get(id).id).unwrap_or(0);
                writeln!(
                    out,
                    "\nIs leaf? YES\nNext: {next_nonce}\nPrevious: {prev_nonce}"
                )
                .unwrap();
                writeln!(out, "--------------------------").unwrap();
            }
            NodeBody::Internal(internal) => {
                for k in &internal.keys {
                    write!(out, "{k}, ").unwrap();
                }
                write!(out, "\nChildren: ").unwrap();
                for c in &internal.children {
                    write!(out, "{}, ", self.arena.get(*c).id).unwrap();
                }
                writeln!(out, "\nIs leaf? NO").unwrap();
                writeln!(out, "--------------------------").unwrap();
                let children: Vec<NodeId> = internal.children.clone();
                for c in children {
                    self.dump_node(Some(c), out);
                }
            }
        }
    }

    /// Walks the leaf chain from `min`, yielding every stored cell in
    /// ascending key order. Used by the bulk packer's online form.
    pub fn leaf_chain(&self) -> LeafChainIter<'_> {
        LeafChainIter {
            tree: self,
            node: self.min,
            idx: 0,
        }
    }
}

pub struct LeafChainIter<'a> {
    tree: &'a Tree,
    node: Option<NodeId>,
    idx: usize,
}

impl<'a> Iterator for LeafChainIter<'a> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node_id = self.node?;
            let NodeBody::Leaf(leaf) = &self.tree.arena.get(node_id).body else {
                unreachable!("leaf chain links only leaves")
            };
            if self.idx < leaf.values.len() {
                let v = leaf.values[self.idx];
                self.idx += 1;
                return Some(v);
            }
            self.node = leaf.next;
            self.idx = 0;
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
