// =====================================================================
// File: tree/node.rs
//
// Defines the fixed-shape node storage used by the B+-tree core: the
// `Node`/`NodeBody` representation, the `NodeId` handle into the
// per-tree arena, and the arena itself.
//
// A node is one of two variants, tagged by `NodeBody`, and the core
// never converts a live node between variants. Each node carries a
// nonce `id`, drawn from a `NodeIdSource`, used only for
// human-readable printing (see `JumpTree::print`) — it carries no
// semantic meaning and is not guaranteed stable across runs.
// =====================================================================
use rand::Rng;

/// Handle into a tree's node arena. Cheap to copy, meaningless outside
/// the arena that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// A leaf's ordered value cells, plus the leaf-chain sibling links and
/// the left-biased separator key array described in the data model.
#[derive(Debug, Clone)]
pub struct LeafNode {
    pub values: Vec<(i32, i32)>,
    pub keys: Vec<i32>,
    pub next: Option<NodeId>,
    pub prev: Option<NodeId>,
}

impl LeafNode {
    fn empty() -> Self {
        Self {
            values: Vec::new(),
            keys: Vec::new(),
            next: None,
            prev: None,
        }
    }

    /// Rebuilds the left-biased separator array from the value cells.
    /// `keys[i]` is the key of the i-th cell for every cell except the
    /// last. Cheap relative to the branching factor, and simpler than
    /// shifting the array by hand on every insert/delete.
    pub fn resync_keys(&mut self) {
        let cut = self.values.len().saturating_sub(1);
        self.keys.clear();
        self.keys.extend(self.values[..cut].iter().map(|(k, _)| *k));
    }
}

/// An internal node's ordered children and separator keys.
#[derive(Debug, Clone)]
pub struct InternalNode {
    pub children: Vec<NodeId>,
    pub keys: Vec<i32>,
}

impl InternalNode {
    fn empty() -> Self {
        Self {
            children: Vec::new(),
            keys: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum NodeBody {
    Leaf(LeafNode),
    Internal(InternalNode),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: u64,
    pub body: NodeBody,
}

impl Node {
    pub fn new_leaf(id: u64) -> Self {
        Self {
            id,
            body: NodeBody::Leaf(LeafNode::empty()),
        }
    }

    pub fn new_internal(id: u64) -> Self {
        Self {
            id,
            body: NodeBody::Internal(InternalNode::empty()),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.body, NodeBody::Leaf(_))
    }
}

/// Number of occupied slots: value cells for a leaf, children for an
/// internal node.
pub fn num_children(node: &Node) -> usize {
    match &node.body {
        NodeBody::Leaf(leaf) => leaf.values.len(),
        NodeBody::Internal(internal) => internal.children.len(),
    }
}

/// Finds the first index `i` with `key <= keys[i]`, or the last valid
/// child index if none qualifies (the `<=`-left routing rule).
pub fn locate_child(keys: &[i32], key: i32) -> usize {
    keys.iter().position(|&s| key <= s).unwrap_or(keys.len())
}

/// Generates the node-identity nonces used purely for printing.
/// External harnesses that need deterministic ids (e.g. golden-output
/// tests) can substitute their own via `Tree::with_id_source`.
pub trait NodeIdSource {
    fn next_id(&mut self) -> u64;
}

pub struct RandomNodeIdSource {
    rng: rand::rngs::ThreadRng,
}

impl Default for RandomNodeIdSource {
    fn default() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl NodeIdSource for RandomNodeIdSource {
    fn next_id(&mut self) -> u64 {
        self.rng.r#gen()
    }
}

/// Owns every node reachable from a single tree. Freeing a node does
/// not recurse into children; tree-level free walks the tree (or, for
/// a whole-tree rebuild, just drops the arena).
#[derive(Debug, Default)]
pub struct Arena {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.0 as usize] = Some(node);
            id
        } else {
            self.slots.push(Some(node));
            NodeId((self.slots.len() - 1) as u32)
        }
    }

    pub fn free(&mut self, id: NodeId) {
        self.slots[id.0 as usize] = None;
        self.free.push(id);
    }

    pub fn get(&self, id: NodeId) -> &Node {
        self.slots[id.0 as usize]
            .as_ref()
            .expect("dangling NodeId: node was freed or never allocated")
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.0 as usize]
            .as_mut()
            .expect("dangling NodeId: node was freed or never allocated")
    }

    /// Number of live nodes. Since every `free` call removes a node at
    /// the moment it becomes unreachable, this always equals the
    /// number of nodes reachable from the tree's root.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn live_nodes(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }
}
