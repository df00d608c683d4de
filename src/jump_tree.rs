// =====================================================================
// File: jump_tree.rs
//
// The JumpTree policy layer (C4) and dictionary facade (C5). Holds
// the user-chosen height target `k` and threshold-triggers a widen or
// narrow of the branching factor `b` around each insert/delete,
// invoking the bulk packer before delegating the actual mutation to
// the B+-tree core. The core (`tree::core::Tree`) never rebuilds
// itself; only this layer decides when to.
// =====================================================================
use log::debug;

use crate::error::JumpTreeError;
use crate::tree::{pack_offline, pack_online, Tree};

/// Insertion threshold: `2 * floor(b/2)^k`. Once `number_items + 1`
/// reaches this, the tree is about to exceed the height-k budget at
/// the current `b`.
fn insertion_threshold(b: usize, k: i32) -> i64 {
    2 * (b / 2).pow(k as u32) as i64
}

/// Deletion threshold: `2 * floor((b-4)/2)^k`. Only meaningful when
/// `b > 4`; callers must guard that separately.
fn deletion_threshold(b: usize, k: i32) -> i64 {
    2 * ((b - 4) / 2).pow(k as u32) as i64
}

/// A dynamic ordered dictionary mapping `i32` keys to `i32` payload
/// ids, held at height at most `k` via periodic rebuilds.
pub struct JumpTree {
    tree: Tree,
    k: i32,
}

impl JumpTree {
    /// `k` is clamped to >= 0; `b` is clamped to >= 4.
    pub fn new(k: i32, b: usize) -> Self {
        Self {
            tree: Tree::new(b.max(4)),
            k: k.max(0),
        }
    }

    pub fn from_config(config: &crate::config::JumpTreeConfig) -> Self {
        let (k, b) = config.clamped();
        Self::new(k, b)
    }

    // =========================
    // Policy layer (C4)
    // =========================

    /// Upserts `key -> id`, widening `b` and rebuilding online first
    /// if the insert would exceed the height-k budget. Returns whether
    /// a rebuild occurred.
    pub fn insert(&mut self, key: i32, id: i32) -> bool {
        let b = self.tree.max_children;
        let threshold = insertion_threshold(b, self.k);
        let rebuilt = if self.tree.number_items as i64 + 1 >= threshold {
            let new_b = b + 2;
            debug!(
                "jumptree insert: rebuilding online, b {b} -> {new_b} (k={}, n={})",
                self.k, self.tree.number_items
            );
            self.tree = pack_online(&self.tree, new_b);
            true
        } else {
            false
        };
        self.tree.insert(key, id);
        rebuilt
    }

    /// Removes `key` if present, narrowing `b` and rebuilding online
    /// first if the tree has grown too sparse for its current `b`.
    /// Returns whether a rebuild occurred.
    pub fn delete(&mut self, key: i32) -> bool {
        let b = self.tree.max_children;
        let rebuilt = if b > 4 {
            let threshold = deletion_threshold(b, self.k);
            if self.tree.number_items as i64 - 1 <= threshold {
                let new_b = b - 2;
                debug!(
                    "jumptree delete: rebuilding online, b {b} -> {new_b} (k={}, n={})",
                    self.k, self.tree.number_items
                );
                self.tree = pack_online(&self.tree, new_b);
                true
            } else {
                false
            }
        } else {
            false
        };
        self.tree.delete(key);
        rebuilt
    }

    /// Rebuilds from an externally sorted key list, choosing `b` so
    /// the packed tree's height will not exceed `k`.
    fn rebuild_offline(&mut self, sorted_keys: &[(i32, i32)]) {
        let n = sorted_keys.len();
        let b = if self.k == 0 {
            // The formula below divides by k; at k = 0 the only way to
            // keep height <= 0 is a single leaf big enough to hold
            // every key, so size b to fit them all instead.
            n.max(4)
        } else {
            let root = ((n / 2) as f64).powf(1.0 / self.k as f64).floor();
            2 * (root as usize + 2)
        };
        let b = b.max(4);
        debug!("jumptree offline rebuild: n={n} k={} -> b={b}", self.k);
        self.tree = pack_offline(sorted_keys, b);
    }

    // =========================
    // Dictionary facade (C5)
    // =========================

    /// Bulk-loads from an unordered collection, sorting by key
    /// ascending first. A later key with a duplicate of an earlier
    /// key's value silently wins (last-write-wins after the sort).
    pub fn construct(&mut self, mut keys: Vec<(i32, i32)>) {
        keys.sort_by_key(|&(k, _)| k);
        self.rebuild_offline(&keys);
    }

    /// Like `construct`, but rejects batches containing a duplicate
    /// key instead of silently resolving it. `construct` itself keeps
    /// the plain silent-overwrite behavior.
    pub fn construct_checked(&mut self, mut keys: Vec<(i32, i32)>) -> Result<(), JumpTreeError> {
        keys.sort_by_key(|&(k, _)| k);
        for pair in keys.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(JumpTreeError::DuplicateKeyInBatch { key: pair[0].0 });
            }
        }
        self.rebuild_offline(&keys);
        Ok(())
    }

    /// Upserts `key -> id`.
    pub fn insert_key(&mut self, key: i32, id: i32) -> bool {
        self.insert(key, id)
    }

    /// Removes `key` if present; no-op otherwise.
    pub fn delete_key(&mut self, key: i32) -> bool {
        self.delete(key)
    }

    /// Returns the stored value, or -1 if absent.
    pub fn search(&self, key: i32) -> i32 {
        self.tree.find(key)
    }

    pub fn successor(&self, key: i32) -> i32 {
        self.tree.successor(key)
    }

    pub fn predecessor(&self, key: i32) -> i32 {
        self.tree.predecessor(key)
    }

    /// -1 for empty, otherwise the depth of the leaves.
    pub fn tree_height(&self) -> i32 {
        self.tree.height
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn name(&self) -> String {
        format!("JumpTree {}", self.k)
    }

    pub fn average_node_size(&self) -> f64 {
        self.tree.average_node_size()
    }

    /// Current branching factor `b`, mutated over the tree's lifetime
    /// by the policy layer's widen/narrow rebuilds.
    pub fn branching_factor(&self) -> usize {
        self.tree.max_children
    }

    /// Debug dump: Height/Max Children/Min/Number of items/Number of
    /// leaves header, then a preorder node traversal.
    pub fn print(&self) -> String {
        self.tree.debug_dump()
    }

    pub fn print_to(&self, w: &mut dyn std::fmt::Write) -> Result<(), JumpTreeError> {
        w.write_str(&self.print())?;
        Ok(())
    }
}

impl Default for JumpTree {
    fn default() -> Self {
        Self::new(5, 4)
    }
}
