// =====================================================================
// File: tree/pack.rs
//
// The bulk packer: builds a packed B+-tree in a single left-to-right
// pass over a sorted key stream, used by both the offline rebuild
// (sorted key slice) and the online rebuild (the current tree's leaf
// chain). Keeps every node along the right spine exactly
// ceil(b/2)-filled during construction; only the final right spine
// is left underfull, which is fine for both the height invariant and
// the density band.
// =====================================================================
use log::trace;

use super::core::Tree;
use super::node::{num_children, Node, NodeBody};

/// Builds a fresh tree from an externally sorted key slice.
pub fn pack_offline(sorted_keys: &[(i32, i32)], b: usize) -> Tree {
    pack_from_iter(Tree::new(b), sorted_keys.iter().copied())
}

/// Builds a fresh tree from `old`'s leaf chain (already sorted by
/// construction), at a new branching factor `b`.
pub fn pack_online(old: &Tree, b: usize) -> Tree {
    pack_from_iter(Tree::new(b), old.leaf_chain())
}

fn pack_from_iter<I: Iterator<Item = (i32, i32)>>(mut tree: Tree, items: I) -> Tree {
    let b = tree.max_children;

    let root_leaf = Node::new_leaf(tree.next_id());
    let root_id = tree.arena.alloc(root_leaf);
    tree.root = Some(root_id);
    tree.min = Some(root_id);
    tree.height = 0;
    tree.num_leaves = 1;

    // right_spine[j] is the index, within the spine node at depth j,
    // where the next insertion/descent lands.
    let mut right_spine: Vec<usize> = vec![0];

    for (key, value) in items {
        if num_children(tree.arena.get(tree.root.unwrap())) == b {
            let old_root = tree.root.unwrap();
            let new_root_id_source = tree.next_id();
            let new_root = tree.arena.alloc(Node::new_internal(new_root_id_source));
            {
                let NodeBody::Internal(nr) = &mut tree.arena.get_mut(new_root).body else {
                    unreachable!()
                };
                nr.children.push(old_root);
            }
            tree.root = Some(new_root);
            tree.height += 1;
            tree.split_child(new_root, 0);

            right_spine.push(0);
            let new_height = tree.height as usize;
            right_spine[new_height] = 1;
            right_spine[new_height - 1] -= (b + 1) / 2;
            trace!("pack: grew root to height {new_height}");
        }

        let mut current = tree.root.unwrap();
        for depth in (1..=tree.height as usize).rev() {
            let child_idx = right_spine[depth];
            let child_id = {
                let NodeBody::Internal(internal) = &tree.arena.get(current).body else {
                    unreachable!()
                };
                internal.children[child_idx]
            };
            if num_children(tree.arena.get(child_id)) == b {
                tree.split_child(current, child_idx);
                right_spine[depth] += 1;
                right_spine[depth - 1] -= (b + 1) / 2;
            }
            let child_idx = right_spine[depth];
            current = {
                let NodeBody::Internal(internal) = &tree.arena.get(current).body else {
                    unreachable!()
                };
                internal.children[child_idx]
            };
        }

        let NodeBody::Leaf(leaf) = &mut tree.arena.get_mut(current).body else {
            unreachable!("right-spine walk always bottoms out at a leaf")
        };
        if !leaf.values.is_empty() {
            let prev_idx = leaf.values.len() - 1;
            leaf.keys.push(leaf.values[prev_idx].0);
        }
        leaf.values.push((key, value));
        tree.number_items += 1;
        right_spine[0] += 1;
    }

    tree
}
