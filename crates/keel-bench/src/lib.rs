//! Benchmark profiles for the Keel arena toolkit.
//!
//! - [`tree_arena_bytes`]: arena budget that fits a tree of `n` nodes
//! - [`populated_tree`]: a tree filled with a seeded permutation of `0..n`

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use keel_arena::LinearArena;
use keel_rbtree::RbTree;
use keel_test_utils::{shuffled_keys, test_arena};

/// Tree sizes every tree benchmark runs at.
pub const TREE_SIZES: [u32; 3] = [1_000, 10_000, 100_000];

/// Bytes of linear arena needed to build a tree of `n` nodes by insertion.
///
/// A node costs 21 bytes across its five columns; growth leaves every
/// older buffer behind in a linear arena, which at most doubles that.
pub fn tree_arena_bytes(n: u32) -> usize {
    let slots = (n as usize).max(10).next_power_of_two() * 2;
    slots * 21 * 2 + 4096
}

/// A tree holding the keys `0..n` (value = key), inserted in a seeded order.
pub fn populated_tree(n: u32, seed: u64) -> RbTree<LinearArena<'static>> {
    let mut tree = RbTree::new(test_arena(tree_arena_bytes(n)));
    for k in shuffled_keys(n, seed) {
        if let Err(e) = tree.put(k, k) {
            panic!("benchmark arena too small for {n} nodes: {e}");
        }
    }
    tree
}
