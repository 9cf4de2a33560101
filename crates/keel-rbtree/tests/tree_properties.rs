//! Red-black invariants under mixed workloads.

use std::collections::BTreeMap;

use keel_arena::{Allocator, LinearArena};
use keel_rbtree::{Color, Descriptor, RbTree};
use keel_test_utils::{clrs_keys, delete_schedule, shuffled_keys, test_arena};
use proptest::prelude::*;

#[test]
fn clrs_fixture_from_shared_keys() {
    let mut tree = RbTree::new(test_arena(16 * 1024));
    for k in clrs_keys() {
        tree.put(k, k).unwrap();
    }
    let root = tree.root().unwrap();
    assert_eq!(tree.key(root), 24);
    assert_eq!(tree.color(root), Color::Black);
    assert_eq!(tree.check_invariants(), Ok(2));
}

#[test]
fn shuffled_insert_then_partial_delete() {
    let keys = shuffled_keys(2_000, 42);
    let doomed = delete_schedule(&keys, 0.4, 42);
    let mut tree = RbTree::new(test_arena(1 << 20));
    for &k in &keys {
        tree.put(k, k ^ 0xffff).unwrap();
    }
    tree.check_invariants().unwrap();

    let survivors: Vec<(u32, Descriptor)> = keys
        .iter()
        .filter(|k| !doomed.contains(k))
        .map(|&k| (k, tree.find(k).unwrap()))
        .collect();
    for &k in &doomed {
        assert_eq!(tree.remove(k), Some(k ^ 0xffff));
    }
    tree.check_invariants().unwrap();
    assert_eq!(tree.len() as usize, survivors.len());
    for (k, d) in survivors {
        assert_eq!(tree.find(k), Some(d));
    }
}

#[test]
fn delete_heavy_churn_reuses_slots() {
    let mut tree = RbTree::new(test_arena(64 * 1024));
    for round in 0..20u32 {
        for k in 0..100 {
            tree.put(k, round).unwrap();
        }
        for k in 0..100 {
            tree.remove(k);
        }
    }
    assert!(tree.is_empty());
    assert_eq!(tree.slots(), 100);
}

#[test]
fn tree_in_a_free_list_sub_arena() {
    let mut root = LinearArena::with_capacity(1 << 16, true).unwrap();
    let heap = root.make_free_list(1 << 15).unwrap();
    let mut tree = RbTree::new(heap);
    for k in shuffled_keys(500, 3) {
        tree.put(k, k).unwrap();
    }
    tree.check_invariants().unwrap();
    // Old column buffers went back to the free list during growth.
    assert!(tree.arena().free_blocks() > 0);
    let heap = tree.into_arena();
    assert!(heap.used() <= heap.capacity());
}

#[derive(Clone, Debug)]
enum Op {
    Put(u32, u32),
    Remove(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u32..64, any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
        2 => (0u32..64).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn invariants_hold_after_every_operation(ops in proptest::collection::vec(op(), 1..300)) {
        let mut tree = RbTree::new(test_arena(1 << 18));
        let mut model = BTreeMap::new();
        for op in ops {
            match op {
                Op::Put(k, v) => {
                    let (_, inserted) = tree.put(k, v).unwrap();
                    prop_assert_eq!(inserted, model.insert(k, v).is_none());
                }
                Op::Remove(k) => {
                    prop_assert_eq!(tree.remove(k), model.remove(&k));
                }
            }
            prop_assert!(tree.check_invariants().is_ok());
            prop_assert_eq!(tree.len() as usize, model.len());
        }
        let entries: Vec<(u32, u32)> = tree.iter().map(|(_, e)| (e.key, e.value)).collect();
        let expected: Vec<(u32, u32)> = model.into_iter().collect();
        prop_assert_eq!(entries, expected);
    }

    #[test]
    fn update_keeps_shape(keys in proptest::collection::hash_set(any::<u32>(), 1..100), v in any::<u32>()) {
        let mut tree = RbTree::new(test_arena(1 << 16));
        for &k in &keys {
            tree.put(k, 0).unwrap();
        }
        let shape = |t: &RbTree<LinearArena<'static>>| -> Vec<_> {
            t.iter()
                .map(|(d, _)| (t.parent(d), t.left(d), t.right(d), t.color(d)))
                .collect()
        };
        let before = shape(&tree);
        for &k in &keys {
            let (_, inserted) = tree.put(k, v).unwrap();
            prop_assert!(!inserted);
        }
        prop_assert_eq!(shape(&tree), before);
        prop_assert!(tree.iter().all(|(_, e)| e.value == v));
    }
}
