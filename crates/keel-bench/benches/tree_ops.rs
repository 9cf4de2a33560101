//! Criterion micro-benchmarks for red-black tree operations.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use keel_bench::{populated_tree, tree_arena_bytes, TREE_SIZES};
use keel_rbtree::RbTree;
use keel_test_utils::{shuffled_keys, test_arena};

/// Benchmark: build a tree of `n` nodes from shuffled keys.
fn bench_tree_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_insert");
    for n in TREE_SIZES {
        let keys = shuffled_keys(n, 7);
        group.bench_with_input(BenchmarkId::from_parameter(n), &keys, |b, keys| {
            let mut tree = RbTree::new(test_arena(tree_arena_bytes(n)));
            b.iter(|| {
                for &k in keys {
                    tree.put(k, k).unwrap();
                }
                black_box(tree.len());
                tree.clear();
            });
        });
    }
    group.finish();
}

/// Benchmark: look up every key once.
fn bench_tree_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_find");
    for n in TREE_SIZES {
        let tree = populated_tree(n, 7);
        let probes = shuffled_keys(n, 8);
        group.bench_with_input(BenchmarkId::from_parameter(n), &probes, |b, probes| {
            b.iter(|| {
                for &k in probes {
                    black_box(tree.find(k));
                }
            });
        });
    }
    group.finish();
}

/// Benchmark: delete and reinsert the same key (free-slot reuse path).
fn bench_tree_delete_reinsert(c: &mut Criterion) {
    let mut tree = populated_tree(10_000, 7);
    let keys = shuffled_keys(10_000, 9);
    let mut i = 0;
    c.bench_function("tree_delete_reinsert_10k", |b| {
        b.iter(|| {
            let k = keys[i % keys.len()];
            let value = tree.remove(k).unwrap();
            tree.put(k, value).unwrap();
            i += 1;
        });
    });
}

/// Benchmark: full in-order traversal.
fn bench_tree_iter(c: &mut Criterion) {
    let tree = populated_tree(10_000, 7);
    c.bench_function("tree_iter_10k", |b| {
        b.iter(|| black_box(tree.iter().map(|(_, e)| e.value as u64).sum::<u64>()));
    });
}

criterion_group!(
    benches,
    bench_tree_insert,
    bench_tree_find,
    bench_tree_delete_reinsert,
    bench_tree_iter
);
criterion_main!(benches);
