//! Keel tree walk: build the CLRS red-black fixture, print it through the
//! formatter, then delete half of it.
//!
//! Demonstrates:
//!   1. Giving the tree a pool sub-arena and the formatter a scratch pool,
//!      each carved from its own permanent arena
//!   2. Registering a custom `{node}` printer
//!   3. Walking the tree in order and by structure
//!
//! Run with:
//!   RUST_LOG=trace cargo run --example tree_walk

use std::fmt::Write as _;

use keel::prelude::*;
use tracing_subscriber::EnvFilter;

/// What the `{node}` printer needs to describe one node.
struct NodeView {
    key: u32,
    value: u32,
    color: Color,
    depth: usize,
}

fn node_printer(arg: &Arg<'_>, out: &mut String) -> bool {
    match arg.downcast::<NodeView>() {
        Some(n) => {
            let color = match n.color {
                Color::Red => 'R',
                Color::Black => 'B',
            };
            write!(out, "{:indent$}{}={} [{color}]", "", n.key, n.value, indent = n.depth * 2).is_ok()
        }
        None => false,
    }
}

fn print_subtree<A: Allocator>(
    tree: &RbTree<A>,
    node: Option<Descriptor>,
    depth: usize,
    fmt: &Formatter,
    pool: &mut ScratchPool<'_>,
) -> Result<(), FormatError> {
    let Some(d) = node else {
        return Ok(());
    };
    let view = NodeView {
        key: tree.key(d),
        value: tree.value(d),
        color: tree.color(d),
        depth,
    };
    println!("{}", fmt.format(pool, "{node}", &[Arg::Custom(&view)])?);
    print_subtree(tree, tree.left(d), depth + 1, fmt, pool)?;
    print_subtree(tree, tree.right(d), depth + 1, fmt, pool)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut storage = LinearArena::new(ArenaConfig::new(128 * 1024))?;
    let mut scratch = LinearArena::new(ArenaConfig::new(ScratchConfig::DEFAULT_TOTAL_BYTES as usize))?;
    let tree_arena = storage.make_pool(64 * 1024, 4)?;
    let mut pool = ScratchPool::new(&mut scratch, ScratchConfig::default())?;

    let mut fmt = Formatter::new();
    fmt.register("{node}", node_printer);

    let mut tree = RbTree::new(tree_arena);
    for k in [24, 18, 26, 5, 20, 27, 2, 7, 23, 21] {
        tree.put(k, k * 10)?;
    }

    println!("structure:");
    print_subtree(&tree, tree.root(), 1, &fmt, &mut pool)?;

    let in_order: Vec<String> = tree.iter().map(|(_, e)| e.key.to_string()).collect();
    println!(
        "{}",
        fmt.format(&mut pool, "in order: {str}", &[Arg::Str(&in_order.join(" "))])?
    );

    for k in [18, 24, 2, 27, 21] {
        tree.remove(k);
    }
    let height = tree.check_invariants()?;
    println!(
        "{}",
        fmt.format(
            &mut pool,
            "after deleting 5 keys: {u32} nodes, black-height {u32}, {u32} slots",
            &[Arg::U32(tree.len()), Arg::U32(height), Arg::U32(tree.slots())],
        )?
    );
    print_subtree(&tree, tree.root(), 1, &fmt, &mut pool)?;
    Ok(())
}
