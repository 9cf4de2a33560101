//! Integration tests: arena lifecycle across disciplines.
//!
//! Exercises the behaviour callers rely on when mixing sub-arenas carved
//! from one parent: fail-fast exhaustion, reset rewinding, and scratch
//! pool checkout/release pairing.

use keel_arena::{
    Allocator, ArenaConfig, ArenaError, Discipline, LinearArena, ScratchConfig, ScratchPool,
};

#[test]
fn exhaustion_never_returns_partial_block() {
    let mut arena = LinearArena::new(ArenaConfig::new(100)).unwrap();
    arena.allocate(60).unwrap();
    let err = arena.allocate(41).unwrap_err();
    assert_eq!(
        err,
        ArenaError::CapacityExceeded {
            requested: 41,
            remaining: 40,
        }
    );
    assert_eq!(arena.used(), 60);
    // The remaining 40 bytes are still usable.
    assert!(arena.allocate(40).is_ok());
}

#[test]
fn reset_truly_rewinds_every_discipline() {
    let mut parent = LinearArena::new(ArenaConfig::new(4096)).unwrap();
    let mut linear = parent.carve_linear(512).unwrap();
    let first = linear.allocate(16).unwrap();
    linear.allocate(100).unwrap();
    linear.reset();
    assert_eq!(linear.used(), 0);
    assert_eq!(linear.allocate(16).unwrap().offset(), first.offset());
}

#[test]
fn sub_arenas_report_their_discipline() {
    let mut parent = LinearArena::new(ArenaConfig::new(4096)).unwrap();
    assert_eq!(parent.discipline(), Discipline::Linear);
    assert_eq!(
        parent.make_scratch(64).unwrap().discipline(),
        Discipline::Scratch
    );
    assert_eq!(
        parent.make_free_list(64).unwrap().discipline(),
        Discipline::FreeList
    );
    assert_eq!(
        parent.make_pool(64, 8).unwrap().discipline(),
        Discipline::Pool { block_size: 8 }
    );
    assert_eq!(parent.used(), 256);
}

#[test]
fn pool_of_n_denies_the_n_plus_first_checkout() {
    let mut parent = LinearArena::new(ArenaConfig::new(4096)).unwrap();
    let mut pool = ScratchPool::new(&mut parent, ScratchConfig::new(4, 1024)).unwrap();

    let mut handles = Vec::new();
    for _ in 0..4 {
        handles.push(pool.get_scratch().expect("slot available"));
    }
    assert!(pool.get_scratch().is_none());

    let released = handles.pop().unwrap();
    pool.release_scratch(released);
    let again = pool.get_scratch().expect("slot freed by release");
    handles.push(again);

    for h in handles {
        pool.release_scratch(h);
    }
    assert_eq!(pool.available(), 4);
}

#[test]
fn scratch_arenas_do_not_overlap() {
    let mut parent = LinearArena::new(ArenaConfig::new(4096)).unwrap();
    let mut pool = ScratchPool::new(&mut parent, ScratchConfig::new(2, 256)).unwrap();
    let a = pool.get_scratch().unwrap();
    let b = pool.get_scratch().unwrap();

    let block_a = pool.arena_mut(&a).allocate(128).unwrap();
    pool.arena_mut(&a).bytes_mut(block_a).fill(0xAA);
    let block_b = pool.arena_mut(&b).allocate(128).unwrap();
    pool.arena_mut(&b).bytes_mut(block_b).fill(0xBB);

    assert!(pool.arena(&a).bytes(block_a).iter().all(|&v| v == 0xAA));
    assert!(pool.arena(&b).bytes(block_b).iter().all(|&v| v == 0xBB));

    pool.release_scratch(a);
    pool.release_scratch(b);
}

#[test]
fn borrowed_allocator_forwards_to_arena() {
    fn fill<A: Allocator>(mut arena: A) -> usize {
        let block = arena.allocate_bytes(12).unwrap();
        arena.bytes_mut(block).fill(1);
        arena.used()
    }
    let mut arena = LinearArena::new(ArenaConfig::new(64)).unwrap();
    assert_eq!(fill(&mut arena), 12);
    assert_eq!(arena.used(), 12);
}
