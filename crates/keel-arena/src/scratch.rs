//! Scratch arenas and the pool that hands them out.
//!
//! A [`ScratchArena`] is a bump allocator whose per-block release is a
//! no-op: temporaries are reclaimed in bulk when the arena is reset. A
//! [`ScratchPool`] partitions one slice of a parent arena into a fixed
//! number of scratch arenas and lends them out by [`ScratchHandle`], so
//! that independent temporary computations (e.g. nested formatting calls)
//! never write into each other's buffers.

use keel_core::{ArenaError, Block, PoolInstanceId};
use tracing::{debug, trace, warn};

use crate::allocator::{forward_to_region, Allocator, Discipline};
use crate::config::ScratchConfig;
use crate::linear::LinearArena;
use crate::region::{Duration, Region};

/// Bump-allocated arena for short-lived temporaries.
pub struct ScratchArena<'a> {
    region: Region<'a>,
}

impl<'a> ScratchArena<'a> {
    pub(crate) fn from_region(region: Region<'a>) -> Self {
        debug_assert_eq!(region.duration(), Duration::Scratch);
        Self { region }
    }
}

impl Allocator for ScratchArena<'_> {
    fn discipline(&self) -> Discipline {
        Discipline::Scratch
    }

    fn allocate(&mut self, units: usize) -> Result<Block, ArenaError> {
        self.region.bump(units)
    }

    /// No-op: scratch space is only reclaimed by [`Allocator::reset`].
    fn release(&mut self, _block: Block) {}

    fn reset(&mut self) {
        self.region.reset();
    }

    forward_to_region!();
}

struct Slot<'a> {
    in_use: bool,
    arena: ScratchArena<'a>,
}

/// Proof of a scratch-arena checkout.
///
/// Not `Clone`: releasing consumes the handle, so a slot cannot be
/// released twice. A handle that is dropped without being released keeps
/// its slot checked out for the life of the pool.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a scratch handle must be passed back to `release_scratch`"]
pub struct ScratchHandle {
    pool: PoolInstanceId,
    slot: usize,
}

impl ScratchHandle {
    /// Index of the checked-out slot.
    pub fn slot(&self) -> usize {
        self.slot
    }
}

/// A fixed set of scratch arenas carved from one parent arena.
///
/// The pool borrows the parent for its whole lifetime and dies with it;
/// individual slots are never destroyed.
pub struct ScratchPool<'a> {
    id: PoolInstanceId,
    slots: Vec<Slot<'a>>,
    arena_size: usize,
}

impl<'a> ScratchPool<'a> {
    /// Partition `config.total_bytes` of `parent` into
    /// `config.arena_count` equally sized scratch arenas.
    pub fn new(parent: &'a mut LinearArena<'_>, config: ScratchConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let arena_size = config.arena_size();
        let zeroed = parent.zeroed();
        let parts = parent.split(config.arena_count, arena_size)?;
        let slots = parts
            .into_iter()
            .map(|data| Slot {
                in_use: false,
                arena: ScratchArena::from_region(Region::borrowed(data, zeroed, Duration::Scratch)),
            })
            .collect();
        let id = PoolInstanceId::next();
        debug!(
            pool = %id,
            arena_count = config.arena_count,
            arena_size,
            "initialised scratch pool"
        );
        Ok(Self {
            id,
            slots,
            arena_size,
        })
    }

    /// Check out the first free scratch arena.
    ///
    /// Returns `None` when every slot is in use. That is back-pressure the
    /// caller must handle, not a condition to ignore.
    pub fn get_scratch(&mut self) -> Option<ScratchHandle> {
        let Some(slot) = self.slots.iter().position(|s| !s.in_use) else {
            warn!(pool = %self.id, slots = self.slots.len(), "scratch pool exhausted");
            return None;
        };
        self.slots[slot].in_use = true;
        trace!(pool = %self.id, slot, "scratch checked out");
        Some(ScratchHandle { pool: self.id, slot })
    }

    /// Reset the handle's arena and return its slot to the pool.
    ///
    /// # Panics
    ///
    /// Panics if the handle was issued by a different pool.
    pub fn release_scratch(&mut self, handle: ScratchHandle) {
        let slot = self.slot_mut(&handle);
        debug_assert!(slot.in_use);
        slot.arena.reset();
        slot.in_use = false;
        trace!(pool = %self.id, slot = handle.slot, "scratch released");
    }

    /// The arena behind a checked-out handle.
    pub fn arena(&self, handle: &ScratchHandle) -> &ScratchArena<'a> {
        self.assert_owned(handle);
        &self.slots[handle.slot].arena
    }

    /// Mutable access to the arena behind a checked-out handle.
    pub fn arena_mut(&mut self, handle: &ScratchHandle) -> &mut ScratchArena<'a> {
        &mut self.slot_mut(handle).arena
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool has no slots (never true for a validated config).
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots currently checked out.
    pub fn in_use(&self) -> usize {
        self.slots.iter().filter(|s| s.in_use).count()
    }

    /// Number of slots free for checkout.
    pub fn available(&self) -> usize {
        self.len() - self.in_use()
    }

    /// Capacity of each scratch arena in bytes.
    pub fn arena_size(&self) -> usize {
        self.arena_size
    }

    /// This pool's unique instance id.
    pub fn id(&self) -> PoolInstanceId {
        self.id
    }

    fn assert_owned(&self, handle: &ScratchHandle) {
        assert!(
            handle.pool == self.id,
            "scratch handle from pool {} used with pool {}",
            handle.pool,
            self.id
        );
    }

    fn slot_mut(&mut self, handle: &ScratchHandle) -> &mut Slot<'a> {
        self.assert_owned(handle);
        &mut self.slots[handle.slot]
    }
}
