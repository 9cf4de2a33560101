//! Bump-allocated arena, and the parent of every derived arena.

use keel_core::{ArenaError, Block, ConfigError};
use tracing::debug;

use crate::allocator::{forward_to_region, Allocator, Discipline};
use crate::config::ArenaConfig;
use crate::free_list::FreeListArena;
use crate::pool::PoolArena;
use crate::region::{Duration, Region};
use crate::scratch::ScratchArena;

/// Linear (bump) arena.
///
/// Allocations are carved from the unused tail and `used` only grows until
/// [`Allocator::reset`]. Release follows stack discipline: freeing the most
/// recent block gives its space back, freeing anything else leaks the space
/// until the next reset (and logs it at debug level).
///
/// A `LinearArena` is also the only arena that can act as a parent: the
/// `carve_*`/`make_*` constructors hand out sub-arenas that borrow a slice
/// of this arena's linear region.
pub struct LinearArena<'a> {
    region: Region<'a>,
}

impl LinearArena<'static> {
    /// Create a permanent, heap-backed arena.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        let region = Region::owned(config.size, config.zeroed)?;
        debug!(size = config.size, zeroed = config.zeroed, "created arena");
        Ok(Self { region })
    }

    /// Create a permanent arena of `size` bytes.
    pub fn with_capacity(size: usize, zeroed: bool) -> Result<Self, ArenaError> {
        Self::new(ArenaConfig { size, zeroed })
    }
}

impl<'a> LinearArena<'a> {
    /// Carve a linear sub-arena of `size` bytes.
    pub fn carve_linear(&mut self, size: usize) -> Result<LinearArena<'_>, ArenaError> {
        let zeroed = self.region.zeroed();
        let data = self.region.carve(size)?;
        debug!(size, "carved linear sub-arena");
        Ok(LinearArena {
            region: Region::borrowed(data, zeroed, Duration::Permanent),
        })
    }

    /// Carve a scratch sub-arena of `size` bytes.
    pub fn make_scratch(&mut self, size: usize) -> Result<ScratchArena<'_>, ArenaError> {
        let zeroed = self.region.zeroed();
        let data = self.region.carve(size)?;
        debug!(size, "carved scratch sub-arena");
        Ok(ScratchArena::from_region(Region::borrowed(
            data,
            zeroed,
            Duration::Scratch,
        )))
    }

    /// Carve a pool sub-arena of `size` bytes handing out `block_size` units.
    pub fn make_pool(
        &mut self,
        size: usize,
        block_size: usize,
    ) -> Result<PoolArena<'_>, ArenaError> {
        if block_size == 0 {
            return Err(ConfigError::BlockSizeZero.into());
        }
        let zeroed = self.region.zeroed();
        let data = self.region.carve(size)?;
        debug!(size, block_size, "carved pool sub-arena");
        Ok(PoolArena::from_region(
            Region::borrowed(data, zeroed, Duration::Permanent),
            block_size,
        ))
    }

    /// Carve a free-list sub-arena of `size` bytes.
    pub fn make_free_list(&mut self, size: usize) -> Result<FreeListArena<'_>, ArenaError> {
        let zeroed = self.region.zeroed();
        let data = self.region.carve(size)?;
        debug!(size, "carved free-list sub-arena");
        Ok(FreeListArena::from_region(Region::borrowed(
            data,
            zeroed,
            Duration::Permanent,
        )))
    }

    /// Carve `count` equal slices of `each` bytes.
    pub(crate) fn split(&mut self, count: usize, each: usize) -> Result<Vec<&mut [u8]>, ArenaError> {
        self.region.split(count, each)
    }

    /// Whether allocations are zero-filled.
    pub fn zeroed(&self) -> bool {
        self.region.zeroed()
    }
}

impl Allocator for LinearArena<'_> {
    fn discipline(&self) -> Discipline {
        Discipline::Linear
    }

    fn allocate(&mut self, units: usize) -> Result<Block, ArenaError> {
        self.region.bump(units)
    }

    fn release(&mut self, block: Block) {
        if !self.region.pop(block) {
            debug!(
                %block,
                used = self.region.used(),
                "linear release of a non-top block; space is lost until reset"
            );
        }
    }

    fn reset(&mut self) {
        self.region.reset();
    }

    forward_to_region!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_are_contiguous() {
        let mut arena = LinearArena::with_capacity(256, true).unwrap();
        let a = arena.allocate(10).unwrap();
        let b = arena.allocate(20).unwrap();
        assert_eq!(a.offset(), 0);
        assert_eq!(b.offset(), 10);
        assert_eq!(arena.used(), 30);
    }

    #[test]
    fn exhaustion_is_an_error() {
        let mut arena = LinearArena::with_capacity(16, true).unwrap();
        arena.allocate(16).unwrap();
        assert!(matches!(
            arena.allocate(1),
            Err(ArenaError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn release_of_top_block_reclaims() {
        let mut arena = LinearArena::with_capacity(64, true).unwrap();
        arena.allocate(8).unwrap();
        let top = arena.allocate(8).unwrap();
        arena.release(top);
        assert_eq!(arena.used(), 8);
    }

    #[test]
    fn release_of_buried_block_leaks() {
        let mut arena = LinearArena::with_capacity(64, true).unwrap();
        let buried = arena.allocate(8).unwrap();
        arena.allocate(8).unwrap();
        arena.release(buried);
        assert_eq!(arena.used(), 16);
    }

    #[test]
    fn reset_rewinds_to_first_offset() {
        let mut arena = LinearArena::with_capacity(64, true).unwrap();
        let first = arena.allocate(5).unwrap();
        arena.allocate(7).unwrap();
        arena.reset();
        assert_eq!(arena.used(), 0);
        let again = arena.allocate(5).unwrap();
        assert_eq!(again.offset(), first.offset());
    }

    #[test]
    fn carved_sub_arena_consumes_parent_space() {
        let mut parent = LinearArena::with_capacity(128, true).unwrap();
        {
            let mut child = parent.carve_linear(32).unwrap();
            assert_eq!(child.capacity(), 32);
            child.allocate(32).unwrap();
            assert!(child.allocate(1).is_err());
        }
        assert_eq!(parent.used(), 32);
    }

    #[test]
    fn make_pool_rejects_zero_block_size() {
        let mut parent = LinearArena::with_capacity(128, true).unwrap();
        assert_eq!(
            parent.make_pool(64, 0).err(),
            Some(ArenaError::InvalidConfig(ConfigError::BlockSizeZero))
        );
        assert_eq!(parent.used(), 0);
    }

    #[test]
    fn sub_arena_larger_than_parent_fails() {
        let mut parent = LinearArena::with_capacity(16, true).unwrap();
        assert!(parent.make_scratch(17).is_err());
    }

    #[test]
    fn zero_sized_allocation_consumes_nothing() {
        let mut arena = LinearArena::with_capacity(16, true).unwrap();
        let b = arena.allocate(0).unwrap();
        assert!(b.is_empty());
        assert_eq!(arena.used(), 0);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn used_is_monotonic_and_bounded(
                sizes in proptest::collection::vec(0usize..64, 1..40),
            ) {
                let mut arena = LinearArena::with_capacity(512, false).unwrap();
                let mut last = 0;
                for size in sizes {
                    let remaining = arena.remaining();
                    match arena.allocate(size) {
                        Ok(block) => {
                            prop_assert_eq!(block.len() as usize, size);
                            prop_assert!(size <= remaining);
                        }
                        Err(_) => prop_assert!(size > remaining),
                    }
                    prop_assert!(arena.used() >= last);
                    prop_assert!(arena.used() <= arena.capacity());
                    last = arena.used();
                }
            }
        }
    }
}
