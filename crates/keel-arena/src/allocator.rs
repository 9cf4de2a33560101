//! The [`Allocator`] capability shared by every arena discipline.

use keel_core::{ArenaError, Block};

/// Allocation policy of an arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discipline {
    /// Bump allocation; release reclaims only the most recent block.
    Linear,
    /// Fixed-size units; released runs are reused by exact length.
    Pool {
        /// Size of one unit in bytes.
        block_size: usize,
    },
    /// Best-fit reuse of released blocks.
    FreeList,
    /// Bump allocation; release is a no-op.
    Scratch,
}

/// An arena that hands out [`Block`]s from a contiguous region.
///
/// `allocate` takes a count of *units*. For byte-addressed disciplines a
/// unit is one byte; for [`Discipline::Pool`] it is the pool's block size.
/// [`Allocator::allocate_bytes`] converts a byte count for callers that do
/// not care which discipline they were handed.
pub trait Allocator {
    /// The arena's allocation policy.
    fn discipline(&self) -> Discipline;

    /// Size of one allocation unit in bytes.
    fn unit_size(&self) -> usize {
        1
    }

    /// Allocate `units` units.
    ///
    /// Fails fast with [`ArenaError::CapacityExceeded`] when the request
    /// cannot be met; the arena is unchanged on failure.
    fn allocate(&mut self, units: usize) -> Result<Block, ArenaError>;

    /// Return a block to the arena. What happens to the space depends on
    /// the discipline.
    ///
    /// # Panics
    ///
    /// Panics if `block` was not issued by this arena since its last reset.
    fn release(&mut self, block: Block);

    /// Reclaim everything. Every block issued so far becomes invalid.
    fn reset(&mut self);

    /// Bytes consumed from the front of the region.
    fn used(&self) -> usize;

    /// Total capacity in bytes.
    fn capacity(&self) -> usize;

    /// Bytes left in the unused tail.
    fn remaining(&self) -> usize {
        self.capacity() - self.used()
    }

    /// Current reset generation.
    fn generation(&self) -> u32;

    /// Read access to a block's bytes.
    fn bytes(&self, block: Block) -> &[u8];

    /// Write access to a block's bytes.
    fn bytes_mut(&mut self, block: Block) -> &mut [u8];

    /// Copy `min(src.len(), dst.len())` bytes from `src` into `dst`.
    fn copy_block(&mut self, src: Block, dst: Block);

    /// Allocate at least `bytes` bytes, rounding up to whole units.
    fn allocate_bytes(&mut self, bytes: usize) -> Result<Block, ArenaError> {
        self.allocate(bytes.div_ceil(self.unit_size()))
    }
}

impl<A: Allocator + ?Sized> Allocator for &mut A {
    fn discipline(&self) -> Discipline {
        (**self).discipline()
    }

    fn unit_size(&self) -> usize {
        (**self).unit_size()
    }

    fn allocate(&mut self, units: usize) -> Result<Block, ArenaError> {
        (**self).allocate(units)
    }

    fn release(&mut self, block: Block) {
        (**self).release(block)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn used(&self) -> usize {
        (**self).used()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn generation(&self) -> u32 {
        (**self).generation()
    }

    fn bytes(&self, block: Block) -> &[u8] {
        (**self).bytes(block)
    }

    fn bytes_mut(&mut self, block: Block) -> &mut [u8] {
        (**self).bytes_mut(block)
    }

    fn copy_block(&mut self, src: Block, dst: Block) {
        (**self).copy_block(src, dst)
    }
}

/// Forward the region-backed half of [`Allocator`] to a `region` field.
macro_rules! forward_to_region {
    () => {
        fn used(&self) -> usize {
            self.region.used()
        }

        fn capacity(&self) -> usize {
            self.region.capacity()
        }

        fn generation(&self) -> u32 {
            self.region.generation()
        }

        fn bytes(&self, block: keel_core::Block) -> &[u8] {
            self.region.bytes(block)
        }

        fn bytes_mut(&mut self, block: keel_core::Block) -> &mut [u8] {
            self.region.bytes_mut(block)
        }

        fn copy_block(&mut self, src: keel_core::Block, dst: keel_core::Block) {
            self.region.copy_block(src, dst)
        }
    };
}

pub(crate) use forward_to_region;
