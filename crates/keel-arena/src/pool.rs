//! Fixed-unit pool arena.

use keel_core::{ArenaError, Block};

use crate::allocator::{forward_to_region, Allocator, Discipline};
use crate::region::Region;

/// Arena that hands out whole multiples of a fixed `block_size`.
///
/// `allocate(count)` reserves `count * block_size` bytes. Released runs are
/// kept in a retired list and handed out again to the next request for the
/// same number of units before any new space is bumped; reuse is
/// exact-size, so retired runs never fragment.
pub struct PoolArena<'a> {
    region: Region<'a>,
    block_size: usize,
    /// Released runs available for exact-length reuse.
    retired: Vec<Block>,
}

impl<'a> PoolArena<'a> {
    pub(crate) fn from_region(region: Region<'a>, block_size: usize) -> Self {
        debug_assert!(block_size > 0);
        Self {
            region,
            block_size,
            retired: Vec::new(),
        }
    }

    /// Size of one unit in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of released runs waiting for reuse.
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }
}

impl Allocator for PoolArena<'_> {
    fn discipline(&self) -> Discipline {
        Discipline::Pool {
            block_size: self.block_size,
        }
    }

    fn unit_size(&self) -> usize {
        self.block_size
    }

    fn allocate(&mut self, units: usize) -> Result<Block, ArenaError> {
        let len = units
            .checked_mul(self.block_size)
            .ok_or(ArenaError::SizeOverflow {
                units,
                unit_size: self.block_size,
            })?;
        if len > 0 {
            if let Some(pos) = self.retired.iter().position(|r| r.len() as usize == len) {
                let block = self.retired.swap_remove(pos);
                self.region.prepare(block);
                return Ok(block);
            }
        }
        self.region.bump(len)
    }

    fn release(&mut self, block: Block) {
        self.region.check(block);
        assert!(
            block.len() as usize % self.block_size == 0,
            "{block} is not a whole number of {}-byte units",
            self.block_size
        );
        if block.is_empty() {
            return;
        }
        if !self.region.pop(block) {
            self.retired.push(block);
        }
    }

    fn reset(&mut self) {
        self.region.reset();
        self.retired.clear();
    }

    forward_to_region!();
}
