//! Best-fit free-list arena.

use keel_core::{ArenaError, Block};

use crate::allocator::{forward_to_region, Allocator, Discipline};
use crate::region::Region;

/// Arena that reuses released blocks with a best-fit search.
///
/// Released blocks are kept in a list sorted by address. `allocate` picks
/// the smallest free block that is large enough; if none fits it falls
/// back to bumping fresh space. Release does not merge neighbours, so
/// long alloc/free cycles can fragment the list; call
/// [`FreeListArena::defragment`] to merge adjacent blocks explicitly.
pub struct FreeListArena<'a> {
    region: Region<'a>,
    /// Free blocks, sorted by offset, pairwise disjoint.
    free: Vec<Block>,
}

impl<'a> FreeListArena<'a> {
    /// A free block is split only if the leftover is at least this many bytes;
    /// smaller leftovers are handed out with the block.
    pub const MIN_FRAGMENT: usize = 8;

    pub(crate) fn from_region(region: Region<'a>) -> Self {
        Self {
            region,
            free: Vec::new(),
        }
    }

    /// Number of blocks on the free list.
    pub fn free_blocks(&self) -> usize {
        self.free.len()
    }

    /// Total bytes held on the free list.
    pub fn free_bytes(&self) -> usize {
        self.free.iter().map(|b| b.len() as usize).sum()
    }

    /// Merge address-adjacent free blocks and give a trailing free block
    /// back to the bump region.
    ///
    /// Returns the number of merges performed.
    pub fn defragment(&mut self) -> usize {
        let mut merged: Vec<Block> = Vec::with_capacity(self.free.len());
        let mut merges = 0;
        for block in self.free.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.end() == block.offset() as usize => {
                    *prev = Block::new(prev.offset(), prev.len() + block.len(), prev.generation());
                    merges += 1;
                }
                _ => merged.push(block),
            }
        }
        if let Some(last) = merged.last() {
            if last.end() == self.region.used() {
                self.region.rewind(last.offset() as usize);
                merged.pop();
            }
        }
        self.free = merged;
        merges
    }

    fn best_fit(&self, len: usize) -> Option<usize> {
        self.free
            .iter()
            .enumerate()
            .filter(|(_, b)| b.len() as usize >= len)
            .min_by_key(|(_, b)| b.len())
            .map(|(i, _)| i)
    }
}

impl Allocator for FreeListArena<'_> {
    fn discipline(&self) -> Discipline {
        Discipline::FreeList
    }

    fn allocate(&mut self, units: usize) -> Result<Block, ArenaError> {
        if units == 0 {
            return self.region.bump(0);
        }
        let Some(pos) = self.best_fit(units) else {
            return self.region.bump(units);
        };
        let found = self.free[pos];
        let leftover = found.len() as usize - units;
        let block = if leftover >= Self::MIN_FRAGMENT {
            // Keep the tail on the list; its address order is unchanged.
            self.free[pos] = Block::new(
                found.offset() + units as u32,
                leftover as u32,
                found.generation(),
            );
            Block::new(found.offset(), units as u32, found.generation())
        } else {
            self.free.remove(pos)
        };
        self.region.prepare(block);
        Ok(block)
    }

    fn release(&mut self, block: Block) {
        self.region.check(block);
        if block.is_empty() {
            return;
        }
        let pos = self.free.partition_point(|b| b.offset() < block.offset());
        let overlaps_prev = pos > 0 && self.free[pos - 1].end() > block.offset() as usize;
        let overlaps_next = self
            .free
            .get(pos)
            .is_some_and(|next| (next.offset() as usize) < block.end());
        assert!(!overlaps_prev && !overlaps_next, "double release of {block}");
        self.free.insert(pos, block);
    }

    fn reset(&mut self) {
        self.region.reset();
        self.free.clear();
    }

    forward_to_region!();
}
