//! Backing storage shared by every arena discipline.
//!
//! A [`Region`] is a contiguous byte buffer with a bump cursor. It is
//! either owned (a heap allocation made once at construction) or a
//! mutable borrow of a parent arena's linear space. Disciplines layer
//! their release policy on top; the region itself only knows how to bump,
//! rewind, resolve and reset.

use std::ops::{Deref, DerefMut};

use keel_core::{ArenaError, Block, ConfigError};

use crate::config::ArenaConfig;

/// How long allocations from an arena are expected to live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Duration {
    /// Lives until the arena is reset or dropped; per-block release is honoured
    /// where the discipline supports it.
    Permanent,
    /// Short-lived temporaries; per-block release is a no-op and space is
    /// reclaimed only in bulk.
    Scratch,
}

enum Storage<'a> {
    Owned(Box<[u8]>),
    Borrowed(&'a mut [u8]),
}

impl Deref for Storage<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Owned(data) => data,
            Self::Borrowed(data) => data,
        }
    }
}

impl DerefMut for Storage<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        match self {
            Self::Owned(data) => data,
            Self::Borrowed(data) => data,
        }
    }
}

/// A contiguous byte buffer with a bump cursor and a reset generation.
///
/// Invariant: `used <= capacity` at all times.
pub struct Region<'a> {
    storage: Storage<'a>,
    /// Bump pointer: bytes consumed from the front of `storage`.
    used: usize,
    /// Incremented on every reset; stamped into each issued [`Block`].
    generation: u32,
    zeroed: bool,
    duration: Duration,
}

impl Region<'static> {
    /// Allocate an owned region of `size` bytes from the system heap.
    pub fn owned(size: usize, zeroed: bool) -> Result<Self, ConfigError> {
        ArenaConfig { size, zeroed }.validate()?;
        Ok(Self {
            storage: Storage::Owned(vec![0u8; size].into_boxed_slice()),
            used: 0,
            generation: 0,
            zeroed,
            duration: Duration::Permanent,
        })
    }
}

impl<'a> Region<'a> {
    /// Wrap a slice borrowed from a parent arena.
    pub(crate) fn borrowed(data: &'a mut [u8], zeroed: bool, duration: Duration) -> Self {
        Self {
            storage: Storage::Borrowed(data),
            used: 0,
            generation: 0,
            zeroed,
            duration,
        }
    }

    /// Bump-allocate `len` bytes from the unused tail.
    ///
    /// Fails without moving the cursor if fewer than `len` bytes remain.
    pub fn bump(&mut self, len: usize) -> Result<Block, ArenaError> {
        if len > self.remaining() {
            return Err(ArenaError::CapacityExceeded {
                requested: len,
                remaining: self.remaining(),
            });
        }
        let offset = self.used;
        self.used += len;
        if self.zeroed {
            self.storage[offset..offset + len].fill(0);
        }
        Ok(Block::new(offset as u32, len as u32, self.generation))
    }

    /// Bump-allocate `len` bytes and borrow them for a derived arena.
    pub(crate) fn carve(&mut self, len: usize) -> Result<&mut [u8], ArenaError> {
        let block = self.bump(len)?;
        Ok(&mut self.storage[block.range()])
    }

    /// Bump-allocate `count * each` bytes and borrow them as `count`
    /// disjoint slices of `each` bytes.
    pub(crate) fn split(&mut self, count: usize, each: usize) -> Result<Vec<&mut [u8]>, ArenaError> {
        let total = count
            .checked_mul(each)
            .ok_or(ArenaError::SizeOverflow {
                units: count,
                unit_size: each,
            })?;
        let block = self.bump(total)?;
        if each == 0 {
            return Ok((0..count).map(|_| <&mut [u8]>::default()).collect());
        }
        Ok(self.storage[block.range()].chunks_exact_mut(each).collect())
    }

    /// Give back `block` if it is the most recent bump allocation.
    ///
    /// Returns `false` (and changes nothing) for any other block.
    pub fn pop(&mut self, block: Block) -> bool {
        self.check(block);
        if block.end() == self.used {
            self.used = block.offset() as usize;
            true
        } else {
            false
        }
    }

    /// Move the cursor back to `offset`, which must not be past the cursor.
    pub(crate) fn rewind(&mut self, offset: usize) {
        assert!(offset <= self.used, "rewind to {offset} past cursor {}", self.used);
        self.used = offset;
    }

    /// Zero-fill `block` if this region zero-initialises allocations.
    pub(crate) fn prepare(&mut self, block: Block) {
        if self.zeroed {
            self.storage[block.range()].fill(0);
        }
    }

    /// Assert that `block` was issued by this region since its last reset.
    ///
    /// # Panics
    ///
    /// Panics on a block from an earlier generation or outside the
    /// allocated prefix of the region.
    pub fn check(&self, block: Block) {
        assert!(
            block.generation() == self.generation,
            "stale block: {block} used after reset (arena generation {})",
            self.generation
        );
        assert!(
            block.end() <= self.used,
            "block out of bounds: {block} beyond {} allocated bytes",
            self.used
        );
    }

    /// Read access to a block's bytes.
    pub fn bytes(&self, block: Block) -> &[u8] {
        self.check(block);
        &self.storage[block.range()]
    }

    /// Write access to a block's bytes.
    pub fn bytes_mut(&mut self, block: Block) -> &mut [u8] {
        self.check(block);
        &mut self.storage[block.range()]
    }

    /// Copy the contents of `src` into the front of `dst`.
    ///
    /// Copies `min(src.len(), dst.len())` bytes; the blocks may overlap.
    pub fn copy_block(&mut self, src: Block, dst: Block) {
        self.check(src);
        self.check(dst);
        let len = src.len().min(dst.len()) as usize;
        let start = src.offset() as usize;
        self.storage
            .copy_within(start..start + len, dst.offset() as usize);
    }

    /// Rewind the cursor to zero and invalidate every issued block.
    ///
    /// The backing memory is NOT zeroed here; zeroing regions zero on
    /// the next allocation instead.
    pub fn reset(&mut self) {
        self.used = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Bytes consumed so far.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Bytes left in the unused tail.
    pub fn remaining(&self) -> usize {
        self.storage.len() - self.used
    }

    /// Current reset generation.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether allocations are zero-filled.
    pub fn zeroed(&self) -> bool {
        self.zeroed
    }

    /// Storage duration of this region.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the region owns its storage (as opposed to borrowing a parent's).
    pub fn is_owned(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_advances_cursor() {
        let mut region = Region::owned(128, true).unwrap();
        let a = region.bump(16).unwrap();
        let b = region.bump(32).unwrap();
        assert_eq!(a.offset(), 0);
        assert_eq!(b.offset(), 16);
        assert_eq!(region.used(), 48);
        assert_eq!(region.remaining(), 80);
    }

    #[test]
    fn bump_fails_without_moving_cursor() {
        let mut region = Region::owned(16, true).unwrap();
        region.bump(10).unwrap();
        let err = region.bump(7).unwrap_err();
        assert_eq!(
            err,
            ArenaError::CapacityExceeded {
                requested: 7,
                remaining: 6,
            }
        );
        assert_eq!(region.used(), 10);
    }

    #[test]
    fn zeroed_region_clears_stale_bytes() {
        let mut region = Region::owned(8, true).unwrap();
        let b = region.bump(8).unwrap();
        region.bytes_mut(b).fill(0xAB);
        region.reset();
        let b = region.bump(8).unwrap();
        assert!(region.bytes(b).iter().all(|&v| v == 0));
    }

    #[test]
    fn unzeroed_region_keeps_stale_bytes() {
        let mut region = Region::owned(8, false).unwrap();
        let b = region.bump(8).unwrap();
        region.bytes_mut(b).fill(0xAB);
        region.reset();
        let b = region.bump(8).unwrap();
        assert!(region.bytes(b).iter().all(|&v| v == 0xAB));
    }

    #[test]
    fn pop_only_reclaims_top_block() {
        let mut region = Region::owned(64, true).unwrap();
        let a = region.bump(8).unwrap();
        let b = region.bump(8).unwrap();
        assert!(!region.pop(a));
        assert_eq!(region.used(), 16);
        assert!(region.pop(b));
        assert_eq!(region.used(), 8);
        assert!(region.pop(a));
        assert_eq!(region.used(), 0);
    }

    #[test]
    fn copy_block_moves_bytes() {
        let mut region = Region::owned(64, true).unwrap();
        let a = region.bump(4).unwrap();
        let b = region.bump(8).unwrap();
        region.bytes_mut(a).copy_from_slice(&[1, 2, 3, 4]);
        region.copy_block(a, b);
        assert_eq!(region.bytes(b), &[1, 2, 3, 4, 0, 0, 0, 0]);
    }

    #[test]
    fn split_yields_disjoint_slices() {
        let mut region = Region::owned(100, true).unwrap();
        let parts = region.split(3, 30).unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.len() == 30));
        assert_eq!(region.used(), 90);
    }

    #[test]
    fn reset_bumps_generation() {
        let mut region = Region::owned(16, true).unwrap();
        let before = region.generation();
        region.reset();
        assert_eq!(region.generation(), before + 1);
    }

    #[test]
    #[should_panic(expected = "stale block")]
    fn stale_block_panics() {
        let mut region = Region::owned(16, true).unwrap();
        let b = region.bump(4).unwrap();
        region.reset();
        let _ = region.bytes(b);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn foreign_block_panics() {
        let region = Region::owned(16, true).unwrap();
        let _ = region.bytes(Block::new(0, 4, 0));
    }

    #[test]
    fn oversized_owned_region_is_rejected() {
        let result = Region::owned(usize::MAX, true);
        assert!(matches!(result, Err(ConfigError::SizeTooLarge { .. })));
    }
}
