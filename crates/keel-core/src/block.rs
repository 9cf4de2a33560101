//! The [`Block`] handle: an allocation issued by an arena.
//!
//! A block encodes the physical location of an allocation within its
//! arena's backing storage. It is generation-scoped: every arena reset
//! bumps the generation, so a block kept across a reset is detected in
//! O(1) the next time it is resolved.

use std::fmt;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};

/// Location of an allocation within an arena.
///
/// Blocks are plain `Copy` values and are resolved against the arena that
/// issued them (`Allocator::bytes` / `Allocator::bytes_mut` in
/// `keel-arena`). They are `Pod` so that they can themselves be stored in
/// arena-backed arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Block {
    offset: u32,
    len: u32,
    generation: u32,
}

impl Block {
    /// Create a new block handle.
    pub fn new(offset: u32, len: u32, generation: u32) -> Self {
        Self {
            offset,
            len,
            generation,
        }
    }

    /// Byte offset within the arena's storage.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Length of the allocation in bytes.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether this is a zero-length allocation.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Arena generation when this block was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// One past the last byte of the block.
    pub fn end(&self) -> usize {
        self.offset as usize + self.len as usize
    }

    /// The byte range covered by this block.
    pub fn range(&self) -> Range<usize> {
        self.offset as usize..self.end()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block(gen={}, off={}, len={})",
            self.generation, self.offset, self.len
        )
    }
}
