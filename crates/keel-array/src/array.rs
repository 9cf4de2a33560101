//! The [`DynArray`] growable sequence.

use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;

use bytemuck::Pod;
use keel_arena::Allocator;
use keel_core::{ArenaError, Block};
use tracing::trace;

/// Append-only, doubling-capacity sequence whose buffer lives in an arena.
///
/// A fresh array is the null handle: no buffer, `len == cap == 0`, and no
/// arena access happens until the first [`append`](DynArray::append).
/// Growth allocates a buffer twice the size, copies the elements over and
/// releases the old buffer back to the arena (whether that space is ever
/// reused depends on the arena's discipline).
///
/// Indices are stable: the element at index `i` stays at `i` across growth
/// until a [`remove_first`](DynArray::remove_first) shifts it. Raw byte
/// views must not be held across an `append`, since growth relocates the
/// buffer; keep indices instead.
///
/// The array does not own its arena. Every call that touches elements
/// takes the arena the array was built in; passing a different arena is a
/// logic error that the arena's block checks will usually catch.
pub struct DynArray<T> {
    block: Option<Block>,
    len: u32,
    cap: u32,
    _marker: PhantomData<T>,
}

impl<T: Pod> DynArray<T> {
    /// Capacity allocated by the first append.
    pub const DEFAULT_CAPACITY: u32 = 10;

    /// The null array.
    pub const fn new() -> Self {
        Self {
            block: None,
            len: 0,
            cap: 0,
            _marker: PhantomData,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Number of elements the current buffer can hold.
    pub fn capacity(&self) -> u32 {
        self.cap
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The backing buffer, if one has been allocated.
    pub fn block(&self) -> Option<Block> {
        self.block
    }

    /// Append `elem` and return its index.
    ///
    /// Allocates [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY) elements on
    /// first use and doubles the capacity whenever the array is full.
    pub fn append<A: Allocator + ?Sized>(&mut self, arena: &mut A, elem: T) -> Result<u32, ArenaError> {
        assert!(size_of::<T>() > 0, "zero-sized elements are not supported");
        let block = match self.block {
            None => {
                let block = Self::allocate_buffer(arena, Self::DEFAULT_CAPACITY)?;
                self.block = Some(block);
                self.cap = Self::DEFAULT_CAPACITY;
                block
            }
            Some(old) if self.len == self.cap => {
                let new_cap = self.cap.checked_mul(2).ok_or(ArenaError::SizeOverflow {
                    units: self.cap as usize * 2,
                    unit_size: size_of::<T>(),
                })?;
                let new = Self::allocate_buffer(arena, new_cap)?;
                arena.copy_block(old, new);
                arena.release(old);
                trace!(from = self.cap, to = new_cap, "dyn array grew");
                self.block = Some(new);
                self.cap = new_cap;
                new
            }
            Some(block) => block,
        };
        let index = self.len;
        Self::write(arena, block, index, elem);
        self.len += 1;
        Ok(index)
    }

    /// Element at `index`, or `None` past the end.
    pub fn get<A: Allocator + ?Sized>(&self, arena: &A, index: u32) -> Option<T> {
        if index >= self.len {
            return None;
        }
        self.block.map(|block| Self::read(arena, block, index))
    }

    /// Overwrite the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn set<A: Allocator + ?Sized>(&self, arena: &mut A, index: u32, elem: T) {
        let block = self.checked_block(index);
        Self::write(arena, block, index, elem);
    }

    /// The last element, if any.
    pub fn last<A: Allocator + ?Sized>(&self, arena: &A) -> Option<T> {
        self.len.checked_sub(1).and_then(|i| self.get(arena, i))
    }

    /// Remove and return the last element. O(1), never reallocates.
    pub fn remove_last<A: Allocator + ?Sized>(&mut self, arena: &A) -> Option<T> {
        let last = self.last(arena)?;
        self.len -= 1;
        Some(last)
    }

    /// Remove and return the first element, shifting the rest down by one.
    ///
    /// O(n) in the number of remaining elements.
    pub fn remove_first<A: Allocator + ?Sized>(&mut self, arena: &mut A) -> Option<T> {
        let first = self.get(arena, 0)?;
        if let Some(block) = self.block {
            let size = size_of::<T>();
            let end = self.len as usize * size;
            arena.bytes_mut(block).copy_within(size..end, 0);
        }
        self.len -= 1;
        Some(first)
    }

    /// Swap the elements at `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn swap<A: Allocator + ?Sized>(&self, arena: &mut A, i: u32, j: u32) {
        let block = self.checked_block(i.max(j));
        let a = Self::read(arena, block, i);
        let b = Self::read(arena, block, j);
        Self::write(arena, block, i, b);
        Self::write(arena, block, j, a);
    }

    /// Iterate over the elements by value.
    pub fn iter<'s, A: Allocator + ?Sized>(&'s self, arena: &'s A) -> impl Iterator<Item = T> + 's {
        let block = self.block;
        (0..self.len).filter_map(move |i| block.map(|b| Self::read(arena, b, i)))
    }

    /// Copy the elements into a `Vec`.
    pub fn to_vec<A: Allocator + ?Sized>(&self, arena: &A) -> Vec<T> {
        self.iter(arena).collect()
    }

    /// Drop every element but keep the buffer.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Shorten the array to at most `len` elements, keeping the buffer.
    pub fn truncate(&mut self, len: u32) {
        self.len = self.len.min(len);
    }

    /// Release the buffer to `arena` and return to the null state.
    pub fn discard<A: Allocator + ?Sized>(&mut self, arena: &mut A) {
        if let Some(block) = self.block.take() {
            arena.release(block);
        }
        self.len = 0;
        self.cap = 0;
    }

    /// Forget the buffer without touching the arena.
    ///
    /// Used after the arena itself has been reset, when the old buffer
    /// handle is no longer valid to release.
    pub fn forget(&mut self) {
        self.block = None;
        self.len = 0;
        self.cap = 0;
    }

    fn allocate_buffer<A: Allocator + ?Sized>(arena: &mut A, cap: u32) -> Result<Block, ArenaError> {
        let bytes = (cap as usize)
            .checked_mul(size_of::<T>())
            .ok_or(ArenaError::SizeOverflow {
                units: cap as usize,
                unit_size: size_of::<T>(),
            })?;
        arena.allocate_bytes(bytes)
    }

    fn checked_block(&self, index: u32) -> Block {
        assert!(
            index < self.len,
            "index {index} out of bounds for length {}",
            self.len
        );
        // len > 0 implies a buffer exists.
        self.block.unwrap_or_else(|| unreachable!("non-empty array without a buffer"))
    }

    fn read<A: Allocator + ?Sized>(arena: &A, block: Block, index: u32) -> T {
        let size = size_of::<T>();
        let start = index as usize * size;
        bytemuck::pod_read_unaligned(&arena.bytes(block)[start..start + size])
    }

    fn write<A: Allocator + ?Sized>(arena: &mut A, block: Block, index: u32, elem: T) {
        let size = size_of::<T>();
        let start = index as usize * size;
        arena.bytes_mut(block)[start..start + size].copy_from_slice(bytemuck::bytes_of(&elem));
    }
}

impl<T: Pod> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynArray")
            .field("len", &self.len)
            .field("cap", &self.cap)
            .field("block", &self.block)
            .finish()
    }
}
