//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identifier of an element in an array-backed structure.
///
/// A descriptor is a plain index into a set of parallel columns. It plays
/// the role a pointer would play in a node-based structure, but carries no
/// ownership and stays valid when the backing buffers are relocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Descriptor(pub u32);

impl Descriptor {
    /// The raw column index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for Descriptor {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Counter for unique [`PoolInstanceId`] allocation.
static POOL_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a scratch pool.
///
/// Scratch handles carry the id of the pool that issued them so that a
/// handle can never be released into a different pool by mistake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolInstanceId(u64);

impl PoolInstanceId {
    /// Allocate a fresh, unique instance ID.
    pub fn next() -> Self {
        Self(POOL_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PoolInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
