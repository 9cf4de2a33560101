//! Arena allocation for Keel.
//!
//! Every arena owns (or borrows) one contiguous byte region and hands out
//! [`Block`](keel_core::Block) handles into it. The allocation policy is
//! chosen by picking a type, not by setting flags:
//!
//! ```text
//! LinearArena (permanent, heap-backed; the only arena that can be a parent)
//! ├── carve_linear()   → LinearArena<'_>   bump, stack-discipline release
//! ├── make_pool()      → PoolArena<'_>     count × block_size, exact-run reuse
//! ├── make_free_list() → FreeListArena<'_> best-fit free list
//! ├── make_scratch()   → ScratchArena<'_>  bump, release is a no-op
//! └── ScratchPool::new() → N × ScratchArena checked out by handle
//! ```
//!
//! Derived arenas borrow their parent's storage, so the borrow checker
//! guarantees a sub-arena never outlives the arena it was carved from.
//!
//! All arenas implement [`Allocator`], which is what the array and tree
//! crates are generic over.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod config;
pub mod free_list;
pub mod linear;
pub mod pool;
pub mod region;
pub mod scratch;

// Public re-exports for the primary API surface.
pub use allocator::{Allocator, Discipline};
pub use config::{ArenaConfig, ScratchConfig};
pub use free_list::FreeListArena;
pub use keel_core::{ArenaError, Block, ConfigError};
pub use linear::LinearArena;
pub use pool::PoolArena;
pub use region::{Duration, Region};
pub use scratch::{ScratchArena, ScratchHandle, ScratchPool};
