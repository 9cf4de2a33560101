//! Keel: arena allocators, arena-backed arrays and an index-based
//! red-black tree.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Keel sub-crates. For most users, adding `keel` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use keel::prelude::*;
//!
//! // One permanent arena; the tree gets a free-list sub-arena of it so
//! // that column growth can reuse the buffers it leaves behind.
//! let mut root = LinearArena::new(ArenaConfig::new(64 * 1024)).unwrap();
//! let heap = root.make_free_list(32 * 1024).unwrap();
//!
//! let mut tree = RbTree::new(heap);
//! for k in [24, 18, 26, 5, 20, 27, 2, 7, 23, 21] {
//!     tree.put(k, k * 10).unwrap();
//! }
//! let root_node = tree.root().unwrap();
//! assert_eq!(tree.key(root_node), 24);
//! assert_eq!(tree.color(root_node), Color::Black);
//! assert_eq!(tree.get(23), Some(230));
//!
//! let d = tree.find(18).unwrap();
//! tree.delete(d);
//! assert_eq!(tree.find(18), None);
//! assert!(tree.check_invariants().is_ok());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `keel-core` | `Block`, `Descriptor`, error enums |
//! | [`arena`] | `keel-arena` | Arena disciplines, scratch pool, configs |
//! | [`array`] | `keel-array` | `DynArray` growable sequence |
//! | [`rbtree`] | `keel-rbtree` | Red-black tree and invariant checker |
//! | [`fmt`] | `keel-fmt` | Template formatter |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Handles, identifiers and error types (`keel-core`).
pub use keel_core as types;

/// Arena disciplines and the scratch pool (`keel-arena`).
///
/// Every discipline implements [`arena::Allocator`]; only
/// [`arena::LinearArena`] can carve sub-arenas.
pub use keel_arena as arena;

/// Arena-backed growable arrays (`keel-array`).
pub use keel_array as array;

/// Index-based red-black tree (`keel-rbtree`).
pub use keel_rbtree as rbtree;

/// Template formatter rendered through scratch arenas (`keel-fmt`).
pub use keel_fmt as fmt;

/// Common imports for typical Keel usage.
///
/// ```rust
/// use keel::prelude::*;
/// ```
pub mod prelude {
    // Core handles and errors
    pub use keel_core::{ArenaError, Block, ConfigError, Descriptor, FormatError};

    // Arenas
    pub use keel_arena::{
        Allocator, ArenaConfig, Discipline, FreeListArena, LinearArena, PoolArena, ScratchArena,
        ScratchConfig, ScratchHandle, ScratchPool,
    };

    // Containers
    pub use keel_array::DynArray;
    pub use keel_rbtree::{Color, Entry, InvariantViolation, RbTree};

    // Formatting
    pub use keel_fmt::{Arg, Formatter};
}
