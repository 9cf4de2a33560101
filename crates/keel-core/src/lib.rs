//! Core handles, identifiers and error types for the Keel arena toolkit.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other Keel crate: the [`Block`] handle
//! returned by allocators, the [`Descriptor`] used to name tree nodes,
//! and the error enums for each subsystem.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod error;
pub mod id;

pub use block::Block;
pub use error::{ArenaError, ConfigError, FormatError};
pub use id::{Descriptor, PoolInstanceId};
