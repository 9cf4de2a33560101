//! Arena-backed growable arrays for Keel.
//!
//! [`DynArray`] is the uniform building block for every column of the
//! red-black tree and for the formatter's piece lists. Its element buffer
//! lives in an arena; the array itself is a small header (`len`, `cap`,
//! buffer handle) that is passed the arena on every call.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;

pub use array::DynArray;
