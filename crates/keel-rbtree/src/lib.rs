//! Index-based red-black tree for Keel.
//!
//! [`RbTree`] is an ordered `u32 → u32` map balanced with the classic
//! red-black rules. Nodes are not heap objects: a node is a [`Descriptor`],
//! an index into five parallel [`DynArray`](keel_array::DynArray) columns
//! (entries, parent, left, right, color) that all live in one arena. The
//! whole tree can therefore be discarded with a single arena reset.
//!
//! After inserting 24, 18, 26 and 5:
//!
//! ```text
//!            descriptor:   0    1    2    3
//!   entries  (key)       [24] [18] [26] [ 5]
//!   parent               [ -] [ 0] [ 0] [ 1]
//!   left                 [ 1] [ 3] [ -] [ -]
//!   right                [ 2] [ -] [ -] [ -]
//!   color                [ B] [ B] [ B] [ R]
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod check;
mod delete;
pub mod iter;
pub mod node;
pub mod tree;

pub use check::InvariantViolation;
pub use iter::Iter;
pub use keel_core::Descriptor;
pub use node::{Color, Entry};
pub use tree::{natural_order, Comparator, RbTree};
