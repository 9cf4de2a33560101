//! Template formatter for Keel.
//!
//! A [`Formatter`] expands templates such as `"node {u32} -> {str}"`
//! against a list of [`Arg`]s. Each `{name}` placeholder is rendered by the
//! printer registered under that name; `\{` produces a literal brace.
//! Rendering happens in a scratch arena checked out of a
//! [`ScratchPool`](keel_arena::ScratchPool) for the duration of the call.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arg;
pub mod formatter;

pub use arg::Arg;
pub use formatter::{Formatter, Printer};
pub use keel_core::FormatError;
