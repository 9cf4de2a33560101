//! Test fixtures and arena builders for Keel development.
//!
//! Provides the CLRS key sequence used throughout the tree tests,
//! deterministic shuffled key sets, and shorthand constructors for the
//! arena shapes the tests keep rebuilding.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    clrs_keys, delete_schedule, shuffled_keys, test_arena, test_scratch_config, CLRS_KEYS,
};
