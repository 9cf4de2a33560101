//! Per-node column types.

use bytemuck::{Pod, Zeroable};

/// Link value meaning "no node".
pub(crate) const NIL: u32 = u32::MAX;

pub(crate) const RED: u8 = 0;
pub(crate) const BLACK: u8 = 1;
/// Color tag of a deleted slot waiting on the descriptor free list.
pub(crate) const FREE: u8 = 2;

/// Key/value pair stored for every node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Entry {
    /// The ordering key.
    pub key: u32,
    /// The associated value.
    pub value: u32,
}

/// Color of a live node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Red node.
    Red,
    /// Black node.
    Black,
}

impl Color {
    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            RED => Some(Color::Red),
            BLACK => Some(Color::Black),
            _ => None,
        }
    }
}

/// Convert a stored link to the public representation.
pub(crate) fn link(raw: u32) -> Option<keel_core::Descriptor> {
    (raw != NIL).then_some(keel_core::Descriptor(raw))
}
