//! The [`RbTree`] container: construction, lookup and insertion.

use std::cmp::Ordering;
use std::fmt;

use keel_arena::Allocator;
use keel_array::DynArray;
use keel_core::{ArenaError, Descriptor};
use tracing::trace;

use crate::node::{link, Color, Entry, BLACK, FREE, NIL, RED};

/// Total order over keys.
///
/// Keys are always `u32`, but the order need not be numeric: a tree can
/// index any domain that maps into `u32` (interned strings, packed
/// coordinates) as long as the comparator is a total order on it.
pub type Comparator = fn(u32, u32) -> Ordering;

/// Natural numeric order, the default [`Comparator`].
pub fn natural_order(a: u32, b: u32) -> Ordering {
    a.cmp(&b)
}

/// Red-black tree mapping `u32` keys to `u32` values.
///
/// The tree owns its arena. Pass `&mut arena` (every `&mut A` is itself an
/// [`Allocator`]) to keep ownership with the caller, or hand over a
/// sub-arena carved for the tree alone.
///
/// Descriptors returned by [`put`](Self::put) and [`find`](Self::find)
/// remain attached to the same key until that key is deleted. A deleted
/// descriptor goes on a free list and is handed out again by the next
/// insertion; using it in between panics.
pub struct RbTree<A: Allocator> {
    pub(crate) arena: A,
    pub(crate) entries: DynArray<Entry>,
    pub(crate) parents: DynArray<u32>,
    pub(crate) lefts: DynArray<u32>,
    pub(crate) rights: DynArray<u32>,
    pub(crate) colors: DynArray<u8>,
    /// Head of the chain of freed slots, linked through `rights`.
    pub(crate) free_head: u32,
    pub(crate) root: u32,
    pub(crate) len: u32,
    pub(crate) compare: Comparator,
}

impl<A: Allocator> RbTree<A> {
    /// Empty tree ordered by [`natural_order`]. Allocates nothing.
    pub fn new(arena: A) -> Self {
        Self::with_comparator(arena, natural_order)
    }

    /// Empty tree ordered by `compare`. Allocates nothing.
    pub fn with_comparator(arena: A, compare: Comparator) -> Self {
        Self {
            arena,
            entries: DynArray::new(),
            parents: DynArray::new(),
            lefts: DynArray::new(),
            rights: DynArray::new(),
            colors: DynArray::new(),
            free_head: NIL,
            root: NIL,
            len: 0,
            compare,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of node slots ever allocated, live or free.
    pub fn slots(&self) -> u32 {
        self.entries.len()
    }

    /// The root node.
    pub fn root(&self) -> Option<Descriptor> {
        link(self.root)
    }

    /// The backing arena.
    pub fn arena(&self) -> &A {
        &self.arena
    }

    /// Give the arena back, dropping the tree.
    pub fn into_arena(self) -> A {
        self.arena
    }

    /// Insert `key → value`, or overwrite the value if `key` is present.
    ///
    /// Returns the key's descriptor and whether a new node was created.
    /// Overwriting never changes the tree's shape. Fails only when the
    /// arena cannot grow the node columns; the tree is unchanged then.
    pub fn put(&mut self, key: u32, value: u32) -> Result<(Descriptor, bool), ArenaError> {
        let mut parent = NIL;
        let mut cur = self.root;
        let mut went_left = false;
        while cur != NIL {
            let entry = self.entry_at(cur);
            match (self.compare)(key, entry.key) {
                Ordering::Less => {
                    parent = cur;
                    went_left = true;
                    cur = self.left_of(cur);
                }
                Ordering::Greater => {
                    parent = cur;
                    went_left = false;
                    cur = self.right_of(cur);
                }
                Ordering::Equal => {
                    self.entries
                        .set(&mut self.arena, cur, Entry { key: entry.key, value });
                    return Ok((Descriptor(cur), false));
                }
            }
        }

        let node = self.alloc_node(Entry { key, value })?;
        self.set_parent(node, parent);
        if parent == NIL {
            self.root = node;
        } else if went_left {
            self.set_left(parent, node);
        } else {
            self.set_right(parent, node);
        }
        self.len += 1;
        self.insert_fixup(node);
        Ok((Descriptor(node), true))
    }

    /// Descriptor of the node holding `key`. Never mutates the tree.
    pub fn find(&self, key: u32) -> Option<Descriptor> {
        let mut cur = self.root;
        while cur != NIL {
            match (self.compare)(key, self.entry_at(cur).key) {
                Ordering::Less => cur = self.left_of(cur),
                Ordering::Greater => cur = self.right_of(cur),
                Ordering::Equal => return Some(Descriptor(cur)),
            }
        }
        None
    }

    /// Value stored under `key`.
    pub fn get(&self, key: u32) -> Option<u32> {
        self.find(key).map(|d| self.entry_at(d.0).value)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: u32) -> bool {
        self.find(key).is_some()
    }

    /// Delete `key` and return its value.
    pub fn remove(&mut self, key: u32) -> Option<u32> {
        let d = self.find(key)?;
        let value = self.entry_at(d.0).value;
        self.delete(d);
        Some(value)
    }

    /// Key and value of node `d`.
    ///
    /// # Panics
    ///
    /// Panics if `d` is not a live node of this tree.
    pub fn entry(&self, d: Descriptor) -> Entry {
        self.entry_at(self.live(d))
    }

    /// Key of node `d`.
    pub fn key(&self, d: Descriptor) -> u32 {
        self.entry(d).key
    }

    /// Value of node `d`.
    pub fn value(&self, d: Descriptor) -> u32 {
        self.entry(d).value
    }

    /// Overwrite the value of node `d`.
    pub fn set_value(&mut self, d: Descriptor, value: u32) {
        let node = self.live(d);
        let key = self.entry_at(node).key;
        self.entries.set(&mut self.arena, node, Entry { key, value });
    }

    /// Color of node `d`.
    pub fn color(&self, d: Descriptor) -> Color {
        let node = self.live(d);
        match Color::from_tag(self.color_of(node)) {
            Some(color) => color,
            None => unreachable!("live node {d} without a color"),
        }
    }

    /// Parent of node `d`.
    pub fn parent(&self, d: Descriptor) -> Option<Descriptor> {
        link(self.parent_of(self.live(d)))
    }

    /// Left child of node `d`.
    pub fn left(&self, d: Descriptor) -> Option<Descriptor> {
        link(self.left_of(self.live(d)))
    }

    /// Right child of node `d`.
    pub fn right(&self, d: Descriptor) -> Option<Descriptor> {
        link(self.right_of(self.live(d)))
    }

    /// Drop every node and reset the arena.
    ///
    /// Every block the arena issued, including ones held outside the
    /// tree, becomes invalid.
    pub fn clear(&mut self) {
        self.arena.reset();
        self.entries.forget();
        self.parents.forget();
        self.lefts.forget();
        self.rights.forget();
        self.colors.forget();
        self.free_head = NIL;
        self.root = NIL;
        self.len = 0;
    }

    // ── column access ───────────────────────────────────────────

    /// Panic unless `d` names a live node; return its raw index.
    pub(crate) fn live(&self, d: Descriptor) -> u32 {
        let tag = self.colors.get(&self.arena, d.0);
        assert!(
            matches!(tag, Some(RED | BLACK)),
            "descriptor {d} is not a live node of this tree"
        );
        d.0
    }

    pub(crate) fn entry_at(&self, n: u32) -> Entry {
        self.entries.get(&self.arena, n).unwrap_or_default()
    }

    pub(crate) fn parent_of(&self, n: u32) -> u32 {
        self.parents.get(&self.arena, n).unwrap_or(NIL)
    }

    pub(crate) fn left_of(&self, n: u32) -> u32 {
        self.lefts.get(&self.arena, n).unwrap_or(NIL)
    }

    pub(crate) fn right_of(&self, n: u32) -> u32 {
        self.rights.get(&self.arena, n).unwrap_or(NIL)
    }

    /// Stored color tag; `NIL` reads as black.
    pub(crate) fn color_of(&self, n: u32) -> u8 {
        self.colors.get(&self.arena, n).unwrap_or(BLACK)
    }

    pub(crate) fn set_parent(&mut self, n: u32, p: u32) {
        self.parents.set(&mut self.arena, n, p);
    }

    pub(crate) fn set_left(&mut self, n: u32, l: u32) {
        self.lefts.set(&mut self.arena, n, l);
    }

    pub(crate) fn set_right(&mut self, n: u32, r: u32) {
        self.rights.set(&mut self.arena, n, r);
    }

    pub(crate) fn set_color(&mut self, n: u32, c: u8) {
        self.colors.set(&mut self.arena, n, c);
    }

    // ── slot management ─────────────────────────────────────────

    /// Hand out a RED, unlinked slot: a freed one if available,
    /// otherwise a fresh one appended to every column.
    fn alloc_node(&mut self, entry: Entry) -> Result<u32, ArenaError> {
        if self.free_head != NIL {
            let node = self.free_head;
            self.free_head = self.right_of(node);
            self.entries.set(&mut self.arena, node, entry);
            self.set_parent(node, NIL);
            self.set_left(node, NIL);
            self.set_right(node, NIL);
            self.set_color(node, RED);
            trace!(node, "reused freed tree slot");
            return Ok(node);
        }

        let node = self.entries.len();
        if let Err(e) = self.push_slot(entry) {
            // Keep the columns the same length.
            self.entries.truncate(node);
            self.parents.truncate(node);
            self.lefts.truncate(node);
            self.rights.truncate(node);
            self.colors.truncate(node);
            return Err(e);
        }
        Ok(node)
    }

    fn push_slot(&mut self, entry: Entry) -> Result<(), ArenaError> {
        self.entries.append(&mut self.arena, entry)?;
        self.parents.append(&mut self.arena, NIL)?;
        self.lefts.append(&mut self.arena, NIL)?;
        self.rights.append(&mut self.arena, NIL)?;
        self.colors.append(&mut self.arena, RED)?;
        Ok(())
    }

    /// Put an unlinked slot on the free list.
    pub(crate) fn free_node(&mut self, node: u32) {
        self.set_color(node, FREE);
        self.set_parent(node, NIL);
        self.set_left(node, NIL);
        self.set_right(node, self.free_head);
        self.free_head = node;
    }

    // ── rebalancing ─────────────────────────────────────────────

    /// Rotate `x` down to the left; its right child takes its place.
    pub(crate) fn rotate_left(&mut self, x: u32) {
        let y = self.right_of(x);
        let inner = self.left_of(y);
        self.set_right(x, inner);
        if inner != NIL {
            self.set_parent(inner, x);
        }
        self.replace_child(x, y);
        self.set_left(y, x);
        self.set_parent(x, y);
    }

    /// Rotate `x` down to the right; its left child takes its place.
    pub(crate) fn rotate_right(&mut self, x: u32) {
        let y = self.left_of(x);
        let inner = self.right_of(y);
        self.set_left(x, inner);
        if inner != NIL {
            self.set_parent(inner, x);
        }
        self.replace_child(x, y);
        self.set_right(y, x);
        self.set_parent(x, y);
    }

    /// Point `old`'s parent (or the root) at `new` and give `new` that
    /// parent. `old`'s own links are left alone.
    pub(crate) fn replace_child(&mut self, old: u32, new: u32) {
        let p = self.parent_of(old);
        if p == NIL {
            self.root = new;
        } else if self.left_of(p) == old {
            self.set_left(p, new);
        } else {
            self.set_right(p, new);
        }
        if new != NIL {
            self.set_parent(new, p);
        }
    }

    fn insert_fixup(&mut self, mut z: u32) {
        while self.color_of(self.parent_of(z)) == RED {
            // A red parent is never the root, so the grandparent exists.
            let p = self.parent_of(z);
            let g = self.parent_of(p);
            if p == self.left_of(g) {
                let uncle = self.right_of(g);
                if self.color_of(uncle) == RED {
                    self.set_color(p, BLACK);
                    self.set_color(uncle, BLACK);
                    self.set_color(g, RED);
                    z = g;
                } else {
                    if z == self.right_of(p) {
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.parent_of(z);
                    let g = self.parent_of(p);
                    self.set_color(p, BLACK);
                    self.set_color(g, RED);
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.left_of(g);
                if self.color_of(uncle) == RED {
                    self.set_color(p, BLACK);
                    self.set_color(uncle, BLACK);
                    self.set_color(g, RED);
                    z = g;
                } else {
                    if z == self.left_of(p) {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.parent_of(z);
                    let g = self.parent_of(p);
                    self.set_color(p, BLACK);
                    self.set_color(g, RED);
                    self.rotate_left(g);
                }
            }
        }
        let root = self.root;
        self.set_color(root, BLACK);
    }
}

impl<A: Allocator> fmt::Debug for RbTree<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RbTree")
            .field("len", &self.len)
            .field("slots", &self.entries.len())
            .field("root", &self.root())
            .finish()
    }
}
