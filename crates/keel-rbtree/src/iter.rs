//! Ordered traversal.

use std::iter::FusedIterator;

use keel_arena::Allocator;
use keel_core::Descriptor;

use crate::node::{link, Entry, NIL};
use crate::tree::RbTree;

impl<A: Allocator> RbTree<A> {
    /// Node with the smallest key.
    pub fn min(&self) -> Option<Descriptor> {
        link(self.subtree_min(self.root))
    }

    /// Node with the largest key.
    pub fn max(&self) -> Option<Descriptor> {
        link(self.subtree_max(self.root))
    }

    /// In-order successor of `d`.
    pub fn successor(&self, d: Descriptor) -> Option<Descriptor> {
        link(self.next_of(self.live(d)))
    }

    /// In-order predecessor of `d`.
    pub fn predecessor(&self, d: Descriptor) -> Option<Descriptor> {
        let mut x = self.live(d);
        let left = self.left_of(x);
        if left != NIL {
            return link(self.subtree_max(left));
        }
        let mut y = self.parent_of(x);
        while y != NIL && x == self.left_of(y) {
            x = y;
            y = self.parent_of(y);
        }
        link(y)
    }

    /// Iterate over the nodes in key order.
    pub fn iter(&self) -> Iter<'_, A> {
        Iter {
            tree: self,
            next: self.subtree_min(self.root),
            remaining: self.len,
        }
    }

    pub(crate) fn subtree_min(&self, mut n: u32) -> u32 {
        if n == NIL {
            return NIL;
        }
        while self.left_of(n) != NIL {
            n = self.left_of(n);
        }
        n
    }

    pub(crate) fn subtree_max(&self, mut n: u32) -> u32 {
        if n == NIL {
            return NIL;
        }
        while self.right_of(n) != NIL {
            n = self.right_of(n);
        }
        n
    }

    fn next_of(&self, mut x: u32) -> u32 {
        let right = self.right_of(x);
        if right != NIL {
            return self.subtree_min(right);
        }
        let mut y = self.parent_of(x);
        while y != NIL && x == self.right_of(y) {
            x = y;
            y = self.parent_of(y);
        }
        y
    }
}

/// In-order iterator over `(descriptor, entry)` pairs.
///
/// Created by [`RbTree::iter`].
pub struct Iter<'t, A: Allocator> {
    tree: &'t RbTree<A>,
    next: u32,
    remaining: u32,
}

impl<A: Allocator> Iterator for Iter<'_, A> {
    type Item = (Descriptor, Entry);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == NIL || self.remaining == 0 {
            return None;
        }
        let node = self.next;
        self.next = self.tree.next_of(node);
        self.remaining -= 1;
        Some((Descriptor(node), self.tree.entry_at(node)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.next == NIL { 0 } else { self.remaining as usize };
        (n, Some(n))
    }
}

impl<A: Allocator> ExactSizeIterator for Iter<'_, A> {}

impl<A: Allocator> FusedIterator for Iter<'_, A> {}

impl<'t, A: Allocator> IntoIterator for &'t RbTree<A> {
    type Item = (Descriptor, Entry);
    type IntoIter = Iter<'t, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
