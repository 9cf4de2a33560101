//! Node removal with red-black rebalancing.

use keel_arena::Allocator;
use keel_core::Descriptor;

use crate::node::{BLACK, NIL, RED};
use crate::tree::RbTree;

impl<A: Allocator> RbTree<A> {
    /// Remove node `d` from the tree.
    ///
    /// Surviving nodes keep their descriptors: when `d` has two children
    /// its in-order successor is relinked into `d`'s position rather than
    /// having its entry copied over. The slot of `d` is freed for reuse.
    ///
    /// # Panics
    ///
    /// Panics if `d` is not a live node of this tree.
    pub fn delete(&mut self, d: Descriptor) {
        let z = self.live(d);
        let mut removed_color = self.color_of(z);
        let x;
        let x_parent;

        if self.left_of(z) == NIL {
            x = self.right_of(z);
            x_parent = self.parent_of(z);
            self.replace_child(z, x);
        } else if self.right_of(z) == NIL {
            x = self.left_of(z);
            x_parent = self.parent_of(z);
            self.replace_child(z, x);
        } else {
            let y = self.subtree_min(self.right_of(z));
            removed_color = self.color_of(y);
            x = self.right_of(y);
            if self.parent_of(y) == z {
                x_parent = y;
            } else {
                x_parent = self.parent_of(y);
                self.replace_child(y, x);
                let zr = self.right_of(z);
                self.set_right(y, zr);
                self.set_parent(zr, y);
            }
            self.replace_child(z, y);
            let zl = self.left_of(z);
            self.set_left(y, zl);
            self.set_parent(zl, y);
            let zc = self.color_of(z);
            self.set_color(y, zc);
        }

        if removed_color == BLACK {
            self.delete_fixup(x, x_parent);
        }
        self.free_node(z);
        self.len -= 1;
    }

    /// Restore the black-height after a black node was spliced out above
    /// `x`. `x` may be `NIL`, so its parent is tracked separately.
    fn delete_fixup(&mut self, mut x: u32, mut parent: u32) {
        while x != self.root && self.color_of(x) == BLACK {
            if x == self.left_of(parent) {
                let mut w = self.right_of(parent);
                if self.color_of(w) == RED {
                    self.set_color(w, BLACK);
                    self.set_color(parent, RED);
                    self.rotate_left(parent);
                    w = self.right_of(parent);
                }
                if self.color_of(self.left_of(w)) == BLACK && self.color_of(self.right_of(w)) == BLACK {
                    self.set_color(w, RED);
                    x = parent;
                    parent = self.parent_of(x);
                } else {
                    if self.color_of(self.right_of(w)) == BLACK {
                        let near = self.left_of(w);
                        self.set_color(near, BLACK);
                        self.set_color(w, RED);
                        self.rotate_right(w);
                        w = self.right_of(parent);
                    }
                    let pc = self.color_of(parent);
                    self.set_color(w, pc);
                    self.set_color(parent, BLACK);
                    let far = self.right_of(w);
                    self.set_color(far, BLACK);
                    self.rotate_left(parent);
                    x = self.root;
                    parent = NIL;
                }
            } else {
                let mut w = self.left_of(parent);
                if self.color_of(w) == RED {
                    self.set_color(w, BLACK);
                    self.set_color(parent, RED);
                    self.rotate_right(parent);
                    w = self.left_of(parent);
                }
                if self.color_of(self.right_of(w)) == BLACK && self.color_of(self.left_of(w)) == BLACK {
                    self.set_color(w, RED);
                    x = parent;
                    parent = self.parent_of(x);
                } else {
                    if self.color_of(self.left_of(w)) == BLACK {
                        let near = self.right_of(w);
                        self.set_color(near, BLACK);
                        self.set_color(w, RED);
                        self.rotate_left(w);
                        w = self.left_of(parent);
                    }
                    let pc = self.color_of(parent);
                    self.set_color(w, pc);
                    self.set_color(parent, BLACK);
                    let far = self.left_of(w);
                    self.set_color(far, BLACK);
                    self.rotate_right(parent);
                    x = self.root;
                    parent = NIL;
                }
            }
        }
        if x != NIL {
            self.set_color(x, BLACK);
        }
    }
}

#[cfg(test)]
mod tests {
    use keel_arena::LinearArena;

    use super::*;
    use crate::node::Color;

    fn tree_with(keys: &[u32]) -> RbTree<LinearArena<'static>> {
        let mut t = RbTree::new(LinearArena::with_capacity(64 * 1024, true).unwrap());
        for &k in keys {
            t.put(k, k * 10).unwrap();
        }
        t
    }

    const CLRS: [u32; 10] = [24, 18, 26, 5, 20, 27, 2, 7, 23, 21];

    #[test]
    fn delete_leaf() {
        let mut t = tree_with(&CLRS);
        let d = t.find(2).unwrap();
        t.delete(d);
        assert_eq!(t.find(2), None);
        assert_eq!(t.len(), 9);
        t.check_invariants().unwrap();
    }

    #[test]
    fn delete_root_with_two_children() {
        let mut t = tree_with(&CLRS);
        let root = t.root().unwrap();
        let survivors: Vec<_> = CLRS
            .iter()
            .filter(|&&k| k != 24)
            .map(|&k| (k, t.find(k).unwrap()))
            .collect();
        t.delete(root);
        // The successor 26 moves up and keeps its descriptor.
        assert_eq!(t.key(t.root().unwrap()), 26);
        for (k, d) in survivors {
            assert_eq!(t.find(k), Some(d));
            assert_eq!(t.value(d), k * 10);
        }
        t.check_invariants().unwrap();
    }

    #[test]
    fn delete_everything_in_insertion_order() {
        let mut t = tree_with(&CLRS);
        for k in CLRS {
            assert_eq!(t.remove(k), Some(k * 10));
            t.check_invariants().unwrap();
        }
        assert!(t.is_empty());
        assert_eq!(t.root(), None);
    }

    #[test]
    fn deleted_descriptor_is_reused() {
        let mut t = tree_with(&CLRS);
        let d = t.find(7).unwrap();
        let slots = t.slots();
        t.delete(d);
        let (reused, inserted) = t.put(100, 1).unwrap();
        assert!(inserted);
        assert_eq!(reused, d);
        assert_eq!(t.slots(), slots);
        assert_eq!(t.color(reused), Color::Red);
        t.check_invariants().unwrap();
    }

    #[test]
    #[should_panic(expected = "not a live node")]
    fn deleting_twice_panics() {
        let mut t = tree_with(&CLRS);
        let d = t.find(20).unwrap();
        t.delete(d);
        t.delete(d);
    }

    #[test]
    fn remove_missing_key_is_none() {
        let mut t = tree_with(&CLRS);
        assert_eq!(t.remove(1000), None);
        assert_eq!(t.len(), 10);
    }
}
