//! Structural validation of a tree.

use std::cmp::Ordering;

use keel_arena::Allocator;
use keel_core::Descriptor;

use crate::node::{BLACK, NIL, RED};
use crate::tree::RbTree;

/// A broken red-black or binary-search-tree property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// The root is red.
    #[error("root {root} is red")]
    RedRoot {
        /// The root node.
        root: Descriptor,
    },
    /// The root has a parent link.
    #[error("root {root} has a parent")]
    RootHasParent {
        /// The root node.
        root: Descriptor,
    },
    /// A red node has a red child.
    #[error("red node {node} has a red parent")]
    RedChildOfRed {
        /// The child.
        node: Descriptor,
    },
    /// A child does not point back at its parent.
    #[error("node {node} does not point back at its parent")]
    BrokenParentLink {
        /// The child.
        node: Descriptor,
    },
    /// A freed slot is still linked into the tree.
    #[error("freed slot {node} is still linked into the tree")]
    FreedNodeLinked {
        /// The freed slot.
        node: Descriptor,
    },
    /// The two subtrees of a node have different black-heights.
    #[error("black-height mismatch under {node}: left {left}, right {right}")]
    BlackHeightMismatch {
        /// The node whose subtrees disagree.
        node: Descriptor,
        /// Black-height of the left subtree.
        left: u32,
        /// Black-height of the right subtree.
        right: u32,
    },
    /// In-order traversal is not strictly increasing.
    #[error("key of {node} is not greater than its in-order predecessor")]
    OutOfOrder {
        /// The first node out of order.
        node: Descriptor,
    },
    /// The number of reachable nodes differs from `len`.
    #[error("{reachable} nodes reachable from the root, but len is {len}")]
    LenMismatch {
        /// Nodes reached by the walk (the walk stops once this exceeds `len`).
        reachable: u32,
        /// The recorded length.
        len: u32,
    },
}

impl<A: Allocator> RbTree<A> {
    /// Verify every structural invariant and return the black-height.
    ///
    /// Checks the root color, parent back-links, the no-red-red rule,
    /// equal black-heights, strict key order and the node count. The
    /// black-height counts black nodes on any root-to-leaf path, leaves
    /// excluded.
    pub fn check_invariants(&self) -> Result<u32, InvariantViolation> {
        if self.root == NIL {
            return match self.len {
                0 => Ok(0),
                len => Err(InvariantViolation::LenMismatch { reachable: 0, len }),
            };
        }
        let root = Descriptor(self.root);
        if self.color_of(self.root) != BLACK {
            return Err(InvariantViolation::RedRoot { root });
        }
        if self.parent_of(self.root) != NIL {
            return Err(InvariantViolation::RootHasParent { root });
        }

        let mut reachable = 0;
        let height = self.check_subtree(self.root, &mut reachable)?;
        if reachable != self.len {
            return Err(InvariantViolation::LenMismatch {
                reachable,
                len: self.len,
            });
        }

        let mut prev: Option<u32> = None;
        for (d, entry) in self.iter() {
            if let Some(prev) = prev {
                if (self.compare)(prev, entry.key) != Ordering::Less {
                    return Err(InvariantViolation::OutOfOrder { node: d });
                }
            }
            prev = Some(entry.key);
        }
        Ok(height)
    }

    fn check_subtree(&self, n: u32, reachable: &mut u32) -> Result<u32, InvariantViolation> {
        if n == NIL {
            return Ok(0);
        }
        *reachable += 1;
        if *reachable > self.len {
            // Also stops the walk on a cyclic link structure.
            return Err(InvariantViolation::LenMismatch {
                reachable: *reachable,
                len: self.len,
            });
        }
        let color = self.color_of(n);
        if color != RED && color != BLACK {
            return Err(InvariantViolation::FreedNodeLinked {
                node: Descriptor(n),
            });
        }

        let left = self.left_of(n);
        let right = self.right_of(n);
        for child in [left, right] {
            if child == NIL {
                continue;
            }
            if self.parent_of(child) != n {
                return Err(InvariantViolation::BrokenParentLink {
                    node: Descriptor(child),
                });
            }
            if color == RED && self.color_of(child) == RED {
                return Err(InvariantViolation::RedChildOfRed {
                    node: Descriptor(child),
                });
            }
        }

        let lh = self.check_subtree(left, reachable)?;
        let rh = self.check_subtree(right, reachable)?;
        if lh != rh {
            return Err(InvariantViolation::BlackHeightMismatch {
                node: Descriptor(n),
                left: lh,
                right: rh,
            });
        }
        Ok(lh + u32::from(color == BLACK))
    }
}

#[cfg(test)]
mod tests {
    use keel_arena::LinearArena;

    use super::*;

    fn tree() -> RbTree<LinearArena<'static>> {
        RbTree::new(LinearArena::with_capacity(16 * 1024, false).unwrap())
    }

    #[test]
    fn empty_tree_has_zero_height() {
        assert_eq!(tree().check_invariants(), Ok(0));
    }

    #[test]
    fn clrs_fixture_is_valid() {
        let mut t = tree();
        for k in [24, 18, 26, 5, 20, 27, 2, 7, 23, 21] {
            t.put(k, k).unwrap();
        }
        assert_eq!(t.check_invariants(), Ok(2));
    }

    #[test]
    fn detects_red_root() {
        let mut t = tree();
        t.put(1, 1).unwrap();
        t.set_color(t.root, RED);
        assert_eq!(
            t.check_invariants(),
            Err(InvariantViolation::RedRoot {
                root: Descriptor(0)
            })
        );
    }

    #[test]
    fn detects_black_height_mismatch() {
        let mut t = tree();
        for k in [2, 1, 3] {
            t.put(k, k).unwrap();
        }
        let left = t.left_of(t.root);
        t.set_color(left, BLACK);
        assert!(matches!(
            t.check_invariants(),
            Err(InvariantViolation::BlackHeightMismatch { .. })
        ));
    }

    #[test]
    fn detects_red_red() {
        let mut t = tree();
        for k in [2, 1, 3, 4] {
            t.put(k, k).unwrap();
        }
        // 3 is black with red child 4; repainting 3 red breaks the rule.
        let three = t.find(3).unwrap().0;
        t.set_color(three, RED);
        assert_eq!(
            t.check_invariants(),
            Err(InvariantViolation::RedChildOfRed {
                node: t.find(4).unwrap()
            })
        );
    }
}
