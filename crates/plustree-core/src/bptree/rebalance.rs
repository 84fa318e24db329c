use super::node::Detached;
use super::{BPlusTree, Node, NodeId};
use std::mem;
use tracing::{debug, trace};

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Restores minimum fill from `node_id` upward after a removal.
    ///
    /// Left borrow wins over right borrow, and either wins over a merge. A
    /// merge takes one key out of the parent, so the loop climbs to it.
    pub(super) fn rebalance(&mut self, mut node_id: NodeId) {
        while node_id != self.root {
            let node = self.arena.get(node_id);
            if !self.policy.is_underflow(node.key_count()) {
                return;
            }
            let Some(parent_id) = node.parent() else {
                return;
            };

            let Some(parent) = self.arena.get(parent_id).as_interior() else {
                return;
            };
            let Some(idx) = parent.position_of(node_id) else {
                return;
            };
            let left = idx.checked_sub(1).map(|i| parent.children[i]);
            let right = parent.children.get(idx + 1).copied();

            if let Some(left_id) = left {
                if self.policy.can_lend(self.arena.get(left_id).key_count()) {
                    self.borrow_from_left(node_id, left_id, parent_id, idx);
                    return;
                }
            }

            if let Some(right_id) = right {
                if self.policy.can_lend(self.arena.get(right_id).key_count()) {
                    self.borrow_from_right(node_id, right_id, parent_id, idx);
                    return;
                }
            }

            match (left, right) {
                (Some(left_id), _) => self.merge(left_id, node_id, parent_id, idx - 1),
                (None, Some(right_id)) => self.merge(node_id, right_id, parent_id, idx),
                (None, None) => return,
            }

            node_id = parent_id;
        }
    }

    /// Replaces an internal root left without keys by its only child.
    pub(super) fn collapse_root(&mut self) {
        while let Node::Interior(root) = self.arena.get(self.root) {
            if !root.keys.is_empty() {
                return;
            }
            let child = root.children[0];
            self.arena.free(self.root);
            self.arena.get_mut(child).set_parent(None);
            self.root = child;
            debug!(root = %child, height = self.height(), "collapsed root");
        }
    }

    /// Moves the left sibling's last entry to the front of `node_id`.
    fn borrow_from_left(&mut self, node_id: NodeId, left_id: NodeId, parent_id: NodeId, idx: usize) {
        let Some(detached) = self.arena.get_mut(left_id).pop_last() else {
            return;
        };

        match detached {
            Detached::Entry(key, value) => {
                self.leaf_mut(node_id).push_front(key.clone(), value);
                self.interior_mut(parent_id).keys[idx - 1] = key;
            }
            Detached::Child(key, child) => {
                let separator = mem::replace(&mut self.interior_mut(parent_id).keys[idx - 1], key);
                self.interior_mut(node_id).push_front(separator, child);
                self.arena.get_mut(child).set_parent(Some(node_id));
                trace!(node = %node_id, child = %child, "rotated child through parent");
            }
        }

        debug!(node = %node_id, sibling = %left_id, "borrowed from left sibling");
    }

    /// Moves the right sibling's first entry to the end of `node_id`.
    fn borrow_from_right(&mut self, node_id: NodeId, right_id: NodeId, parent_id: NodeId, idx: usize) {
        let Some(detached) = self.arena.get_mut(right_id).pop_first() else {
            return;
        };

        match detached {
            Detached::Entry(key, value) => {
                self.leaf_mut(node_id).push_back(key, value);
                let new_first = self.arena.get(right_id).keys()[0].clone();
                self.interior_mut(parent_id).keys[idx] = new_first;
            }
            Detached::Child(key, child) => {
                let separator = mem::replace(&mut self.interior_mut(parent_id).keys[idx], key);
                self.interior_mut(node_id).push_back(separator, child);
                self.arena.get_mut(child).set_parent(Some(node_id));
                trace!(node = %node_id, child = %child, "rotated child through parent");
            }
        }

        debug!(node = %node_id, sibling = %right_id, "borrowed from right sibling");
    }

    /// Folds `right_id` into `left_id` and drops the separator at `sep_idx`
    /// (with the child slot to its right) from the parent.
    fn merge(&mut self, left_id: NodeId, right_id: NodeId, parent_id: NodeId, sep_idx: usize) {
        let (separator, _) = self.interior_mut(parent_id).remove_child(sep_idx);

        match self.arena.take(right_id) {
            Node::Leaf(right) => self.leaf_mut(left_id).absorb(right),
            Node::Interior(right) => {
                let moved = right.children.clone();
                self.interior_mut(left_id).absorb(separator, right);
                for child in moved {
                    self.arena.get_mut(child).set_parent(Some(left_id));
                }
            }
        }

        debug!(survivor = %left_id, removed = %right_id, parent = %parent_id, "merged siblings");
    }
}
