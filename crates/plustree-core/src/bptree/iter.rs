use super::arena::Arena;
use super::{Node, NodeId, NodeRef};

/// Walks leaf entries in ascending key order by following `next` links.
pub struct BPTreeIter<'a, K, V> {
    arena: &'a Arena<Node<K, V>>,
    current_leaf: Option<NodeId>,
    current_idx: usize,
}

impl<'a, K: Ord + Clone, V> BPTreeIter<'a, K, V> {
    pub(crate) fn new(arena: &'a Arena<Node<K, V>>, leaf: NodeId, start_idx: usize) -> Self {
        BPTreeIter {
            arena,
            current_leaf: Some(leaf),
            current_idx: start_idx,
        }
    }
}

impl<'a, K: Ord + Clone, V> Iterator for BPTreeIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        loop {
            let leaf = arena.get(self.current_leaf?).as_leaf()?;

            if self.current_idx < leaf.keys.len() {
                let idx = self.current_idx;
                self.current_idx += 1;
                return Some((&leaf.keys[idx], &leaf.values[idx]));
            }

            self.current_leaf = leaf.next;
            self.current_idx = 0;
        }
    }
}

/// Half-open `[start, end)` scan on top of [`BPTreeIter`].
pub struct RangeIter<'a, K, V> {
    inner: BPTreeIter<'a, K, V>,
    end: K,
}

impl<'a, K: Ord + Clone, V> RangeIter<'a, K, V> {
    pub(crate) fn new(inner: BPTreeIter<'a, K, V>, end: &K) -> Self {
        RangeIter {
            inner,
            end: end.clone(),
        }
    }
}

impl<'a, K: Ord + Clone, V> Iterator for RangeIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.inner.next()?;
        if *key >= self.end {
            self.inner.current_leaf = None;
            return None;
        }
        Some((key, value))
    }
}

/// Leaf nodes in chain order, leftmost first.
pub struct Leaves<'a, K, V> {
    arena: &'a Arena<Node<K, V>>,
    current_leaf: Option<NodeId>,
}

impl<'a, K: Ord + Clone, V> Leaves<'a, K, V> {
    pub(crate) fn new(arena: &'a Arena<Node<K, V>>, first: NodeId) -> Self {
        Leaves {
            arena,
            current_leaf: Some(first),
        }
    }
}

impl<'a, K: Ord + Clone, V> Iterator for Leaves<'a, K, V> {
    type Item = NodeRef<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current_leaf?;
        let node = self.arena.get(id);
        self.current_leaf = node.as_leaf().and_then(|leaf| leaf.next);
        Some(NodeRef::new(id, node))
    }
}
