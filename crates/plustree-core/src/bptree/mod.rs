mod arena;
mod node;
mod leaf;
mod interior;
mod iter;
mod policy;
mod rebalance;
mod validate;
mod view;

pub use arena::NodeId;
pub use iter::{BPTreeIter, Leaves, RangeIter};
pub use policy::BalancePolicy;
pub use view::NodeRef;

pub(crate) use interior::InteriorNode;
pub(crate) use leaf::LeafNode;
pub(crate) use node::Node;

use crate::config::TreeConfig;
use crate::error::{Error, Result};
use arena::Arena;
use std::collections::VecDeque;
use std::fmt;
use tracing::debug;

/// An in-memory B+ tree.
///
/// All entries live in leaves, which are chained left to right for ordered
/// scans. Nodes are stored in an arena and refer to their parent and children
/// by [`NodeId`]; the tree exclusively owns every node.
#[derive(Debug, Clone)]
pub struct BPlusTree<K, V> {
    arena: Arena<Node<K, V>>,
    root: NodeId,
    policy: BalancePolicy,
    len: usize,
}

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    pub fn new(order: usize) -> Result<Self> {
        Self::with_config(TreeConfig::new(order))
    }

    pub fn with_config(config: TreeConfig) -> Result<Self> {
        let policy = BalancePolicy::new(&config)?;
        Ok(Self::with_policy(policy))
    }

    fn with_policy(policy: BalancePolicy) -> Self {
        let mut arena = Arena::new();
        let root = arena.alloc(Node::new_leaf());
        BPlusTree {
            arena,
            root,
            policy,
            len: 0,
        }
    }

    pub fn order(&self) -> usize {
        self.policy.order()
    }

    pub fn policy(&self) -> &BalancePolicy {
        &self.policy
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live nodes, leaves and internal nodes alike.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Levels from the root down to the leaves; a lone leaf root has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let Node::Interior(interior) = self.arena.get(current) {
            current = interior.children[0];
            height += 1;
        }
        height
    }

    /// Drops every entry, leaving a single empty leaf as root.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = self.arena.alloc(Node::new_leaf());
        self.len = 0;
    }

    pub fn search(&self, key: &K) -> bool {
        self.leaf(self.leaf_for(key)).contains(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.leaf(self.leaf_for(key)).get(key)
    }

    pub fn first_key(&self) -> Option<&K> {
        self.leaf(self.leftmost_leaf()).keys.first()
    }

    pub fn last_key(&self) -> Option<&K> {
        let mut current = self.root;
        while let Node::Interior(interior) = self.arena.get(current) {
            current = interior.children[interior.children.len() - 1];
        }
        self.leaf(current).keys.last()
    }

    /// Inserts `key` if it is absent and returns whether it was added.
    ///
    /// A key that is already present keeps its original value; the new value
    /// is dropped.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let leaf_id = self.leaf_for(&key);
        let leaf = self.leaf_mut(leaf_id);
        if leaf.insert(key, value).is_err() {
            return false;
        }
        let key_count = leaf.len();
        self.len += 1;

        if self.policy.is_full(key_count) {
            self.split_leaf(leaf_id);
        }
        true
    }

    /// Removes `key` and returns its value, rebalancing on underflow.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let leaf_id = self.leaf_for(key);
        let value = self.leaf_mut(leaf_id).remove(key)?;
        self.len -= 1;

        self.rebalance(leaf_id);
        self.collapse_root();
        Some(value)
    }

    /// Like [`remove`](Self::remove), but reports a missing key as
    /// [`Error::KeyNotFound`]. The tree is untouched in that case.
    pub fn delete(&mut self, key: &K) -> Result<V> {
        self.remove(key).ok_or(Error::KeyNotFound)
    }

    pub fn iter(&self) -> BPTreeIter<'_, K, V> {
        BPTreeIter::new(&self.arena, self.leftmost_leaf(), 0)
    }

    /// Entries with keys `>= start`, in ascending order.
    pub fn range_scan(&self, start: &K) -> BPTreeIter<'_, K, V> {
        let leaf_id = self.leaf_for(start);
        let idx = self.leaf(leaf_id).keys.partition_point(|k| k < start);
        BPTreeIter::new(&self.arena, leaf_id, idx)
    }

    /// Entries with keys in `[start, end)`.
    pub fn range(&self, start: &K, end: &K) -> RangeIter<'_, K, V> {
        RangeIter::new(self.range_scan(start), end)
    }

    pub fn root(&self) -> NodeRef<'_, K, V> {
        NodeRef::new(self.root, self.arena.get(self.root))
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, K, V>> {
        self.arena.try_get(id).map(|node| NodeRef::new(id, node))
    }

    pub fn leaves(&self) -> Leaves<'_, K, V> {
        Leaves::new(&self.arena, self.leftmost_leaf())
    }

    /// Nodes grouped by depth, each level left to right.
    pub fn levels(&self) -> Vec<Vec<NodeRef<'_, K, V>>> {
        let mut levels = Vec::new();
        let mut queue = VecDeque::from([self.root]);

        while !queue.is_empty() {
            let mut level = Vec::with_capacity(queue.len());
            for _ in 0..queue.len() {
                let Some(id) = queue.pop_front() else { break };
                let node = self.arena.get(id);
                if let Node::Interior(interior) = node {
                    queue.extend(interior.children.iter().copied());
                }
                level.push(NodeRef::new(id, node));
            }
            levels.push(level);
        }

        levels
    }

    fn leaf_for(&self, key: &K) -> NodeId {
        let mut current = self.root;
        loop {
            match self.arena.get(current) {
                Node::Leaf(_) => return current,
                Node::Interior(interior) => current = interior.child_for(key),
            }
        }
    }

    fn leftmost_leaf(&self) -> NodeId {
        let mut current = self.root;
        while let Node::Interior(interior) = self.arena.get(current) {
            current = interior.children[0];
        }
        current
    }

    fn split_leaf(&mut self, leaf_id: NodeId) {
        let (separator, new_leaf) = self.leaf_mut(leaf_id).split();
        let new_leaf_id = self.arena.alloc(Node::Leaf(new_leaf));
        self.leaf_mut(leaf_id).next = Some(new_leaf_id);

        debug!(left = %leaf_id, right = %new_leaf_id, "split leaf");
        self.insert_into_parent(leaf_id, separator, new_leaf_id);
    }

    /// Hooks `right` into the parent of `left`, splitting interior nodes
    /// upward for as long as they overflow.
    fn insert_into_parent(&mut self, mut left: NodeId, mut separator: K, mut right: NodeId) {
        loop {
            let Some(parent_id) = self.arena.get(left).parent() else {
                let new_root = self
                    .arena
                    .alloc(Node::Interior(InteriorNode::new_root(separator, left, right)));
                self.arena.get_mut(left).set_parent(Some(new_root));
                self.arena.get_mut(right).set_parent(Some(new_root));
                self.root = new_root;
                debug!(root = %new_root, height = self.height(), "grew new root");
                return;
            };

            let parent = self.interior_mut(parent_id);
            parent.insert_child(separator, right);
            let key_count = parent.len();
            self.arena.get_mut(right).set_parent(Some(parent_id));

            if !self.policy.is_full(key_count) {
                return;
            }

            let (promoted, new_interior) = self.interior_mut(parent_id).split();
            let moved: Vec<NodeId> = new_interior.children.clone();
            let new_interior_id = self.arena.alloc(Node::Interior(new_interior));
            for child in moved {
                self.arena.get_mut(child).set_parent(Some(new_interior_id));
            }
            debug!(left = %parent_id, right = %new_interior_id, "split interior node");

            left = parent_id;
            separator = promoted;
            right = new_interior_id;
        }
    }

    fn leaf(&self, id: NodeId) -> &LeafNode<K, V> {
        match self.arena.get(id) {
            Node::Leaf(leaf) => leaf,
            Node::Interior(_) => panic!("node {} is not a leaf", id),
        }
    }

    fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<K, V> {
        match self.arena.get_mut(id) {
            Node::Leaf(leaf) => leaf,
            Node::Interior(_) => panic!("node {} is not a leaf", id),
        }
    }

    fn interior_mut(&mut self, id: NodeId) -> &mut InteriorNode<K> {
        match self.arena.get_mut(id) {
            Node::Interior(interior) => interior,
            Node::Leaf(_) => panic!("node {} is not an interior node", id),
        }
    }
}

impl<K: Ord + Clone, V> Default for BPlusTree<K, V> {
    fn default() -> Self {
        Self::with_policy(BalancePolicy::default())
    }
}

impl<'a, K: Ord + Clone, V> IntoIterator for &'a BPlusTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = BPTreeIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One line per level, e.g. `[Internal: 5]` over `[Leaf: 1, 2] [Leaf: 5, 6]`.
impl<K: Ord + Clone + fmt::Display, V> fmt::Display for BPlusTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, level) in self.levels().iter().enumerate() {
            if depth > 0 {
                writeln!(f)?;
            }
            for (i, node) in level.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                let kind = if node.is_leaf() { "Leaf" } else { "Internal" };
                write!(f, "[{}:", kind)?;
                for (j, key) in node.keys().iter().enumerate() {
                    let sep = if j == 0 { " " } else { ", " };
                    write!(f, "{}{}", sep, key)?;
                }
                write!(f, "]")?;
            }
        }
        Ok(())
    }
}
