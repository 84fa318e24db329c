use super::{InteriorNode, LeafNode, NodeId};

/// A node never changes variant over its lifetime.
#[derive(Debug, Clone)]
pub(crate) enum Node<K, V> {
    Leaf(LeafNode<K, V>),
    Interior(InteriorNode<K>),
}

/// An entry detached from a node during borrowing: a key/value pair from a
/// leaf, or a separator with its adjacent child from an interior node.
pub(crate) enum Detached<K, V> {
    Entry(K, V),
    Child(K, NodeId),
}

impl<K: Ord + Clone, V> Node<K, V> {
    pub fn new_leaf() -> Self {
        Node::Leaf(LeafNode::new())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn keys(&self) -> &[K] {
        match self {
            Node::Leaf(leaf) => &leaf.keys,
            Node::Interior(interior) => &interior.keys,
        }
    }

    pub fn key_count(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.len(),
            Node::Interior(interior) => interior.len(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Leaf(leaf) => leaf.parent,
            Node::Interior(interior) => interior.parent,
        }
    }

    pub fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            Node::Leaf(leaf) => leaf.parent = parent,
            Node::Interior(interior) => interior.parent = parent,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode<K, V>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_interior(&self) -> Option<&InteriorNode<K>> {
        match self {
            Node::Interior(interior) => Some(interior),
            _ => None,
        }
    }

    pub fn pop_first(&mut self) -> Option<Detached<K, V>> {
        match self {
            Node::Leaf(leaf) => leaf.pop_first().map(|(k, v)| Detached::Entry(k, v)),
            Node::Interior(interior) => interior.pop_first().map(|(k, c)| Detached::Child(k, c)),
        }
    }

    pub fn pop_last(&mut self) -> Option<Detached<K, V>> {
        match self {
            Node::Leaf(leaf) => leaf.pop_last().map(|(k, v)| Detached::Entry(k, v)),
            Node::Interior(interior) => interior.pop_last().map(|(k, c)| Detached::Child(k, c)),
        }
    }
}
