use super::{Node, NodeId};

/// Read-only view of one node, for walking the whole node graph from the
/// outside (rendering, inspection). Nothing reachable from here can mutate
/// the tree.
pub struct NodeRef<'a, K, V> {
    id: NodeId,
    node: &'a Node<K, V>,
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<'a, K: Ord + Clone, V> NodeRef<'a, K, V> {
    pub(crate) fn new(id: NodeId, node: &'a Node<K, V>) -> Self {
        NodeRef { id, node }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    pub fn keys(&self) -> &'a [K] {
        self.node.keys()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.node.parent()
    }

    /// Payloads parallel to `keys()`; `None` for an internal node.
    pub fn values(&self) -> Option<&'a [V]> {
        self.node.as_leaf().map(|leaf| leaf.values.as_slice())
    }

    /// Child handles, one more than `keys()`; `None` for a leaf.
    pub fn children(&self) -> Option<&'a [NodeId]> {
        self.node
            .as_interior()
            .map(|interior| interior.children.as_slice())
    }

    /// The following leaf in key order; always `None` for an internal node.
    pub fn next(&self) -> Option<NodeId> {
        self.node.as_leaf().and_then(|leaf| leaf.next)
    }
}

impl<K: Ord + Clone + std::fmt::Debug, V> std::fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("is_leaf", &self.is_leaf())
            .field("keys", &self.keys())
            .finish()
    }
}
