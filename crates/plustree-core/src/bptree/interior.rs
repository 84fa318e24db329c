use super::NodeId;

/// Internal node: `keys.len() + 1` children separated by pure separator keys.
#[derive(Debug, Clone)]
pub(crate) struct InteriorNode<K> {
    pub(super) keys: Vec<K>,
    pub(super) children: Vec<NodeId>,
    pub(super) parent: Option<NodeId>,
}

impl<K: Ord> InteriorNode<K> {
    /// A fresh root with one separator over two children.
    pub fn new_root(separator: K, left: NodeId, right: NodeId) -> Self {
        InteriorNode {
            keys: vec![separator],
            children: vec![left, right],
            parent: None,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Index of the child to descend into: the number of separators `<= key`.
    pub fn child_index(&self, key: &K) -> usize {
        match self.keys.binary_search(key) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }

    pub fn child_for(&self, key: &K) -> NodeId {
        self.children[self.child_index(key)]
    }

    pub fn position_of(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    /// Inserts `separator` and places `child` immediately to its right.
    pub fn insert_child(&mut self, separator: K, child: NodeId) {
        let idx = match self.keys.binary_search(&separator) {
            Ok(i) => i + 1,
            Err(i) => i,
        };
        self.keys.insert(idx, separator);
        self.children.insert(idx + 1, child);
    }

    /// Splits at `len / 2`. The middle key is removed and returned for the
    /// grandparent; the right half's children must be re-parented by the caller.
    pub fn split(&mut self) -> (K, InteriorNode<K>) {
        let mid = self.keys.len() / 2;
        let middle_key = self.keys.remove(mid);
        let new_keys = self.keys.split_off(mid);
        let new_children = self.children.split_off(mid + 1);

        let new_interior = InteriorNode {
            keys: new_keys,
            children: new_children,
            parent: self.parent,
        };

        (middle_key, new_interior)
    }

    /// Detaches the separator at `idx` together with the child to its right.
    pub fn remove_child(&mut self, idx: usize) -> (K, NodeId) {
        let separator = self.keys.remove(idx);
        let child = self.children.remove(idx + 1);
        (separator, child)
    }

    pub fn pop_first(&mut self) -> Option<(K, NodeId)> {
        if self.keys.is_empty() {
            return None;
        }
        Some((self.keys.remove(0), self.children.remove(0)))
    }

    pub fn pop_last(&mut self) -> Option<(K, NodeId)> {
        let key = self.keys.pop()?;
        let child = self.children.pop()?;
        Some((key, child))
    }

    pub fn push_front(&mut self, key: K, child: NodeId) {
        self.keys.insert(0, key);
        self.children.insert(0, child);
    }

    pub fn push_back(&mut self, key: K, child: NodeId) {
        self.keys.push(key);
        self.children.push(child);
    }

    /// Pulls the parent separator down between the two key runs and takes
    /// over the right sibling's children.
    pub fn absorb(&mut self, separator: K, right: InteriorNode<K>) {
        self.keys.push(separator);
        self.keys.extend(right.keys);
        self.children.extend(right.children);
    }
}
