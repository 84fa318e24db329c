use super::NodeId;

/// Leaf node: parallel key/value sequences plus the forward link of the leaf chain.
#[derive(Debug, Clone)]
pub(crate) struct LeafNode<K, V> {
    pub(super) keys: Vec<K>,
    pub(super) values: Vec<V>,
    pub(super) next: Option<NodeId>,
    pub(super) parent: Option<NodeId>,
}

impl<K: Ord + Clone, V> LeafNode<K, V> {
    pub fn new() -> Self {
        LeafNode {
            keys: Vec::new(),
            values: Vec::new(),
            next: None,
            parent: None,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.keys
            .binary_search(key)
            .ok()
            .map(|idx| &self.values[idx])
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.binary_search(key).is_ok()
    }

    /// Inserts at the sorted position. A key already present is left untouched
    /// and the rejected value is handed back.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), V> {
        match self.keys.binary_search(&key) {
            Ok(_) => Err(value),
            Err(idx) => {
                self.keys.insert(idx, key);
                self.values.insert(idx, value);
                Ok(())
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.keys.binary_search(key).ok()?;
        self.keys.remove(idx);
        Some(self.values.remove(idx))
    }

    /// Moves the upper half (from `ceil(len / 2)`) into a new right sibling.
    ///
    /// Returns the right sibling's first key, which stays in the sibling and is
    /// copied up as the parent separator. The caller links `self.next`.
    pub fn split(&mut self) -> (K, LeafNode<K, V>) {
        let mid = self.keys.len().div_ceil(2);
        let new_keys = self.keys.split_off(mid);
        let new_values = self.values.split_off(mid);
        let separator = new_keys[0].clone();

        let new_leaf = LeafNode {
            keys: new_keys,
            values: new_values,
            next: self.next,
            parent: self.parent,
        };

        (separator, new_leaf)
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        if self.keys.is_empty() {
            return None;
        }
        Some((self.keys.remove(0), self.values.remove(0)))
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let key = self.keys.pop()?;
        let value = self.values.pop()?;
        Some((key, value))
    }

    pub fn push_front(&mut self, key: K, value: V) {
        self.keys.insert(0, key);
        self.values.insert(0, value);
    }

    pub fn push_back(&mut self, key: K, value: V) {
        self.keys.push(key);
        self.values.push(value);
    }

    /// Absorbs the right sibling and takes over its place in the leaf chain.
    pub fn absorb(&mut self, right: LeafNode<K, V>) {
        self.keys.extend(right.keys);
        self.values.extend(right.values);
        self.next = right.next;
    }
}
