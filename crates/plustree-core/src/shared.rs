use crate::bptree::BPlusTree;
use crate::config::TreeConfig;
use crate::error::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// A [`BPlusTree`] behind one reader-writer lock, shareable across threads.
///
/// Lookups share the read lock; every mutation takes the write lock for its
/// whole duration, so no reader ever sees a half-rebalanced tree.
pub struct SharedTree<K, V> {
    inner: Arc<RwLock<BPlusTree<K, V>>>,
}

impl<K, V> Clone for SharedTree<K, V> {
    fn clone(&self) -> Self {
        SharedTree {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: Ord + Clone, V> SharedTree<K, V> {
    pub fn new(order: usize) -> Result<Self> {
        Self::with_config(TreeConfig::new(order))
    }

    pub fn with_config(config: TreeConfig) -> Result<Self> {
        Ok(Self::from_tree(BPlusTree::with_config(config)?))
    }

    pub fn from_tree(tree: BPlusTree<K, V>) -> Self {
        SharedTree {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    pub fn search(&self, key: &K) -> bool {
        self.inner.read().search(key)
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn insert(&self, key: K, value: V) -> bool {
        self.inner.write().insert(key, value)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.write().remove(key)
    }

    pub fn delete(&self, key: &K) -> Result<V> {
        self.inner.write().delete(key)
    }

    /// Runs `f` under the read lock, e.g. for a range scan.
    pub fn read<R>(&self, f: impl FnOnce(&BPlusTree<K, V>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` under the write lock, e.g. for a batch of inserts.
    pub fn write<R>(&self, f: impl FnOnce(&mut BPlusTree<K, V>) -> R) -> R {
        f(&mut self.inner.write())
    }
}
