use crate::config::{TreeConfig, DEFAULT_ORDER};
use crate::error::Result;

/// Fill thresholds derived from the tree order.
///
/// These are pure predicates over a key count; they never touch a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalancePolicy {
    order: usize,
}

impl Default for BalancePolicy {
    fn default() -> Self {
        BalancePolicy {
            order: DEFAULT_ORDER,
        }
    }
}

impl BalancePolicy {
    pub fn new(config: &TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(BalancePolicy {
            order: config.order,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn max_keys(&self) -> usize {
        self.order - 1
    }

    /// `ceil(order / 2) - 1`; the root is exempt.
    pub fn min_keys(&self) -> usize {
        self.order.div_ceil(2) - 1
    }

    /// True once a raw insert has pushed a node past `order - 1` keys.
    pub fn is_full(&self, key_count: usize) -> bool {
        key_count > self.max_keys()
    }

    /// True once a raw removal has left a non-root node below the minimum.
    pub fn is_underflow(&self, key_count: usize) -> bool {
        key_count < self.min_keys()
    }

    /// A sibling may lend an entry only if it stays at or above the minimum.
    pub fn can_lend(&self, key_count: usize) -> bool {
        key_count > self.min_keys()
    }
}
