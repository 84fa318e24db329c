use crate::error::{Error, Result};

/// Smallest order for which every non-root internal node can keep two children.
pub const MIN_ORDER: usize = 3;

pub const DEFAULT_ORDER: usize = 4;

/// Construction-time settings of a [`BPlusTree`](crate::BPlusTree).
///
/// `order` is the maximum fan-out of an internal node; every node holds at
/// most `order - 1` keys. It is fixed for the lifetime of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    pub order: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            order: DEFAULT_ORDER,
        }
    }
}

impl TreeConfig {
    pub fn new(order: usize) -> Self {
        TreeConfig { order }
    }

    pub fn validate(&self) -> Result<()> {
        if self.order < MIN_ORDER {
            return Err(Error::InvalidOrder { order: self.order });
        }

        Ok(())
    }
}
