pub mod error;
pub mod config;

pub mod bptree;
pub mod shared;

pub use error::{Error, Result};
pub use config::{TreeConfig, DEFAULT_ORDER, MIN_ORDER};
pub use bptree::{BPlusTree, BPTreeIter, BalancePolicy, Leaves, NodeId, NodeRef, RangeIter};
pub use shared::SharedTree;
