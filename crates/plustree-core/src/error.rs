use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid order {order}: a B+ tree needs an order of at least 3")]
    InvalidOrder { order: usize },

    #[error("Key not found")]
    KeyNotFound,

    #[error("Tree corrupted: {0}")]
    Corrupted(String),
}
