//! Cart error types.

use thiserror::Error;

/// Caller errors rejected by the cart engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantity passed to `add_item` was zero.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Unit price was negative.
    #[error("Invalid price: {price} (must not be negative)")]
    InvalidPrice { price: i64 },
}

/// Errors from the variant staging area.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StagingError {
    /// Commit was attempted with no variants selected.
    #[error("Nothing selected")]
    NothingSelected,

    /// The cart rejected a staged line.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

/// Errors from the client storage slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The slot cannot be used (e.g. quota exceeded, storage disabled).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
