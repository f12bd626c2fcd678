use thiserror::Error;

use crate::OrderId;

/// Errors that can occur when writing to the order store.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// An order with this id already exists.
    #[error("Duplicate order id: {0}")]
    DuplicateOrderId(OrderId),

    /// The store could not be reached or refused the write.
    #[error("Order store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, OrderStoreError>;
