use std::sync::Arc;

use async_trait::async_trait;

use crate::{OrderSnapshot, Result, StoredOrder};

/// Append-only sink for placed orders.
///
/// The storefront writes each order exactly once and never reads it back.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Creates a new order record.
    ///
    /// The store assigns `created_at`/`updated_at` and returns its own
    /// reference for the record. Fails with `DuplicateOrderId` if a record
    /// with the same order id already exists.
    async fn create(&self, order: &OrderSnapshot) -> Result<StoredOrder>;
}

#[async_trait]
impl<T: OrderStore + ?Sized> OrderStore for Arc<T> {
    async fn create(&self, order: &OrderSnapshot) -> Result<StoredOrder> {
        (**self).create(order).await
    }
}
