use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{OrderId, OrderSnapshot, OrderStore, OrderStoreError, Result, StoredOrder};

#[derive(Debug, Default)]
struct InMemoryState {
    orders: Vec<(StoredOrder, OrderSnapshot)>,
    next_id: u32,
    unavailable: bool,
}

/// In-memory order store for tests and local runs.
///
/// Behaves like the PostgreSQL store, including duplicate detection, and can
/// be switched into a failing mode to exercise persistence errors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with `Unavailable` (or stop failing).
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns the stored snapshot for an order id.
    pub async fn get(&self, order_id: &OrderId) -> Option<OrderSnapshot> {
        self.state
            .read()
            .await
            .orders
            .iter()
            .find(|(_, order)| &order.order_id == order_id)
            .map(|(_, order)| order.clone())
    }

    /// Returns all stored snapshots in insertion order.
    pub async fn all(&self) -> Vec<OrderSnapshot> {
        self.state
            .read()
            .await
            .orders
            .iter()
            .map(|(_, order)| order.clone())
            .collect()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: &OrderSnapshot) -> Result<StoredOrder> {
        let mut state = self.state.write().await;

        if state.unavailable {
            return Err(OrderStoreError::Unavailable(
                "in-memory store is offline".to_string(),
            ));
        }

        if state
            .orders
            .iter()
            .any(|(_, existing)| existing.order_id == order.order_id)
        {
            return Err(OrderStoreError::DuplicateOrderId(order.order_id.clone()));
        }

        state.next_id += 1;
        let now = Utc::now();
        let stored = StoredOrder {
            reference: format!("REC-{:04}", state.next_id),
            created_at: now,
            updated_at: now,
        };
        state.orders.push((stored.clone(), order.clone()));

        Ok(stored)
    }
}
