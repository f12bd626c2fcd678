//! Durable order store.
//!
//! Placed orders are written once, as an [`OrderSnapshot`], through the
//! [`OrderStore`] trait. Two implementations are provided: an in-memory store
//! for tests and local runs, and a PostgreSQL store.

pub mod error;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod store;

pub use error::{OrderStoreError, Result};
pub use memory::InMemoryOrderStore;
pub use order::{DeliveryAddress, OrderId, OrderSnapshot, OrderStatus, PaymentStatus, StoredOrder};
pub use postgres::PostgresOrderStore;
pub use store::OrderStore;
