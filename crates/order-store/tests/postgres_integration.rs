//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p order-store --test postgres_integration
//! ```

use std::sync::Arc;

use common::{IdentityKey, LineItem, Money, ProductId};
use order_store::{
    DeliveryAddress, OrderId, OrderSnapshot, OrderStatus, OrderStore, OrderStoreError,
    PaymentStatus, PostgresOrderStore,
};
use serial_test::serial;
use sqlx::{PgPool, Row};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            PostgresOrderStore::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and an empty orders table
async fn get_test_store() -> PostgresOrderStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE orders")
        .execute(&pool)
        .await
        .unwrap();

    PostgresOrderStore::new(pool)
}

fn create_test_order(order_id: OrderId) -> OrderSnapshot {
    let product_id = ProductId::new("basmati-rice");
    OrderSnapshot {
        order_id,
        items: vec![LineItem {
            id: IdentityKey::for_variant(&product_id, "5kg"),
            product_id,
            brand_label: "Acme Basmati".to_string(),
            variant_label: "5kg".to_string(),
            unit_price: Money::from_cents(65_000),
            image_ref: Some("/images/basmati-5kg.webp".to_string()),
            promotional_tag: Some("Bestseller".to_string()),
            quantity: 2,
        }],
        subtotal: Money::from_cents(130_000),
        shipping_cost: Money::from_cents(5_000),
        total: Money::from_cents(135_000),
        customer_name: "Ravi".to_string(),
        customer_phone: "9000000001".to_string(),
        delivery_address: DeliveryAddress {
            door: "7A".to_string(),
            street: "Beach Road".to_string(),
            district: "Kozhikode".to_string(),
            state: "Kerala".to_string(),
            postal_code: "673001".to_string(),
        },
        notes: Some("Call before delivery".to_string()),
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
    }
}

#[tokio::test]
#[serial]
async fn create_persists_full_snapshot() {
    let store = get_test_store().await;
    let order_id = OrderId::generate(chrono::Utc::now());

    let stored = store
        .create(&create_test_order(order_id.clone()))
        .await
        .unwrap();

    let row = sqlx::query(
        "SELECT order_id, items, total_cents, customer_phone, address_postal_code, notes, status, payment_status FROM orders WHERE id = $1",
    )
    .bind(uuid::Uuid::parse_str(&stored.reference).unwrap())
    .fetch_one(store.pool())
    .await
    .unwrap();

    assert_eq!(row.get::<String, _>("order_id"), order_id.as_str());
    assert_eq!(row.get::<i64, _>("total_cents"), 135_000);
    assert_eq!(row.get::<String, _>("customer_phone"), "9000000001");
    assert_eq!(row.get::<String, _>("address_postal_code"), "673001");
    assert_eq!(
        row.get::<Option<String>, _>("notes").as_deref(),
        Some("Call before delivery")
    );
    assert_eq!(row.get::<String, _>("status"), "pending");
    assert_eq!(row.get::<String, _>("payment_status"), "pending");

    let items: Vec<LineItem> =
        serde_json::from_value(row.get::<serde_json::Value, _>("items")).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].variant_label, "5kg");
}

#[tokio::test]
#[serial]
async fn create_assigns_server_timestamps() {
    let store = get_test_store().await;

    let stored = store
        .create(&create_test_order(OrderId::generate(chrono::Utc::now())))
        .await
        .unwrap();

    assert_eq!(stored.created_at, stored.updated_at);
    assert!(stored.created_at <= chrono::Utc::now());
}

#[tokio::test]
#[serial]
async fn duplicate_order_id_is_rejected() {
    let store = get_test_store().await;
    let order_id = OrderId::generate(chrono::Utc::now());

    store
        .create(&create_test_order(order_id.clone()))
        .await
        .unwrap();
    let result = store.create(&create_test_order(order_id)).await;

    assert!(matches!(result, Err(OrderStoreError::DuplicateOrderId(_))));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}
