use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::{OrderSnapshot, OrderStore, OrderStoreError, Result, StoredOrder};

/// PostgreSQL-backed order store.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and returns a store backed by a fresh pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.order_id))]
    async fn create(&self, order: &OrderSnapshot) -> Result<StoredOrder> {
        let started = std::time::Instant::now();
        let id = Uuid::new_v4();
        let items = serde_json::to_value(&order.items)?;
        let address = &order.delivery_address;

        let row = sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_id, items, subtotal_cents, shipping_cost_cents, total_cents,
                customer_name, customer_phone,
                address_door, address_street, address_district, address_state, address_postal_code,
                notes, status, payment_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(order.order_id.as_str())
        .bind(items)
        .bind(order.subtotal.cents())
        .bind(order.shipping_cost.cents())
        .bind(order.total.cents())
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(&address.door)
        .bind(&address.street)
        .bind(&address.district)
        .bind(&address.state)
        .bind(&address.postal_code)
        .bind(order.notes.as_deref())
        .bind(order.status.as_str())
        .bind(order.payment_status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("unique_order_id")
            {
                return OrderStoreError::DuplicateOrderId(order.order_id.clone());
            }
            OrderStoreError::Database(e)
        })?;

        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

        metrics::histogram!("order_store_write_duration_seconds", "backend" => "postgres")
            .record(started.elapsed().as_secs_f64());

        Ok(StoredOrder {
            reference: id.to_string(),
            created_at,
            updated_at,
        })
    }
}
