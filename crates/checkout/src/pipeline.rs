//! Order submission pipeline.

use chrono::{DateTime, Utc};
use common::Money;
use order_store::{
    DeliveryAddress, OrderId, OrderSnapshot, OrderStatus, OrderStore, PaymentStatus, StoredOrder,
};

use crate::error::{SubmissionError, ValidationError};
use crate::relay::{Notification, NotificationRelay};
use crate::request::OrderRequest;
use crate::shipping::ShippingPolicy;

/// Settings for the pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Inbox that receives "new order" notifications.
    pub notify_recipient: String,
    pub shipping: ShippingPolicy,
}

/// Outcome of a placed order.
///
/// The order is placed regardless of `notified`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub order_id: OrderId,
    pub notified: bool,
    pub total: Money,
    pub created_at: DateTime<Utc>,
}

/// Places orders: validate, assign an id, persist, then notify.
///
/// Persisting is the only step that decides success. It finishes before the
/// notification is attempted, and a failed notification only turns
/// `notified` to false. Neither step is retried.
pub struct OrderPipeline<O: OrderStore, N: NotificationRelay> {
    store: O,
    relay: N,
    config: PipelineConfig,
}

impl<O: OrderStore, N: NotificationRelay> OrderPipeline<O, N> {
    /// Creates a new pipeline.
    pub fn new(store: O, relay: N, config: PipelineConfig) -> Self {
        Self {
            store,
            relay,
            config,
        }
    }

    /// Submits an order.
    #[tracing::instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn submit(&self, request: OrderRequest) -> Result<SubmissionReceipt, SubmissionError> {
        let started = std::time::Instant::now();

        // 1. Validate and price
        let totals = match request.validate().and_then(|()| self.price(&request)) {
            Ok(totals) => totals,
            Err(e) => {
                metrics::counter!("order_submissions_rejected_total").increment(1);
                tracing::info!(error = %e, "order request rejected");
                return Err(e.into());
            }
        };

        // 2. Assign id and build the snapshot
        let order_id = OrderId::generate(Utc::now());
        let snapshot = build_snapshot(order_id, request, totals);

        // 3. Persist
        let stored = match self.store.create(&snapshot).await {
            Ok(stored) => stored,
            Err(e) => {
                metrics::counter!("order_persist_failures_total").increment(1);
                tracing::error!(order_id = %snapshot.order_id, error = %e, "failed to persist order");
                return Err(SubmissionError::Persistence(e));
            }
        };
        metrics::counter!("orders_submitted_total").increment(1);

        // 4. Notify
        let notified = self.notify(&snapshot, &stored).await;

        metrics::histogram!("order_submission_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        tracing::info!(
            order_id = %snapshot.order_id,
            reference = %stored.reference,
            notified,
            "order placed"
        );

        Ok(SubmissionReceipt {
            order_id: snapshot.order_id,
            notified,
            total: snapshot.total,
            created_at: stored.created_at,
        })
    }

    fn price(&self, request: &OrderRequest) -> Result<Totals, ValidationError> {
        let subtotal = request.subtotal();
        let shipping_cost = self.config.shipping.cost_for(subtotal);
        let total = subtotal
            .checked_add(shipping_cost)
            .ok_or(ValidationError::TotalOutOfRange)?;

        Ok(Totals {
            subtotal,
            shipping_cost,
            total,
        })
    }

    async fn notify(&self, snapshot: &OrderSnapshot, stored: &StoredOrder) -> bool {
        let message = Notification::order_placed(&self.config.notify_recipient, snapshot, stored);

        match self.relay.send(message).await {
            Ok(()) => true,
            Err(e) => {
                metrics::counter!("order_notifications_failed_total").increment(1);
                tracing::warn!(
                    order_id = %snapshot.order_id,
                    error = %e,
                    "order notification failed; order remains placed"
                );
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Totals {
    subtotal: Money,
    shipping_cost: Money,
    total: Money,
}

fn build_snapshot(order_id: OrderId, request: OrderRequest, totals: Totals) -> OrderSnapshot {
    let customer = request.customer;
    let address = customer.address;

    OrderSnapshot {
        order_id,
        items: request.items,
        subtotal: totals.subtotal,
        shipping_cost: totals.shipping_cost,
        total: totals.total,
        customer_name: customer.name.trim().to_string(),
        customer_phone: customer.phone.trim().to_string(),
        delivery_address: DeliveryAddress {
            door: address.door.trim().to_string(),
            street: address.street.trim().to_string(),
            district: address.district.trim().to_string(),
            state: address.state.trim().to_string(),
            postal_code: address.postal_code.trim().to_string(),
        },
        notes: customer
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
    }
}
