//! Notification relays for placed orders.

pub mod http;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use order_store::{OrderSnapshot, StoredOrder};
use serde::Serialize;

use crate::error::NotificationError;

pub use http::{HttpEmailRelay, HttpRelayConfig};
pub use memory::InMemoryNotificationRelay;

/// A message for a back-office inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Builds the "new order" message carrying the full snapshot.
    pub fn order_placed(recipient: &str, order: &OrderSnapshot, stored: &StoredOrder) -> Self {
        let mut lines = vec![
            format!("Order ID: {}", order.order_id),
            format!("Placed at: {}", stored.created_at.to_rfc3339()),
            format!("Status: {} (payment {})", order.status, order.payment_status),
            String::new(),
            format!("Customer: {}", order.customer_name),
            format!("Phone: {}", order.customer_phone),
            format!("Address: {}", order.delivery_address),
        ];
        if let Some(notes) = order.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            lines.push(format!("Notes: {notes}"));
        }
        lines.push(String::new());
        lines.push("Items:".to_string());
        lines.extend(order.items.iter().map(|item| {
            format!(
                "- {} x {} @ {} = {}",
                item.display_name(),
                item.quantity,
                item.unit_price,
                item.line_total()
            )
        }));
        lines.push(String::new());
        lines.push(format!("Subtotal: {}", order.subtotal));
        lines.push(format!("Shipping: {}", order.shipping_cost));
        lines.push(format!("Total: {}", order.total));
        let body = lines.join("\n");

        Self {
            recipient: recipient.to_string(),
            subject: format!("New order {} from {}", order.order_id, order.customer_name),
            body,
        }
    }
}

/// Delivers notifications. Any error is treated as a soft failure by callers.
#[async_trait]
pub trait NotificationRelay: Send + Sync {
    /// Sends one message.
    async fn send(&self, notification: Notification) -> Result<(), NotificationError>;
}

#[async_trait]
impl<T: NotificationRelay + ?Sized> NotificationRelay for Arc<T> {
    async fn send(&self, notification: Notification) -> Result<(), NotificationError> {
        (**self).send(notification).await
    }
}

/// Relay used when no delivery endpoint is configured. Every send fails with `NotConfigured`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotificationRelay;

#[async_trait]
impl NotificationRelay for DisabledNotificationRelay {
    async fn send(&self, _notification: Notification) -> Result<(), NotificationError> {
        Err(NotificationError::NotConfigured)
    }
}
