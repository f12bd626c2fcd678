//! Checkout error types.

use order_store::OrderStoreError;
use thiserror::Error;

/// Caller-fixable problems with an order request. Nothing has been written.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The item list is empty.
    #[error("Order has no items")]
    NoItems,

    /// Required fields are empty or blank, by wire name.
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },

    /// A line item is unusable.
    #[error("Invalid item at position {index}: {reason}")]
    InvalidItem { index: usize, reason: String },

    /// Subtotal plus shipping does not fit in an amount.
    #[error("Order total is out of range")]
    TotalOutOfRange,
}

impl ValidationError {
    /// Wire names of the offending fields, if any.
    pub fn fields(&self) -> &[&'static str] {
        match self {
            ValidationError::MissingFields { fields } => fields,
            _ => &[],
        }
    }
}

/// Reasons an order submission failed. If this is returned, no order was placed.
///
/// Notification failures never show up here.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The request was rejected before anything was written.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The order store did not accept the order.
    #[error("Could not place order: {0}")]
    Persistence(#[from] OrderStoreError),
}

/// Errors from a notification relay. Always soft.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// No relay is configured.
    #[error("Notification relay not configured")]
    NotConfigured,

    /// The relay rejected the message.
    #[error("Notification rejected: {0}")]
    Rejected(String),

    /// An HTTP transport or serialization error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors from the manual order channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ManualChannelError {
    /// The item list is empty.
    #[error("Order has no items")]
    NoItems,
}
