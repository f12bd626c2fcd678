//! Order submission input and its validation.

use common::{LineItem, Money};
use order_store::DeliveryAddress;

use crate::error::ValidationError;

/// Who the order is for and where it goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub address: DeliveryAddress,
    pub notes: Option<String>,
}

/// Everything needed to place an order.
///
/// `items` usually comes from the cart, but any list carrying prices and
/// quantities works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub items: Vec<LineItem>,
    pub customer: CustomerDetails,
}

impl OrderRequest {
    /// Creates a new order request.
    pub fn new(items: Vec<LineItem>, customer: CustomerDetails) -> Self {
        Self { items, customer }
    }

    /// Sum of line totals. Saturates; [`OrderRequest::validate`] rejects
    /// requests whose exact subtotal does not fit.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Exact subtotal, or the index of the first line at which it overflows.
    fn checked_subtotal(&self) -> Result<Money, ValidationError> {
        self.items
            .iter()
            .enumerate()
            .try_fold(Money::zero(), |running, (index, item)| {
                item.unit_price
                    .checked_multiply(item.quantity)
                    .and_then(|line| running.checked_add(line))
                    .ok_or_else(|| ValidationError::InvalidItem {
                        index,
                        reason: "amount out of range".to_string(),
                    })
            })
    }

    /// Checks the request.
    ///
    /// Blank means empty after trimming whitespace. Every blank required
    /// field is reported, not just the first one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::NoItems);
        }

        let customer = &self.customer;
        let address = &customer.address;
        let required: [(&'static str, &str); 7] = [
            ("customerName", &customer.name),
            ("customerPhone", &customer.phone),
            ("address.door", &address.door),
            ("address.street", &address.street),
            ("address.district", &address.district),
            ("address.state", &address.state),
            ("address.postalCode", &address.postal_code),
        ];
        let fields: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !fields.is_empty() {
            return Err(ValidationError::MissingFields { fields });
        }

        for (index, item) in self.items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(ValidationError::InvalidItem {
                    index,
                    reason: "quantity must be at least 1".to_string(),
                });
            }
            if item.unit_price.is_negative() {
                return Err(ValidationError::InvalidItem {
                    index,
                    reason: "price must not be negative".to_string(),
                });
            }
        }

        self.checked_subtotal()?;

        Ok(())
    }
}
