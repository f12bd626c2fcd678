//! Shipping charge applied at submission time.

use common::Money;

/// Flat-rate shipping with an optional free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShippingPolicy {
    pub flat_rate: Money,
    /// Subtotals at or above this ship free.
    pub free_over: Option<Money>,
}

impl ShippingPolicy {
    /// Shipping is always free.
    pub fn free() -> Self {
        Self::default()
    }

    /// Charges `flat_rate` on every order.
    pub fn flat(flat_rate: Money) -> Self {
        Self {
            flat_rate,
            free_over: None,
        }
    }

    /// Waives the charge for subtotals at or above `threshold`.
    pub fn with_free_over(mut self, threshold: Money) -> Self {
        self.free_over = Some(threshold);
        self
    }

    /// Shipping cost for an order with this subtotal.
    pub fn cost_for(&self, subtotal: Money) -> Money {
        match self.free_over {
            Some(threshold) if subtotal >= threshold => Money::zero(),
            _ => self.flat_rate,
        }
    }
}
