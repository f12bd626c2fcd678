use serde::{Deserialize, Serialize};

use crate::{IdentityKey, Money, ProductId};

/// One (variant, quantity) entry of a cart or an order.
///
/// Labels and price are copied from the catalog when the item is first
/// selected and are never refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: IdentityKey,
    pub product_id: ProductId,
    pub brand_label: String,
    pub variant_label: String,
    pub unit_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotional_tag: Option<String>,
    pub quantity: u32,
}

impl LineItem {
    /// Returns `unit_price × quantity`.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    /// Human-readable name, e.g. `"Acme Sunflower Oil 1L"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand_label, self.variant_label)
    }
}
