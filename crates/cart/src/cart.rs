//! The cart engine.

use std::collections::HashSet;

use common::{IdentityKey, LineItem, Money, ProductId};

use crate::catalog::{Product, Variant};
use crate::error::CartError;
use crate::storage::CartStorage;

/// Storage key the cart is mirrored under.
pub const CART_STORAGE_KEY: &str = "storefront.cart";

/// A line item about to be added, before it has a quantity.
///
/// Carries its identity key precomputed; labels and price are frozen here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub id: IdentityKey,
    pub product_id: ProductId,
    pub brand_label: String,
    pub variant_label: String,
    pub unit_price: Money,
    pub image_ref: Option<String>,
    pub promotional_tag: Option<String>,
}

impl NewLineItem {
    /// Builds the line for one variant of a catalog product.
    pub fn from_variant(product: &Product, variant: &Variant) -> Self {
        Self {
            id: IdentityKey::for_variant(&product.id, &variant.label),
            product_id: product.id.clone(),
            brand_label: product.brand.clone(),
            variant_label: variant.label.clone(),
            unit_price: variant.price,
            image_ref: variant.image.clone(),
            promotional_tag: product.tag.clone(),
        }
    }

    fn with_quantity(self, quantity: u32) -> LineItem {
        LineItem {
            id: self.id,
            product_id: self.product_id,
            brand_label: self.brand_label,
            variant_label: self.variant_label,
            unit_price: self.unit_price,
            image_ref: self.image_ref,
            promotional_tag: self.promotional_tag,
            quantity,
        }
    }
}

/// Feedback for a successful add.
///
/// `sequence` strictly increases with every add in a session, so two adds of
/// the same quantity are still distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedItem {
    pub sequence: u64,
    pub quantity: u32,
}

/// The shopper's cart.
///
/// Owns its line items (at most one per identity key, each with quantity of
/// at least 1) and mirrors them to a single storage slot after every change.
/// The in-memory copy is authoritative for the session.
#[derive(Debug)]
pub struct Cart<S: CartStorage> {
    items: Vec<LineItem>,
    storage: S,
    sequence: u64,
    last_added: Option<AddedItem>,
}

impl<S: CartStorage> Cart<S> {
    /// Loads the cart from `storage`.
    ///
    /// A missing, unreadable or malformed slot gives an empty cart; the
    /// problem is logged and never returned.
    pub fn load(storage: S) -> Self {
        let items = restore(&storage);
        Self {
            items,
            storage,
            sequence: 0,
            last_added: None,
        }
    }

    /// Adds `quantity` units of `item`.
    ///
    /// If the key is already in the cart only its quantity grows; the stored
    /// price and labels are kept as first added.
    pub fn add_item(&mut self, item: NewLineItem, quantity: u32) -> Result<AddedItem, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }
        if item.unit_price.is_negative() {
            return Err(CartError::InvalidPrice {
                price: item.unit_price.cents(),
            });
        }

        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(quantity);
            }
            None => self.items.push(item.with_quantity(quantity)),
        }

        self.sequence += 1;
        let added = AddedItem {
            sequence: self.sequence,
            quantity,
        };
        self.last_added = Some(added);

        metrics::counter!("cart_items_added_total").increment(u64::from(quantity));
        self.persist();
        Ok(added)
    }

    /// Removes the line with key `id`. Absent keys are ignored.
    pub fn remove_item(&mut self, id: &IdentityKey) {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        if self.items.len() != before {
            self.persist();
        }
    }

    /// Sets the quantity of line `id`; zero or less removes it.
    pub fn update_quantity(&mut self, id: &IdentityKey, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
            item.quantity = quantity;
            self.persist();
        }
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Line items in the order they were first added.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the line with key `id`.
    pub fn get(&self, id: &IdentityKey) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities over all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `unit_price × quantity` over all lines, saturating at the `Money` bounds.
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// The most recent successful add, if any.
    pub fn last_added(&self) -> Option<AddedItem> {
        self.last_added
    }

    /// Borrows the backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Gives the storage back, e.g. to start a new session from it.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.items) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize cart");
                metrics::counter!("cart_storage_write_failures_total").increment(1);
                return;
            }
        };

        if let Err(e) = self.storage.write(CART_STORAGE_KEY, &payload) {
            tracing::warn!(error = %e, "failed to persist cart; keeping in-memory copy");
            metrics::counter!("cart_storage_write_failures_total").increment(1);
        }
    }
}

fn restore<S: CartStorage>(storage: &S) -> Vec<LineItem> {
    let raw = match storage.read(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "cart storage unreadable; starting empty");
            metrics::counter!("cart_storage_discarded_total").increment(1);
            return Vec::new();
        }
    };

    let items: Vec<LineItem> = match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "stored cart did not parse; starting empty");
            metrics::counter!("cart_storage_discarded_total").increment(1);
            return Vec::new();
        }
    };

    if !is_consistent(&items) {
        tracing::warn!("stored cart breaks line item invariants; starting empty");
        metrics::counter!("cart_storage_discarded_total").increment(1);
        return Vec::new();
    }

    items
}

fn is_consistent(items: &[LineItem]) -> bool {
    let mut seen = HashSet::new();
    items
        .iter()
        .all(|item| item.quantity > 0 && !item.unit_price.is_negative() && seen.insert(&item.id))
}
