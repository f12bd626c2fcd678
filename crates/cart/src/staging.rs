//! Variant staging on a product page.
//!
//! The shopper picks several package sizes of one product, adjusts each
//! quantity, then commits them to the cart in one step.

use common::Money;

use crate::cart::{AddedItem, Cart, NewLineItem};
use crate::catalog::{Product, Variant};
use crate::error::{CartError, StagingError};
use crate::storage::CartStorage;

/// One staged variant with its working quantity (always at least 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEntry {
    pub variant: Variant,
    pub quantity: u32,
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitSummary {
    /// Number of staged variants added.
    pub lines: usize,
    /// Units added across all lines.
    pub quantity: u64,
    /// Feedback from the final `add_item` call.
    pub last_added: AddedItem,
}

/// Working set of variants for one product page visit. Never persisted.
#[derive(Debug, Clone)]
pub struct StagedSelection {
    product: Product,
    entries: Vec<StagedEntry>,
}

impl StagedSelection {
    /// Starts an empty selection for `product`.
    pub fn new(product: &Product) -> Self {
        Self {
            product: product.clone(),
            entries: Vec::new(),
        }
    }

    /// The product being staged.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Stages `variant` with quantity 1, or unstages it if already staged.
    ///
    /// Returns whether the variant is staged afterwards.
    pub fn toggle(&mut self, variant: &Variant) -> bool {
        if let Some(pos) = self.position(&variant.label) {
            self.entries.remove(pos);
            false
        } else {
            self.entries.push(StagedEntry {
                variant: variant.clone(),
                quantity: 1,
            });
            true
        }
    }

    /// Sets the staged quantity of `label`. Values below 1 and unstaged labels are ignored.
    pub fn set_quantity(&mut self, label: &str, quantity: i64) {
        if quantity < 1 {
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(entry) = self.entries.iter_mut().find(|e| e.variant.label == label) {
            entry.quantity = quantity;
        }
    }

    /// Unstages `label`. Returns true if it was staged.
    pub fn remove(&mut self, label: &str) -> bool {
        match self.position(label) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drops every staged entry, e.g. when the shopper leaves the page.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Staged entries in the order they were toggled on.
    pub fn entries(&self) -> &[StagedEntry] {
        &self.entries
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    /// Staged quantity for `label`, if staged.
    pub fn quantity_of(&self, label: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.variant.label == label)
            .map(|e| e.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sum of staged quantities.
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Sum of `price × quantity` over staged entries, saturating at the `Money` bounds.
    pub fn total_price(&self) -> Money {
        self.entries
            .iter()
            .map(|e| e.variant.price.multiply(e.quantity))
            .sum()
    }

    /// Adds every staged entry to `cart` with its quantity, then clears the selection.
    ///
    /// An empty selection is rejected with `NothingSelected` and leaves the
    /// cart untouched. Entries are checked before the first add, so a
    /// rejected commit never leaves a partial set of lines in the cart.
    pub fn commit<S: CartStorage>(
        &mut self,
        cart: &mut Cart<S>,
    ) -> Result<CommitSummary, StagingError> {
        if self.entries.is_empty() {
            return Err(StagingError::NothingSelected);
        }

        if let Some(entry) = self.entries.iter().find(|e| e.variant.price.is_negative()) {
            return Err(CartError::InvalidPrice {
                price: entry.variant.price.cents(),
            }
            .into());
        }

        let lines = self.entries.len();
        let quantity = self.total_quantity();
        let mut last_added = None;
        for entry in self.entries.drain(..) {
            let item = NewLineItem::from_variant(&self.product, &entry.variant);
            last_added = Some(cart.add_item(item, entry.quantity)?);
        }

        tracing::debug!(product_id = %self.product.id, lines, quantity, "staged selection committed");

        let last_added = last_added.ok_or(StagingError::NothingSelected)?;
        Ok(CommitSummary {
            lines,
            quantity,
            last_added,
        })
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.variant.label == label)
    }
}
