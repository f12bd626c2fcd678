//! Shared types for the storefront core.
//!
//! Everything here is plain data: the cart, the order store and the checkout
//! paths all agree on these shapes without depending on each other.

mod line_item;
mod money;
mod types;

pub use line_item::LineItem;
pub use money::{CURRENCY_SYMBOL, Money};
pub use types::{IdentityKey, ProductId};
