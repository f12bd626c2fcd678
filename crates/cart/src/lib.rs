//! Shopping cart for the storefront.
//!
//! This crate provides:
//! - The cart engine: line items keyed by identity, quantity merging,
//!   derived totals, and mirroring to a client storage slot
//! - Variant staging for multi-select on a product page
//! - Read-only catalog access used to build line items

pub mod cart;
pub mod catalog;
pub mod error;
pub mod staging;
pub mod storage;

pub use cart::{AddedItem, CART_STORAGE_KEY, Cart, NewLineItem};
pub use catalog::{Catalog, InMemoryCatalog, Product, Variant};
pub use common::{IdentityKey, LineItem, Money, ProductId};
pub use error::{CartError, StagingError, StorageError};
pub use staging::{CommitSummary, StagedEntry, StagedSelection};
pub use storage::{CartStorage, FileStorage, MemoryStorage};
