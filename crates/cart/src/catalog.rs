//! Read-only product catalog access.

use std::collections::BTreeMap;

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// A purchasable package size of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Package-size label, e.g. `"1L"` or `"500ml"`. Unique within a product.
    pub label: String,
    pub price: Money,
    #[serde(default)]
    pub image: Option<String>,
}

impl Variant {
    /// Creates a variant without an image.
    pub fn new(label: impl Into<String>, price: Money) -> Self {
        Self {
            label: label.into(),
            price,
            image: None,
        }
    }
}

/// A catalog product and its variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Brand and product name as shown to the shopper.
    pub brand: String,
    pub category: String,
    /// Optional promotional tag, e.g. `"Bestseller"`.
    #[serde(default)]
    pub tag: Option<String>,
    pub variants: Vec<Variant>,
}

impl Product {
    /// Looks up a variant by label.
    pub fn variant(&self, label: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.label == label)
    }
}

/// Read-only catalog lookups. The storefront core never writes to the catalog.
pub trait Catalog {
    /// Returns the product with the given id.
    fn product(&self, id: &ProductId) -> Option<Product>;

    /// Returns all products in a category.
    fn products_in_category(&self, category: &str) -> Vec<Product>;
}

/// Catalog held in memory, keyed by product id.
///
/// Category listings come back ordered by product id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: BTreeMap<ProductId, Product>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from a list of products. Later duplicates replace earlier ones.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Self::new();
        for product in products {
            catalog.insert(product);
        }
        catalog
    }

    /// Parses a catalog from a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Self::from_products(products))
    }

    /// Inserts or replaces a product.
    pub fn insert(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    /// Returns the number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn product(&self, id: &ProductId) -> Option<Product> {
        self.products.get(id).cloned()
    }

    fn products_in_category(&self, category: &str) -> Vec<Product> {
        self.products
            .values()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }
}
