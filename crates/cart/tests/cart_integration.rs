//! Integration tests for the cart.
//!
//! These tests drive the catalog → staging → cart flow and check that the
//! cart survives a session restart through file-backed storage.

use cart::{
    CART_STORAGE_KEY, Cart, Catalog, FileStorage, IdentityKey, InMemoryCatalog, MemoryStorage,
    Money, NewLineItem, Product, ProductId, StagedSelection, StagingError, Variant,
};

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_products([
        Product {
            id: ProductId::new("sunflower-oil"),
            brand: "Acme Sunflower Oil".to_string(),
            category: "Oils".to_string(),
            tag: Some("Bestseller".to_string()),
            variants: vec![
                Variant::new("1L", Money::from_cents(18_500)),
                Variant::new("500ml", Money::from_cents(9_800)),
            ],
        },
        Product {
            id: ProductId::new("turmeric"),
            brand: "Acme Turmeric Powder".to_string(),
            category: "Spices".to_string(),
            tag: None,
            variants: vec![Variant::new("100g", Money::from_cents(4_500))],
        },
    ])
}

mod staging_flow {
    use super::*;

    #[test]
    fn toggle_set_quantity_and_commit() {
        let catalog = catalog();
        let product = catalog.product(&ProductId::new("sunflower-oil")).unwrap();
        let mut cart = Cart::load(MemoryStorage::new());

        let mut staged = StagedSelection::new(&product);
        staged.toggle(product.variant("1L").unwrap());
        staged.set_quantity("1L", 3);
        staged.toggle(product.variant("500ml").unwrap());
        staged.commit(&mut cart).unwrap();

        assert!(staged.is_empty());
        let quantities: Vec<(&str, u32)> = cart
            .items()
            .iter()
            .map(|item| (item.variant_label.as_str(), item.quantity))
            .collect();
        assert_eq!(quantities, vec![("1L", 3), ("500ml", 1)]);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.total(), Money::from_cents(3 * 18_500 + 9_800));
    }

    #[test]
    fn empty_commit_leaves_cart_untouched() {
        let catalog = catalog();
        let product = catalog.product(&ProductId::new("turmeric")).unwrap();
        let mut cart = Cart::load(MemoryStorage::new());
        cart.add_item(
            NewLineItem::from_variant(&product, product.variant("100g").unwrap()),
            2,
        )
        .unwrap();
        let before = cart.items().to_vec();

        let mut staged = StagedSelection::new(&product);
        staged.toggle(product.variant("100g").unwrap());
        staged.toggle(product.variant("100g").unwrap());

        assert_eq!(
            staged.commit(&mut cart),
            Err(StagingError::NothingSelected)
        );
        assert_eq!(cart.items(), before.as_slice());
    }

    #[test]
    fn lines_from_different_products_stay_separate() {
        let catalog = catalog();
        let mut cart = Cart::load(MemoryStorage::new());

        for product in catalog
            .products_in_category("Oils")
            .into_iter()
            .chain(catalog.products_in_category("Spices"))
        {
            let mut staged = StagedSelection::new(&product);
            for variant in &product.variants {
                staged.toggle(variant);
            }
            staged.commit(&mut cart).unwrap();
        }

        assert_eq!(cart.items().len(), 3);
        assert_eq!(cart.item_count(), 3);
    }
}

mod persistence {
    use super::*;

    #[test]
    fn cart_survives_session_restart() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog();
        let product = catalog.product(&ProductId::new("sunflower-oil")).unwrap();

        {
            let mut cart = Cart::load(FileStorage::open(dir.path()).unwrap());
            cart.add_item(
                NewLineItem::from_variant(&product, product.variant("1L").unwrap()),
                2,
            )
            .unwrap();
            cart.add_item(
                NewLineItem::from_variant(&product, product.variant("500ml").unwrap()),
                1,
            )
            .unwrap();
        }

        let mut cart = Cart::load(FileStorage::open(dir.path()).unwrap());
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.item_count(), 3);

        // Re-adding after a restart merges into the restored line
        cart.add_item(
            NewLineItem::from_variant(&product, product.variant("1L").unwrap()),
            1,
        )
        .unwrap();
        let id = IdentityKey::for_variant(&product.id, "1L");
        assert_eq!(cart.get(&id).unwrap().quantity, 3);
    }

    #[test]
    fn corrupt_file_starts_empty_and_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        std::fs::write(storage.path_for(CART_STORAGE_KEY), "\u{0}garbage").unwrap();

        let mut cart = Cart::load(storage);
        assert!(cart.is_empty());

        cart.clear();
        let reloaded = Cart::load(FileStorage::open(dir.path()).unwrap());
        assert!(reloaded.is_empty());
        assert_eq!(
            std::fs::read_to_string(cart.storage().path_for(CART_STORAGE_KEY)).unwrap(),
            "[]"
        );
    }
}
