//! Client stores over durable storage.
//!
//! Each "page load" below builds a new `ClientContext` over the same
//! directory, the way a browser rebuilds its stores from `localStorage`.

#![allow(clippy::unwrap_used)]

use std::fs;

use emerald_core::ProductId;
use emerald_storefront::actions;
use emerald_storefront::catalog::Catalog;
use emerald_storefront::context::ClientContext;
use emerald_storefront::notify::ToastQueue;
use emerald_storefront::persistence::{CART_KEY, FileStorage, KeyValueStore, WISHLIST_KEY};
use emerald_storefront::pricing::{CartTotals, PromoPolicy};
use emerald_storefront::store::MAX_RECENTLY_VIEWED;

fn page_load(storage: &FileStorage) -> ClientContext<&FileStorage> {
    ClientContext::hydrated(storage)
}

#[test]
fn test_cart_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    let catalog = Catalog::builtin();
    let toasts = ToastQueue::new();

    {
        let mut context = page_load(&storage);
        let lamp = catalog.get(&ProductId::new("1")).unwrap();
        actions::add_to_cart(context.cart_mut(), lamp, 1, &toasts);
        actions::add_to_cart(context.cart_mut(), lamp, 1, &toasts);
    }

    let context = page_load(&storage);
    assert_eq!(context.cart().len(), 1);
    assert_eq!(context.cart().item_count(), 2);
    assert_eq!(toasts.take().len(), 2);
}

#[test]
fn test_collections_use_separate_keys() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    let catalog = Catalog::builtin();
    let toasts = ToastQueue::new();

    let mut context = page_load(&storage);
    let watch = catalog.get(&ProductId::new("4")).unwrap();
    actions::toggle_wishlist(context.wishlist_mut(), watch, &toasts);

    assert!(storage.get(WISHLIST_KEY).unwrap().is_some());
    assert!(storage.get(CART_KEY).unwrap().is_none());
    assert!(dir.path().join("wishlist.json").exists());
}

#[test]
fn test_corrupt_file_loads_as_empty_and_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cart.json"), "{not json").unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();

    let context = page_load(&storage);
    assert!(context.cart().is_empty());
    assert!(storage.get(CART_KEY).unwrap().is_none());
}

#[test]
fn test_recently_viewed_keeps_newest_entries_across_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    let catalog = Catalog::builtin();

    // Two passes over the eight products, one page load per view
    for product in catalog.all().iter().chain(catalog.all()) {
        let mut context = page_load(&storage);
        actions::view_product(context.recently_viewed_mut(), product);
    }

    let context = page_load(&storage);
    let items = context.recently_viewed().items();
    assert_eq!(items.len(), catalog.len().min(MAX_RECENTLY_VIEWED));
    assert_eq!(items[0].id, catalog.all()[catalog.len() - 1].id);
}

#[test]
fn test_totals_follow_persisted_cart() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    let catalog = Catalog::builtin();
    let toasts = ToastQueue::new();
    let promo = PromoPolicy::default();

    {
        let mut context = page_load(&storage);
        for id in ["1", "3"] {
            let product = catalog.get(&ProductId::new(id)).unwrap();
            actions::add_to_cart(context.cart_mut(), product, 1, &toasts);
        }
    }

    let context = page_load(&storage);
    let cart = context.cart();
    let discount = promo.discount_for("Discount20", cart.subtotal());
    let totals = CartTotals::compute(cart.items(), discount);

    assert_eq!(totals.subtotal, cart.subtotal());
    assert!(totals.free_shipping());
    assert_eq!(totals.total, totals.subtotal - totals.discount);
}
