//! Wishlist store.

use emerald_core::{Product, ProductId};

use super::{CollectionPolicy, CollectionStore};
use crate::persistence::{KeyValueStore, WISHLIST_KEY};

/// Wishlist behaviour: a set of products, adding an existing id is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct WishlistPolicy;

impl CollectionPolicy for WishlistPolicy {
    type Entry = Product;

    const STORAGE_KEY: &'static str = WISHLIST_KEY;

    fn entry_id(entry: &Product) -> &ProductId {
        &entry.id
    }

    fn add(entries: &mut Vec<Product>, product: &Product) {
        if !entries.iter().any(|entry| entry.id == product.id) {
            entries.push(product.clone());
        }
    }
}

/// Saved-for-later products.
pub type WishlistStore<S> = CollectionStore<WishlistPolicy, S>;

impl<S: KeyValueStore> CollectionStore<WishlistPolicy, S> {
    /// Whether `id` is on the wishlist (drives the heart toggle state).
    #[must_use]
    pub fn is_in_wishlist(&self, id: &ProductId) -> bool {
        self.contains(id)
    }

    /// Add `product` if absent, remove it if present.
    ///
    /// Returns `true` when the product is on the wishlist afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.is_in_wishlist(&product.id) {
            self.remove_item(&product.id);
        } else {
            self.add_item(product);
        }
        self.is_in_wishlist(&product.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::{KeyValueStore, MemoryStorage};
    use crate::store::test_support::product;

    #[test]
    fn test_adding_twice_keeps_one_entry() {
        let storage = MemoryStorage::new();
        let mut wishlist = WishlistStore::hydrated(&storage);
        let p2 = product("2", 19_999);

        wishlist.add_item(&p2);
        wishlist.add_item(&p2);

        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.is_in_wishlist(&p2.id));
    }

    #[test]
    fn test_ids_stay_unique_under_mixed_operations() {
        let storage = MemoryStorage::new();
        let mut wishlist = WishlistStore::hydrated(&storage);
        let ids = ["1", "2", "1", "3", "2", "2", "4", "1"];

        for (step, id) in ids.iter().enumerate() {
            if step % 3 == 2 {
                wishlist.remove_item(&ProductId::new(*id));
            } else {
                wishlist.add_item(&product(id, 100));
            }

            let mut seen: Vec<&str> = wishlist.items().iter().map(|p| p.id.as_str()).collect();
            let before = seen.len();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), before, "duplicate after step {step}");
        }
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let storage = MemoryStorage::new();
        let mut wishlist = WishlistStore::hydrated(&storage);
        let p = product("5", 3999);

        assert!(wishlist.toggle(&p));
        assert!(wishlist.is_in_wishlist(&p.id));
        assert!(!wishlist.toggle(&p));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_stores_full_product_snapshot() {
        let storage = MemoryStorage::new();
        let mut wishlist = WishlistStore::hydrated(&storage);
        let p = product("6", 2999);
        wishlist.add_item(&p);

        let reloaded = WishlistStore::hydrated(&storage);
        assert_eq!(reloaded.items(), std::slice::from_ref(&p));
    }

    #[test]
    fn test_unhydrated_wishlist_reports_nothing() {
        let storage = MemoryStorage::new();
        WishlistStore::hydrated(&storage).add_item(&product("1", 100));

        let wishlist = WishlistStore::new(&storage);
        assert!(!wishlist.is_in_wishlist(&ProductId::new("1")));
    }

    #[test]
    fn test_toggle_after_loading_duplicates_removes_the_product() {
        let storage = MemoryStorage::new();
        let p = product("3", 12_999);
        storage
            .set(
                WISHLIST_KEY,
                &serde_json::to_string(&[p.clone(), p.clone()]).unwrap(),
            )
            .unwrap();
        let mut wishlist = WishlistStore::hydrated(&storage);
        assert_eq!(wishlist.len(), 1);

        assert!(!wishlist.toggle(&p));
        assert!(wishlist.is_empty());
    }
}
