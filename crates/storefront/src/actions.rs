//! Shopper actions: a store operation plus its notification.
//!
//! | action | store call | title |
//! |--------|------------|-------|
//! | [`add_to_cart`] | `add_quantity` | "Added to cart" |
//! | [`remove_from_cart`] | `remove_item` | "Removed from cart" |
//! | [`clear_cart`] | `clear` | "Cart cleared" |
//! | [`toggle_wishlist`] | add or remove | "Added to wishlist" / "Removed from wishlist" |
//! | [`remove_from_wishlist`] | `remove_item` | "Removed from wishlist" |
//! | [`clear_wishlist`] | `clear` | "Wishlist cleared" |
//! | [`view_product`] | recently viewed `add_item` | none |
//! | [`remove_recently_viewed`] | `remove_item` | "Removed" |
//! | [`clear_recently_viewed`] | `clear` | "Cleared" |

use emerald_core::{Product, ProductId};

use crate::notify::{Notification, Notifier};
use crate::persistence::KeyValueStore;
use crate::store::{CartStore, RecentlyViewedStore, WishlistStore};

/// Add `quantity` units of `product` (at least one).
pub fn add_to_cart<S, N>(cart: &mut CartStore<S>, product: &Product, quantity: u32, notifier: &N)
where
    S: KeyValueStore,
    N: Notifier + ?Sized,
{
    let quantity = quantity.max(1);
    cart.add_quantity(product, quantity);

    let description = if quantity == 1 {
        format!("{} has been added to your cart", product.name)
    } else {
        format!("{quantity} items added to your cart")
    };
    notifier.notify(Notification::new("Added to cart", description));
}

/// Drop the cart line for `id`.
pub fn remove_from_cart<S, N>(cart: &mut CartStore<S>, id: &ProductId, notifier: &N)
where
    S: KeyValueStore,
    N: Notifier + ?Sized,
{
    cart.remove_item(id);
    notifier.notify(Notification::new(
        "Removed from cart",
        "The item has been removed from your cart",
    ));
}

/// Empty the cart.
pub fn clear_cart<S, N>(cart: &mut CartStore<S>, notifier: &N)
where
    S: KeyValueStore,
    N: Notifier + ?Sized,
{
    cart.clear();
    notifier.notify(Notification::new(
        "Cart cleared",
        "All items have been removed from your cart",
    ));
}

/// Flip wishlist membership of `product`. Returns whether it is now on the wishlist.
pub fn toggle_wishlist<S, N>(wishlist: &mut WishlistStore<S>, product: &Product, notifier: &N) -> bool
where
    S: KeyValueStore,
    N: Notifier + ?Sized,
{
    let added = wishlist.toggle(product);
    let notification = if added {
        Notification::new(
            "Added to wishlist",
            "This item has been added to your wishlist",
        )
    } else {
        Notification::new(
            "Removed from wishlist",
            "This item has been removed from your wishlist",
        )
    };
    notifier.notify(notification);
    added
}

/// Drop `id` from the wishlist.
pub fn remove_from_wishlist<S, N>(wishlist: &mut WishlistStore<S>, id: &ProductId, notifier: &N)
where
    S: KeyValueStore,
    N: Notifier + ?Sized,
{
    wishlist.remove_item(id);
    notifier.notify(Notification::new(
        "Removed from wishlist",
        "The item has been removed from your wishlist",
    ));
}

/// Empty the wishlist.
pub fn clear_wishlist<S, N>(wishlist: &mut WishlistStore<S>, notifier: &N)
where
    S: KeyValueStore,
    N: Notifier + ?Sized,
{
    wishlist.clear();
    notifier.notify(Notification::new(
        "Wishlist cleared",
        "All items have been removed from your wishlist",
    ));
}

/// Record a product page view. Silent.
pub fn view_product<S: KeyValueStore>(recent: &mut RecentlyViewedStore<S>, product: &Product) {
    recent.add_item(product);
}

/// Forget one viewed product.
pub fn remove_recently_viewed<S, N>(recent: &mut RecentlyViewedStore<S>, id: &ProductId, notifier: &N)
where
    S: KeyValueStore,
    N: Notifier + ?Sized,
{
    recent.remove_item(id);
    notifier.notify(Notification::new(
        "Removed",
        "Item removed from recently viewed",
    ));
}

/// Forget the whole browsing history.
pub fn clear_recently_viewed<S, N>(recent: &mut RecentlyViewedStore<S>, notifier: &N)
where
    S: KeyValueStore,
    N: Notifier + ?Sized,
{
    recent.clear();
    notifier.notify(Notification::new(
        "Cleared",
        "All items have been cleared from recently viewed",
    ));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::ToastQueue;
    use crate::persistence::MemoryStorage;
    use crate::store::test_support::product;

    #[test]
    fn test_add_single_item_names_the_product() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrated(&storage);
        let toasts = ToastQueue::new();
        let lamp = product("1", 4999);

        add_to_cart(&mut cart, &lamp, 1, &toasts);

        let sent = toasts.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Added to cart");
        assert_eq!(sent[0].description, "Product 1 has been added to your cart");
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_add_several_items_counts_them() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrated(&storage);
        let toasts = ToastQueue::new();

        add_to_cart(&mut cart, &product("2", 100), 3, &toasts);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(toasts.take()[0].description, "3 items added to your cart");
    }

    #[test]
    fn test_add_huge_quantity_is_one_line() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrated(&storage);
        let toasts = ToastQueue::new();

        add_to_cart(&mut cart, &product("1", 4999), 1_000_000, &toasts);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 1_000_000);
        assert_eq!(toasts.take()[0].description, "1000000 items added to your cart");
    }

    #[test]
    fn test_add_zero_adds_one() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrated(&storage);

        add_to_cart(&mut cart, &product("2", 100), 0, &ToastQueue::new());

        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_toggle_wishlist_titles() {
        let storage = MemoryStorage::new();
        let mut wishlist = WishlistStore::hydrated(&storage);
        let toasts = ToastQueue::new();
        let p = product("5", 3999);

        assert!(toggle_wishlist(&mut wishlist, &p, &toasts));
        assert!(!toggle_wishlist(&mut wishlist, &p, &toasts));

        let titles: Vec<String> = toasts.take().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, ["Added to wishlist", "Removed from wishlist"]);
    }

    #[test]
    fn test_view_product_is_silent() {
        let storage = MemoryStorage::new();
        let mut recent = RecentlyViewedStore::hydrated(&storage);

        view_product(&mut recent, &product("7", 8999));

        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn test_clear_actions_empty_their_store() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrated(&storage);
        let mut wishlist = WishlistStore::hydrated(&storage);
        let mut recent = RecentlyViewedStore::hydrated(&storage);
        let toasts = ToastQueue::new();
        let p = product("1", 100);
        cart.add_item(&p);
        wishlist.add_item(&p);
        recent.add_item(&p);

        clear_cart(&mut cart, &toasts);
        clear_wishlist(&mut wishlist, &toasts);
        clear_recently_viewed(&mut recent, &toasts);

        assert!(cart.is_empty() && wishlist.is_empty() && recent.is_empty());
        let titles: Vec<String> = toasts.take().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, ["Cart cleared", "Wishlist cleared", "Cleared"]);
    }

    #[test]
    fn test_remove_unknown_id_still_notifies() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrated(&storage);
        let toasts = ToastQueue::new();
        cart.add_item(&product("1", 100));

        remove_from_cart(&mut cart, &ProductId::new("9"), &toasts);

        assert_eq!(cart.len(), 1);
        assert_eq!(toasts.take()[0].title, "Removed from cart");
    }
}
