//! Per-client bundle of the three collection stores.
//!
//! A [`ClientContext`] is built explicitly for one client (a browser session
//! in the HTTP service, a storage directory in the CLI) and passed to
//! whatever needs it. The three stores share one storage handle, so `S` is
//! usually a reference or an `Arc`.
//!
//! Until [`ClientContext::hydrate`] runs, every store reads as empty and
//! ignores mutations; consumers never need to check for initialization.

use crate::persistence::KeyValueStore;
use crate::store::{CartStore, RecentlyViewedStore, WishlistStore};

/// Cart, wishlist, and recently-viewed stores for one client.
#[derive(Debug)]
pub struct ClientContext<S> {
    cart: CartStore<S>,
    wishlist: WishlistStore<S>,
    recently_viewed: RecentlyViewedStore<S>,
}

impl<S: KeyValueStore + Clone> ClientContext<S> {
    /// Create un-hydrated stores over `storage`.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            cart: CartStore::new(storage.clone()),
            wishlist: WishlistStore::new(storage.clone()),
            recently_viewed: RecentlyViewedStore::new(storage),
        }
    }

    /// Create the stores and hydrate them from `storage`.
    #[must_use]
    pub fn hydrated(storage: S) -> Self {
        let mut context = Self::new(storage);
        context.hydrate();
        context
    }
}

impl<S: KeyValueStore> ClientContext<S> {
    /// Load all three collections. Calling it again does nothing.
    pub fn hydrate(&mut self) {
        self.cart.hydrate();
        self.wishlist.hydrate();
        self.recently_viewed.hydrate();
    }

    /// Whether the stores have been hydrated.
    #[must_use]
    pub const fn is_hydrated(&self) -> bool {
        self.cart.is_hydrated() && self.wishlist.is_hydrated() && self.recently_viewed.is_hydrated()
    }

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    /// The cart, for mutation.
    pub const fn cart_mut(&mut self) -> &mut CartStore<S> {
        &mut self.cart
    }

    /// The wishlist.
    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore<S> {
        &self.wishlist
    }

    /// The wishlist, for mutation.
    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore<S> {
        &mut self.wishlist
    }

    /// The browsing history.
    #[must_use]
    pub const fn recently_viewed(&self) -> &RecentlyViewedStore<S> {
        &self.recently_viewed
    }

    /// The browsing history, for mutation.
    pub const fn recently_viewed_mut(&mut self) -> &mut RecentlyViewedStore<S> {
        &mut self.recently_viewed
    }

    /// The shared storage handle.
    #[must_use]
    pub const fn storage(&self) -> &S {
        self.cart.storage()
    }
}
