//! Client-side collection stores: cart, wishlist, and recently viewed.
//!
//! All three share [`CollectionStore`]; a [`CollectionPolicy`] decides the
//! entry type, the storage key, and what "add" means:
//!
//! | store | entry | add |
//! |-------|-------|-----|
//! | [`CartStore`] | [`CartLine`] | existing line: quantity + 1, else append |
//! | [`WishlistStore`] | `Product` | existing id: no-op, else append |
//! | [`RecentlyViewedStore`] | `Product` | move/insert at front, keep 10 |
//!
//! A store starts un-hydrated: reads see an empty collection and mutations
//! are ignored until [`CollectionStore::hydrate`] has pulled the persisted
//! state in. Loaded entries pass through [`CollectionPolicy::normalize`] so
//! a stale or hand-edited value cannot break the per-collection rules.
//! After hydration every mutation is written through the
//! [`PersistenceBridge`]. A failed write is logged and otherwise absorbed;
//! store operations have no error path.

pub mod cart;
pub mod recently_viewed;
pub mod wishlist;

pub use cart::{CartLine, CartPolicy, CartStore};
pub use recently_viewed::{MAX_RECENTLY_VIEWED, RecentlyViewedPolicy, RecentlyViewedStore};
pub use wishlist::{WishlistPolicy, WishlistStore};

use std::collections::HashSet;
use std::fmt::Debug;
use std::marker::PhantomData;

use emerald_core::{Product, ProductId};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::persistence::{KeyValueStore, PersistenceBridge};

/// Per-collection behaviour plugged into [`CollectionStore`].
pub trait CollectionPolicy {
    /// Stored entry type.
    type Entry: Clone + Debug + PartialEq + Serialize + DeserializeOwned;

    /// Durable storage key.
    const STORAGE_KEY: &'static str;

    /// Product id of an entry; entries are unique by this id.
    fn entry_id(entry: &Self::Entry) -> &ProductId;

    /// Apply an add of `product` to `entries`.
    fn add(entries: &mut Vec<Self::Entry>, product: &Product);

    /// Restore the collection invariants on freshly loaded entries.
    ///
    /// Stored state can be stale or hand-edited. The default keeps the first
    /// entry for each product id.
    fn normalize(entries: &mut Vec<Self::Entry>) {
        let mut seen = HashSet::new();
        entries.retain(|entry| seen.insert(Self::entry_id(entry).clone()));
    }
}

/// An ordered collection of entries keyed by product id, mirrored to storage.
#[derive(Debug)]
pub struct CollectionStore<P: CollectionPolicy, S> {
    bridge: PersistenceBridge<S>,
    entries: Vec<P::Entry>,
    hydrated: bool,
    _policy: PhantomData<P>,
}

impl<P: CollectionPolicy, S: KeyValueStore> CollectionStore<P, S> {
    /// Create an un-hydrated store over `storage`.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self {
            bridge: PersistenceBridge::new(storage, P::STORAGE_KEY),
            entries: Vec::new(),
            hydrated: false,
            _policy: PhantomData,
        }
    }

    /// Create a store and hydrate it immediately.
    #[must_use]
    pub fn hydrated(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.hydrate();
        store
    }

    /// Load the persisted collection. Subsequent calls are no-ops.
    pub fn hydrate(&mut self) {
        if self.hydrated {
            return;
        }
        let mut entries = self.bridge.load();
        let loaded = entries.len();
        P::normalize(&mut entries);
        if entries.len() != loaded {
            tracing::warn!(
                key = P::STORAGE_KEY,
                dropped = loaded - entries.len(),
                "Dropped invalid stored entries"
            );
        }
        self.entries = entries;
        self.hydrated = true;
        tracing::debug!(
            key = P::STORAGE_KEY,
            entries = self.entries.len(),
            "Collection hydrated"
        );
    }

    /// Whether [`hydrate`](Self::hydrate) has run.
    #[must_use]
    pub const fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Current entries, in collection order.
    #[must_use]
    pub fn items(&self) -> &[P::Entry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.entries.iter().any(|entry| P::entry_id(entry) == id)
    }

    /// The entry with `id`, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&P::Entry> {
        self.entries.iter().find(|entry| P::entry_id(entry) == id)
    }

    /// Add `product` according to the collection's policy.
    pub fn add_item(&mut self, product: &Product) {
        self.mutate(|entries| P::add(entries, product));
    }

    /// Remove the entry with `id`. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: &ProductId) {
        self.mutate(|entries| entries.retain(|entry| P::entry_id(entry) != id));
    }

    /// Remove every entry and persist the empty collection.
    pub fn clear(&mut self) {
        self.mutate(Vec::clear);
    }

    /// The underlying storage handle.
    #[must_use]
    pub const fn storage(&self) -> &S {
        self.bridge.storage()
    }

    /// Run `f` over the entries and persist the result.
    ///
    /// Ignored before hydration so the empty initial state never overwrites
    /// what is stored.
    fn mutate(&mut self, f: impl FnOnce(&mut Vec<P::Entry>)) {
        if !self.hydrated {
            tracing::debug!(key = P::STORAGE_KEY, "Ignoring mutation before hydration");
            return;
        }
        f(&mut self.entries);
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.bridge.save(&self.entries) {
            tracing::warn!(
                key = P::STORAGE_KEY,
                error = %e,
                "Failed to persist collection"
            );
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use emerald_core::{Price, Product, ProductId};

    /// A product with a predictable name and price.
    pub fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: format!("Description of product {id}"),
            price: Price::from_cents(cents),
            category: "Test".to_owned(),
            image: format!("/images/{id}.svg"),
        }
    }
}
