//! Recently viewed products, most recent first.

use std::collections::HashSet;

use emerald_core::{Product, ProductId};

use super::{CollectionPolicy, CollectionStore};
use crate::persistence::RECENTLY_VIEWED_KEY;

/// Maximum number of remembered products.
pub const MAX_RECENTLY_VIEWED: usize = 10;

/// Recently-viewed behaviour: re-viewing moves a product to the front, and
/// the list keeps only the newest [`MAX_RECENTLY_VIEWED`] entries.
#[derive(Debug, Clone, Copy)]
pub struct RecentlyViewedPolicy;

impl CollectionPolicy for RecentlyViewedPolicy {
    type Entry = Product;

    const STORAGE_KEY: &'static str = RECENTLY_VIEWED_KEY;

    fn entry_id(entry: &Product) -> &ProductId {
        &entry.id
    }

    fn add(entries: &mut Vec<Product>, product: &Product) {
        entries.retain(|entry| entry.id != product.id);
        entries.insert(0, product.clone());
        entries.truncate(MAX_RECENTLY_VIEWED);
    }

    fn normalize(entries: &mut Vec<Product>) {
        let mut seen = HashSet::new();
        entries.retain(|entry| seen.insert(entry.id.clone()));
        entries.truncate(MAX_RECENTLY_VIEWED);
    }
}

/// Browsing history.
pub type RecentlyViewedStore<S> = CollectionStore<RecentlyViewedPolicy, S>;
