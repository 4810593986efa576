//! Persistence bridge between collection stores and durable key-value storage.
//!
//! Storage backends implement [`KeyValueStore`]: string keys to string values,
//! the same shape as browser `localStorage`. The [`PersistenceBridge`] sits on
//! top and handles (de)serialization of whole collections:
//!
//! - an absent key loads as the empty collection
//! - a value that does not parse is logged, removed, and loads as empty
//! - `save` overwrites the key with the full JSON array
//!
//! # Backends
//!
//! - [`MemoryStorage`] - in-process map
//! - [`FileStorage`] - one JSON file per key in a directory
//! - [`SessionStorage`] - request-scoped snapshot of a `tower-sessions` session

mod file;
mod memory;
mod session;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use session::SessionStorage;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage key of the cart collection.
pub const CART_KEY: &str = "cart";

/// Storage key of the wishlist collection.
pub const WISHLIST_KEY: &str = "wishlist";

/// Storage key of the recently-viewed collection.
pub const RECENTLY_VIEWED_KEY: &str = "recentlyViewed";

/// All collection keys, in the order stores are created.
pub const COLLECTION_KEYS: [&str; 3] = [CART_KEY, WISHLIST_KEY, RECENTLY_VIEWED_KEY];

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key cannot be mapped onto the backend (e.g. path separators for files).
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A durable string key-value store.
///
/// Methods take `&self`; implementations use interior mutability so one
/// handle can be shared by the three stores of a client.
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Succeeds when the key is already absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Loads and saves whole collections under a fixed key.
#[derive(Debug, Clone)]
pub struct PersistenceBridge<S> {
    storage: S,
    key: &'static str,
}

impl<S: KeyValueStore> PersistenceBridge<S> {
    /// Create a bridge for one collection key.
    #[must_use]
    pub const fn new(storage: S, key: &'static str) -> Self {
        Self { storage, key }
    }

    /// The storage key this bridge reads and writes.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// The underlying storage handle.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the collection.
    ///
    /// Never fails: absent data is the empty collection, and corrupt data is
    /// discarded from storage before returning the empty collection.
    pub fn load<T: DeserializeOwned>(&self) -> Vec<T> {
        let raw = match self.storage.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "Failed to read stored collection");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(
                    key = self.key,
                    error = %e,
                    "Discarding unparseable stored collection"
                );
                if let Err(e) = self.storage.remove(self.key) {
                    tracing::warn!(key = self.key, error = %e, "Failed to remove corrupt entry");
                }
                Vec::new()
            }
        }
    }

    /// Overwrite the stored collection with `items`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the backend write fails.
    pub fn save<T: Serialize>(&self, items: &[T]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.storage.set(self.key, &raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use emerald_core::{Price, Product, ProductId};

    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::from_cents(1000),
            category: "Test".to_owned(),
            image: "/placeholder.svg".to_owned(),
        }
    }

    #[test]
    fn test_load_absent_key_is_empty() {
        let storage = MemoryStorage::new();
        let bridge = PersistenceBridge::new(&storage, WISHLIST_KEY);
        let items: Vec<Product> = bridge.load();
        assert!(items.is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order_and_content() {
        let storage = MemoryStorage::new();
        let bridge = PersistenceBridge::new(&storage, WISHLIST_KEY);
        let items = vec![product("3"), product("1"), product("2")];

        bridge.save(&items).unwrap();
        let loaded: Vec<Product> = bridge.load();

        assert_eq!(loaded, items);
    }

    #[test]
    fn test_corrupt_entry_is_removed_and_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set(CART_KEY, "{not json").unwrap();
        let bridge = PersistenceBridge::new(&storage, CART_KEY);

        let items: Vec<Product> = bridge.load();

        assert!(items.is_empty());
        assert_eq!(storage.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_wrong_shape_counts_as_corrupt() {
        let storage = MemoryStorage::new();
        storage.set(WISHLIST_KEY, r#"{"id":"1"}"#).unwrap();
        let bridge = PersistenceBridge::new(&storage, WISHLIST_KEY);

        let items: Vec<Product> = bridge.load();

        assert!(items.is_empty());
        assert_eq!(storage.get(WISHLIST_KEY).unwrap(), None);
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let storage = MemoryStorage::new();
        let bridge = PersistenceBridge::new(&storage, RECENTLY_VIEWED_KEY);

        bridge.save(&[product("1"), product("2")]).unwrap();
        bridge.save(&[product("9")]).unwrap();
        let loaded: Vec<Product> = bridge.load();

        assert_eq!(loaded, vec![product("9")]);
    }

    #[test]
    fn test_arc_handle_shares_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let a = PersistenceBridge::new(Arc::clone(&storage), CART_KEY);
        a.save(&[1_u32, 2, 3]).unwrap();

        let b = PersistenceBridge::new(storage, CART_KEY);
        let loaded: Vec<u32> = b.load();
        assert_eq!(loaded, vec![1, 2, 3]);
    }
}
