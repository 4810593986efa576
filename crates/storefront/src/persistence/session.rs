//! Session-backed storage for the HTTP service.
//!
//! A client's collections live in its `tower-sessions` session, one string
//! value per collection key. Session access is async while store operations
//! are synchronous, so a request works against a snapshot: [`SessionStorage::load`]
//! copies the collection keys out of the session, the stores read and write
//! the snapshot, and [`SessionStorage::flush`] writes changed keys back.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;
use tower_sessions::Session;

use super::{COLLECTION_KEYS, KeyValueStore, StorageError};

#[derive(Debug, Default)]
struct Snapshot {
    entries: HashMap<String, String>,
    dirty: HashSet<String>,
}

/// Request-scoped view of the collection keys in a session.
#[derive(Debug, Default)]
pub struct SessionStorage {
    snapshot: Mutex<Snapshot>,
}

impl SessionStorage {
    /// Copy the collection keys out of `session`.
    ///
    /// Non-string values are kept in their JSON text form; the persistence
    /// bridge then treats them like any other unparseable entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        let mut entries = HashMap::new();
        for key in COLLECTION_KEYS {
            match session.get_value(key).await? {
                Some(Value::String(raw)) => {
                    entries.insert(key.to_owned(), raw);
                }
                Some(other) => {
                    entries.insert(key.to_owned(), other.to_string());
                }
                None => {}
            }
        }

        Ok(Self {
            snapshot: Mutex::new(Snapshot {
                entries,
                dirty: HashSet::new(),
            }),
        })
    }

    /// Whether any key was written or removed since the last flush.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .dirty
            .is_empty()
    }

    /// Write changed keys back to `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects a write.
    pub async fn flush(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        let pending: Vec<(String, Option<String>)> = {
            let mut snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
            let dirty: Vec<String> = snapshot.dirty.drain().collect();
            dirty
                .into_iter()
                .map(|key| {
                    let value = snapshot.entries.get(&key).cloned();
                    (key, value)
                })
                .collect()
        };

        for (key, value) in pending {
            match value {
                Some(raw) => session.insert(&key, raw).await?,
                None => {
                    session.remove_value(&key).await?;
                }
            }
        }

        Ok(())
    }
}

impl KeyValueStore for SessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(snapshot.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        snapshot.entries.insert(key.to_owned(), value.to_owned());
        snapshot.dirty.insert(key.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        snapshot.entries.remove(key);
        snapshot.dirty.insert(key.to_owned());
        Ok(())
    }
}
