//! Persisted and transient UI state
//!
//! A [`StateManager`] holds one optional string per declared key. Stored
//! keys are loaded from a [`KeyValueStore`] when the manager is created and
//! written back on every change; clearing a stored key removes its entry.
//! Temporary keys behave the same in memory but never touch the store.
//!
//! The store is injected, so several managers can share one (writes to the
//! same key are last-write-wins) and tests can use a [`MemoryStore`].
//!
//! ```
//! use std::sync::Arc;
//! use tidewater::state::{KeyValueStore, MemoryStore, StateManagerBuilder};
//!
//! let store = Arc::new(MemoryStore::new());
//! store.set("theme", "dark");
//!
//! let mut state = StateManagerBuilder::new()
//!     .stored(["theme", "token"])
//!     .temporary(["draft"])
//!     .build(Arc::clone(&store))
//!     .unwrap();
//!
//! assert_eq!(state.get("theme").unwrap(), Some("dark"));
//!
//! state.set("token", "abc123").unwrap();
//! state.set("draft", "unsaved text").unwrap();
//! assert_eq!(store.get("token").as_deref(), Some("abc123"));
//! assert_eq!(store.get("draft"), None);
//!
//! state.clear("theme").unwrap();
//! assert_eq!(store.get("theme"), None);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StateError;
use crate::watch::{WatchId, Watchers};

/// Flat string key/value persistence.
///
/// Methods take `&self`; implementations handle their own synchronization.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    fn set(&self, key: &str, value: &str);

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// In-process store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panicking writer cannot leave a half-written String behind.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Persistence {
    Stored,
    Temporary,
}

struct Slot {
    persistence: Persistence,
    value: Option<String>,
    watchers: Watchers<Option<String>>,
}

/// Declares the keys of a [`StateManager`].
#[derive(Debug, Clone, Default)]
pub struct StateManagerBuilder {
    stored: Vec<String>,
    temporary: Vec<String>,
}

impl StateManagerBuilder {
    /// Start declaring keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys persisted to the store.
    pub fn stored<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.stored.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Keys kept in memory only.
    pub fn temporary<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.temporary.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Create the manager, loading stored keys from `store`.
    ///
    /// # Errors
    ///
    /// A key is declared twice, in either or both lists.
    pub fn build<S: KeyValueStore>(self, store: S) -> Result<StateManager<S>, StateError> {
        let declared = self
            .stored
            .into_iter()
            .map(|key| (key, Persistence::Stored))
            .chain(
                self.temporary
                    .into_iter()
                    .map(|key| (key, Persistence::Temporary)),
            );

        let mut order = Vec::new();
        let mut slots = HashMap::new();
        for (key, persistence) in declared {
            if slots.contains_key(&key) {
                return Err(StateError::DuplicateKey(key));
            }
            let value = match persistence {
                Persistence::Stored => store.get(&key),
                Persistence::Temporary => None,
            };
            tracing::debug!(key = %key, loaded = value.is_some(), ?persistence, "state key declared");
            slots.insert(
                key.clone(),
                Slot {
                    persistence,
                    value,
                    watchers: Watchers::new(),
                },
            );
            order.push(key);
        }

        Ok(StateManager {
            store,
            order,
            slots,
        })
    }
}

/// Reactive string state with optional persistence per key.
pub struct StateManager<S> {
    store: S,
    order: Vec<String>,
    slots: HashMap<String, Slot>,
}

impl<S: KeyValueStore> StateManager<S> {
    /// Current value of a key.
    pub fn get(&self, key: &str) -> Result<Option<&str>, StateError> {
        Ok(self.slot(key)?.value.as_deref())
    }

    /// Give a key a value.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), StateError> {
        self.assign(key, Some(value.into()))
    }

    /// Make a key absent. Stored keys lose their store entry.
    pub fn clear(&mut self, key: &str) -> Result<(), StateError> {
        self.assign(key, None)
    }

    /// Set or clear a key. Assigning the current value does nothing.
    pub fn assign(&mut self, key: &str, value: Option<String>) -> Result<(), StateError> {
        let slot = self
            .slots
            .get_mut(key)
            .ok_or_else(|| StateError::UnknownKey(key.to_string()))?;

        if slot.value == value {
            return Ok(());
        }
        slot.value = value;

        if slot.persistence == Persistence::Stored {
            match &slot.value {
                Some(value) => self.store.set(key, value),
                None => self.store.remove(key),
            }
            tracing::debug!(key, present = slot.value.is_some(), "stored state key written");
        }

        slot.watchers.notify(&slot.value);
        Ok(())
    }

    /// Observe changes of one key.
    pub fn watch<F>(&mut self, key: &str, callback: F) -> Result<WatchId, StateError>
    where
        F: Fn(&Option<String>) + Send + Sync + 'static,
    {
        let slot = self
            .slots
            .get_mut(key)
            .ok_or_else(|| StateError::UnknownKey(key.to_string()))?;
        Ok(slot.watchers.subscribe(callback))
    }

    /// Stop observing a key.
    pub fn unwatch(&mut self, key: &str, id: WatchId) -> Result<bool, StateError> {
        let slot = self
            .slots
            .get_mut(key)
            .ok_or_else(|| StateError::UnknownKey(key.to_string()))?;
        Ok(slot.watchers.unsubscribe(id))
    }

    /// Whether the key is persisted.
    pub fn is_stored(&self, key: &str) -> Result<bool, StateError> {
        Ok(self.slot(key)?.persistence == Persistence::Stored)
    }

    /// Every key with its current value, in declaration order.
    pub fn snapshot(&self) -> Vec<(String, Option<String>)> {
        self.order
            .iter()
            .map(|key| {
                let value = self.slots.get(key).and_then(|slot| slot.value.clone());
                (key.clone(), value)
            })
            .collect()
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn slot(&self, key: &str) -> Result<&Slot, StateError> {
        self.slots
            .get(key)
            .ok_or_else(|| StateError::UnknownKey(key.to_string()))
    }
}

impl<S> fmt::Debug for StateManager<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateManager")
            .field("keys", &self.order)
            .finish_non_exhaustive()
    }
}
