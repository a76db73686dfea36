//! String-keyed persistence
//!
//! The simulation never touches storage directly. Settings and the best score
//! go through a [`KeyValueStore`], which is LocalStorage on the web and an
//! in-memory map everywhere else.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::PoolError;

/// A get/set string store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PoolError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    writes: usize,
}

/// In-memory store. Clones share the same map, so a caller can keep a handle
/// after giving one away.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far
    pub fn write_count(&self) -> usize {
        self.inner.borrow().writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.borrow().values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PoolError> {
        let mut inner = self.inner.borrow_mut();
        inner.values.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}

/// Read and decode a JSON value. `Ok(None)` when the key is absent.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, PoolError> {
    match store.get(key) {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| PoolError::Storage(format!("{}: {}", key, e))),
        None => Ok(None),
    }
}

/// Encode a value as JSON and write it
pub fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PoolError> {
    let json = serde_json::to_string(value).map_err(|e| PoolError::Storage(e.to_string()))?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_clones_share_values() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.set("k", "v").unwrap();

        assert_eq!(store.get("k").as_deref(), Some("v"));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_load_json_missing_and_corrupt() {
        let mut store = MemoryStore::new();
        assert_eq!(load_json::<u32>(&store, "n").unwrap(), None);

        store.set("n", "not a number").unwrap();
        assert!(matches!(
            load_json::<u32>(&store, "n"),
            Err(PoolError::Storage(_))
        ));

        save_json(&mut store, "n", &42u32).unwrap();
        assert_eq!(load_json::<u32>(&store, "n").unwrap(), Some(42));
    }
}
