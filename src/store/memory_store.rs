use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::Store;
use crate::error::StorageError;

/// A store that keeps entries for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("jwt").unwrap(), None);

        store.set_item("jwt", "first").unwrap();
        store.set_item("jwt", "second").unwrap();
        assert_eq!(store.get_item("jwt").unwrap().as_deref(), Some("second"));

        store.remove_item("jwt").unwrap();
        assert_eq!(store.get_item("jwt").unwrap(), None);
    }

    #[test]
    fn test_memory_store_remove_missing_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove_item("missing").is_ok());
    }
}
