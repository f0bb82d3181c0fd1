use std::sync::Arc;

use tracing::info;

use super::{file_store::FileStore, memory_store::MemoryStore};
use crate::config::{StoreBackend, StoreConfig};
use crate::error::StorageError;

/// The Store trait abstracts the persistent key/value storage the session
/// token lives in (get, set, remove), the way a browser exposes `localStorage`.
pub trait Store: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
    fn is_persistent(&self) -> bool {
        // Real stores outlive the process; the memory store overrides this
        // so log lines can say where the token went.
        true
    }
}

/// Creates a concrete store implementation based on the StoreConfig.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn Store>, StorageError> {
    match &config.backend {
        StoreBackend::Memory => {
            info!("Token store is in-memory. The session will not survive a restart.");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::File(file_config) => {
            let store = FileStore::open(&file_config.path)?;
            info!("Using file token store at {}", file_config.path.display());
            Ok(Arc::new(store))
        }
    }
}
