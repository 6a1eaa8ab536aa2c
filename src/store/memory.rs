use crate::core::store::RecordStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory record store. Nothing survives the process.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let records = self.inner.lock().await;
        let value = records.get(name).cloned();
        debug!("Memory GET {} (hit: {})", name, value.is_some());
        Ok(value)
    }

    async fn put(&self, name: &str, value: Vec<u8>) -> Result<()> {
        let mut records = self.inner.lock().await;
        debug!("Memory PUT {}", name);
        records.insert(name.to_string(), value);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        let mut records = self.inner.lock().await;
        records.remove(name);
        debug!("Memory REMOVE {}", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_get_put() {
        let store = MemoryStore::new();

        // Initially, store is empty
        assert!(store.get("clients").await.unwrap().is_none());

        store.put("clients", b"[]".to_vec()).await.unwrap();
        assert_eq!(store.get("clients").await.unwrap(), Some(b"[]".to_vec()));

        // Overwrite replaces the whole record
        store.put("clients", b"[1]".to_vec()).await.unwrap();
        assert_eq!(store.get("clients").await.unwrap(), Some(b"[1]".to_vec()));

        assert!(store.get("currencyCourse").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_remove() {
        let store = MemoryStore::new();

        store.put("currentClient", b"{}".to_vec()).await.unwrap();
        store.remove("currentClient").await.unwrap();
        assert!(store.get("currentClient").await.unwrap().is_none());

        // Removing a missing record is not an error
        store.remove("currentClient").await.unwrap();
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.put("clients", b"[]".to_vec()).await.unwrap();
        assert!(other.get("clients").await.unwrap().is_some());
    }
}
