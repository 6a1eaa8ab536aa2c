use crate::core::store::RecordStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const RECORDS_PARTITION: &str = "records";

/// Record store backed by a fjall keyspace. Every write is synced to disk
/// before it returns.
#[derive(Clone)]
pub struct DiskStore {
    keyspace: Keyspace,
    records: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let records = keyspace
            .open_partition(RECORDS_PARTITION, PartitionCreateOptions::default())
            .context("Failed to open records partition")?;
        debug!("Opened record store at {}", path.display());

        Ok(Self { keyspace, records })
    }
}

#[async_trait]
impl RecordStore for DiskStore {
    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .records
            .get(name.as_bytes())
            .with_context(|| format!("Failed to read record {name}"))?;
        debug!("Disk GET {} (hit: {})", name, value.is_some());
        Ok(value.map(|slice| slice.to_vec()))
    }

    async fn put(&self, name: &str, value: Vec<u8>) -> Result<()> {
        self.records
            .insert(name.as_bytes(), value)
            .with_context(|| format!("Failed to write record {name}"))?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to sync store")?;
        debug!("Disk PUT {}", name);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        self.records
            .remove(name.as_bytes())
            .with_context(|| format!("Failed to remove record {name}"))?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to sync store")?;
        debug!("Disk REMOVE {}", name);
        Ok(())
    }
}
