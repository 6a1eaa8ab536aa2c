//! Named-record storage abstraction

use crate::core::error::LedgerError;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

/// Whole client book.
pub const CLIENTS_RECORD: &str = "clients";
/// Cached exchange rate table, synthetic UAH entry included.
pub const RATES_RECORD: &str = "currencyCourse";
/// Snapshot of the client picked by the last lookup.
pub const CURRENT_CLIENT_RECORD: &str = "currentClient";
/// Repository index of the client picked by the last lookup.
pub const CURRENT_CLIENT_INDEX_RECORD: &str = "currentClientIndex";

/// A flat store of named records, each holding one serialized blob.
///
/// Writes overwrite the whole record. There is no locking, so two writers
/// against the same store can lose each other's updates.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, name: &str, value: Vec<u8>) -> Result<()>;
    async fn remove(&self, name: &str) -> Result<()>;
}

/// Reads and decodes a JSON record. A missing record is `Ok(None)`; a record
/// that does not decode is a `MalformedRecord` error.
pub async fn read_json<T>(store: &dyn RecordStore, name: &str) -> Result<Option<T>, LedgerError>
where
    T: DeserializeOwned,
{
    let Some(bytes) = store.get(name).await.map_err(LedgerError::Storage)? else {
        debug!("Record {} is absent", name);
        return Ok(None);
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| LedgerError::MalformedRecord {
            record: name.to_string(),
            source,
        })
}

pub async fn write_json<T>(store: &dyn RecordStore, name: &str, value: &T) -> Result<(), LedgerError>
where
    T: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec(value).map_err(|source| LedgerError::MalformedRecord {
        record: name.to_string(),
        source,
    })?;
    debug!("Writing record {} ({} bytes)", name, bytes.len());
    store.put(name, bytes).await.map_err(LedgerError::Storage)
}
