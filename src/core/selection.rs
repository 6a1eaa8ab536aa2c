//! The current-client slot shared by lookup and the commands that follow it.
use crate::core::client::Client;
use crate::core::error::LedgerError;
use crate::core::repository::ClientRepository;
use crate::core::store::{
    CURRENT_CLIENT_INDEX_RECORD, CURRENT_CLIENT_RECORD, RecordStore, read_json, write_json,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedClient {
    pub index: usize,
    pub client: Client,
}

/// Single transient slot, overwritten on every successful lookup.
#[derive(Clone)]
pub struct Selection {
    store: Arc<dyn RecordStore>,
}

impl Selection {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Looks a client up and remembers it. A miss leaves the previous
    /// selection in place.
    pub async fn select(
        &self,
        repository: &ClientRepository,
        identification_number: u64,
    ) -> Result<SelectedClient, LedgerError> {
        let (index, client) = repository
            .find_by_identification_number(identification_number)
            .ok_or(LedgerError::NotFound(identification_number))?;

        write_json(self.store.as_ref(), CURRENT_CLIENT_RECORD, client).await?;
        write_json(self.store.as_ref(), CURRENT_CLIENT_INDEX_RECORD, &index).await?;
        debug!("Selected client {} at index {}", identification_number, index);

        Ok(SelectedClient {
            index,
            client: client.clone(),
        })
    }

    pub async fn current(&self) -> Result<Option<SelectedClient>, LedgerError> {
        let client: Option<Client> = read_json(self.store.as_ref(), CURRENT_CLIENT_RECORD).await?;
        let index: Option<usize> =
            read_json(self.store.as_ref(), CURRENT_CLIENT_INDEX_RECORD).await?;
        Ok(client
            .zip(index)
            .map(|(client, index)| SelectedClient { index, client }))
    }

    /// Index of the selected client in `repository`, checked against the
    /// book as it is now.
    pub async fn resolve(&self, repository: &ClientRepository) -> Result<usize, LedgerError> {
        let selected = self.current().await?.ok_or(LedgerError::NoSelection)?;
        let id = selected.client.identification_number;
        match repository.get(selected.index) {
            Some(client) if client.identification_number == id => Ok(selected.index),
            _ => Err(LedgerError::StaleSelection(id)),
        }
    }

    pub async fn clear(&self) -> Result<(), LedgerError> {
        self.store
            .remove(CURRENT_CLIENT_RECORD)
            .await
            .map_err(LedgerError::Storage)?;
        self.store
            .remove(CURRENT_CLIENT_INDEX_RECORD)
            .await
            .map_err(LedgerError::Storage)
    }
}
