//! The client book and its persistence.
use crate::core::client::{Client, CreditAccount, DebitAccount};
use crate::core::error::LedgerError;
use crate::core::store::{CLIENTS_RECORD, RecordStore, read_json, write_json};
use std::sync::Arc;
use tracing::{debug, info};

/// Ordered collection of clients, in the order they were registered.
///
/// Every mutation writes the whole collection back to the store before it
/// becomes visible; a failed write leaves the in-memory book unchanged.
/// Amounts that are not finite numbers are refused before anything is written.
pub struct ClientRepository {
    store: Arc<dyn RecordStore>,
    clients: Vec<Client>,
}

impl ClientRepository {
    /// Loads the book from the store, starting empty when nothing is stored.
    pub async fn load(store: Arc<dyn RecordStore>) -> Result<Self, LedgerError> {
        let clients: Vec<Client> = read_json(store.as_ref(), CLIENTS_RECORD)
            .await?
            .unwrap_or_default();
        info!("Loaded {} clients", clients.len());
        Ok(Self { store, clients })
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn get(&self, index: usize) -> Option<&Client> {
        self.clients.get(index)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// First client carrying `identification_number`, with its index.
    pub fn find_by_identification_number(&self, identification_number: u64) -> Option<(usize, &Client)> {
        self.clients
            .iter()
            .enumerate()
            .find(|(_, client)| client.identification_number == identification_number)
    }

    /// Appends a client and returns its index.
    pub async fn add(&mut self, client: Client) -> Result<usize, LedgerError> {
        if self
            .find_by_identification_number(client.identification_number)
            .is_some()
        {
            return Err(LedgerError::DuplicateIdentificationNumber(
                client.identification_number,
            ));
        }

        let mut next = self.clients.clone();
        next.push(client);
        self.commit(next).await?;
        Ok(self.clients.len() - 1)
    }

    pub async fn replace_at(&mut self, index: usize, client: Client) -> Result<(), LedgerError> {
        self.check_index(index)?;
        let collides = self
            .clients
            .iter()
            .enumerate()
            .any(|(i, other)| i != index && other.identification_number == client.identification_number);
        if collides {
            return Err(LedgerError::DuplicateIdentificationNumber(
                client.identification_number,
            ));
        }

        let mut next = self.clients.clone();
        next[index] = client;
        self.commit(next).await
    }

    pub async fn remove_at(&mut self, index: usize) -> Result<Client, LedgerError> {
        self.check_index(index)?;
        let mut next = self.clients.clone();
        let removed = next.remove(index);
        self.commit(next).await?;
        Ok(removed)
    }

    pub async fn open_debit_account(
        &mut self,
        index: usize,
        account: DebitAccount,
    ) -> Result<(), LedgerError> {
        self.check_index(index)?;
        let mut next = self.clients.clone();
        next[index].debit_accounts.push(account);
        self.commit(next).await
    }

    pub async fn open_credit_account(
        &mut self,
        index: usize,
        account: CreditAccount,
    ) -> Result<(), LedgerError> {
        self.check_index(index)?;
        let mut next = self.clients.clone();
        next[index].credit_accounts.push(account);
        self.commit(next).await
    }

    fn check_index(&self, index: usize) -> Result<(), LedgerError> {
        if index >= self.clients.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.clients.len(),
            });
        }
        Ok(())
    }

    async fn commit(&mut self, next: Vec<Client>) -> Result<(), LedgerError> {
        next.iter().try_for_each(Client::check_amounts)?;
        write_json(self.store.as_ref(), CLIENTS_RECORD, &next).await?;
        debug!("Persisted {} clients", next.len());
        self.clients = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::ClientDetails;
    use crate::store::memory::MemoryStore;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn client(id: u64, last_name: &str) -> Client {
        Client::register(
            ClientDetails {
                last_name: last_name.to_string(),
                first_name: "Ivan".to_string(),
                patronymic: "Ivanovych".to_string(),
                identification_number: id,
                is_active_client: true,
            },
            today(),
        )
    }

    async fn stored_clients(store: &MemoryStore) -> Vec<Client> {
        read_json(store, CLIENTS_RECORD).await.unwrap().unwrap()
    }

    struct FailingStore;

    #[async_trait]
    impl RecordStore for FailingStore {
        async fn get(&self, _name: &str) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }

        async fn put(&self, _name: &str, _value: Vec<u8>) -> Result<()> {
            Err(anyhow!("disk full"))
        }

        async fn remove(&self, _name: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_from_empty_store() {
        let repo = ClientRepository::load(Arc::new(MemoryStore::new()))
            .await
            .unwrap();
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_add_persists_whole_book() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = ClientRepository::load(store.clone()).await.unwrap();

        assert_eq!(repo.add(client(1, "Bondar")).await.unwrap(), 0);
        assert_eq!(repo.add(client(2, "Koval")).await.unwrap(), 1);

        let stored = stored_clients(&store).await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].last_name, "Bondar");
        assert_eq!(stored[1].last_name, "Koval");
    }

    #[tokio::test]
    async fn test_reload_restores_identical_book() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = ClientRepository::load(store.clone()).await.unwrap();
        repo.add(client(1, "Bondar")).await.unwrap();
        repo.add(client(2, "Koval")).await.unwrap();
        repo.open_debit_account(1, DebitAccount::open(99.5, true, "EUR".into(), today()))
            .await
            .unwrap();
        repo.open_credit_account(0, CreditAccount::open(1.0, 2.0, false, "USD".into(), today()))
            .await
            .unwrap();

        let reloaded = ClientRepository::load(store).await.unwrap();
        assert_eq!(reloaded.clients(), repo.clients());
    }

    #[tokio::test]
    async fn test_duplicate_identification_number_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = ClientRepository::load(store.clone()).await.unwrap();
        repo.add(client(7, "Bondar")).await.unwrap();

        let result = repo.add(client(7, "Koval")).await;
        assert!(matches!(
            result,
            Err(LedgerError::DuplicateIdentificationNumber(7))
        ));
        assert_eq!(repo.len(), 1);
        assert_eq!(stored_clients(&store).await.len(), 1);
    }

    #[tokio::test]
    async fn test_find_returns_first_match() {
        // Books written before uniqueness was enforced may hold duplicates.
        let store = Arc::new(MemoryStore::new());
        write_json(
            &*store,
            CLIENTS_RECORD,
            &[client(5, "First"), client(5, "Second")],
        )
        .await
        .unwrap();

        let repo = ClientRepository::load(store).await.unwrap();
        let (index, found) = repo.find_by_identification_number(5).unwrap();
        assert_eq!(index, 0);
        assert_eq!(found.last_name, "First");
        assert!(repo.find_by_identification_number(6).is_none());
    }

    #[tokio::test]
    async fn test_replace_at_and_collisions() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = ClientRepository::load(store.clone()).await.unwrap();
        repo.add(client(1, "Bondar")).await.unwrap();
        repo.add(client(2, "Koval")).await.unwrap();

        let mut edited = repo.get(0).unwrap().clone();
        edited.last_name = "Melnyk".to_string();
        repo.replace_at(0, edited).await.unwrap();
        assert_eq!(stored_clients(&store).await[0].last_name, "Melnyk");

        let mut colliding = repo.get(0).unwrap().clone();
        colliding.identification_number = 2;
        assert!(matches!(
            repo.replace_at(0, colliding).await,
            Err(LedgerError::DuplicateIdentificationNumber(2))
        ));

        // Keeping its own number is not a collision.
        let same = repo.get(1).unwrap().clone();
        repo.replace_at(1, same).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_at() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = ClientRepository::load(store.clone()).await.unwrap();
        repo.add(client(1, "Bondar")).await.unwrap();
        repo.add(client(2, "Koval")).await.unwrap();

        let removed = repo.remove_at(0).await.unwrap();
        assert_eq!(removed.identification_number, 1);
        let stored = stored_clients(&store).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].identification_number, 2);
    }

    #[tokio::test]
    async fn test_index_out_of_range() {
        let mut repo = ClientRepository::load(Arc::new(MemoryStore::new()))
            .await
            .unwrap();
        assert!(matches!(
            repo.remove_at(0).await,
            Err(LedgerError::IndexOutOfRange { index: 0, len: 0 })
        ));
        assert!(matches!(
            repo.open_debit_account(3, DebitAccount::open(1.0, true, "UAH".into(), today()))
                .await,
            Err(LedgerError::IndexOutOfRange { index: 3, len: 0 })
        ));
    }

    #[tokio::test]
    async fn test_malformed_book_fails_fast() {
        let store = Arc::new(MemoryStore::new());
        store
            .put(CLIENTS_RECORD, b"[{\"lastName\": ".to_vec())
            .await
            .unwrap();

        let result = ClientRepository::load(store).await;
        assert!(matches!(
            result,
            Err(LedgerError::MalformedRecord { ref record, .. }) if record == CLIENTS_RECORD
        ));
    }

    #[tokio::test]
    async fn test_non_finite_amounts_never_reach_the_store() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = ClientRepository::load(store.clone()).await.unwrap();
        repo.add(client(1, "Bondar")).await.unwrap();

        let overflow = CreditAccount::open(1e308, 1e308, true, "USD".into(), today());
        assert!(matches!(
            repo.open_credit_account(0, overflow).await,
            Err(LedgerError::InvalidAmount { field: "balance", .. })
        ));
        let nan = DebitAccount::open(f64::NAN, true, "UAH".into(), today());
        assert!(matches!(
            repo.open_debit_account(0, nan).await,
            Err(LedgerError::InvalidAmount { .. })
        ));

        let mut smuggled = client(2, "Koval");
        smuggled
            .debit_accounts
            .push(DebitAccount::open(f64::INFINITY, true, "EUR".into(), today()));
        assert!(matches!(
            repo.add(smuggled).await,
            Err(LedgerError::InvalidAmount { .. })
        ));

        // The book on disk is still readable and unchanged.
        let reloaded = ClientRepository::load(store).await.unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.clients()[0].credit_accounts.is_empty());
        assert!(reloaded.clients()[0].debit_accounts.is_empty());
        assert_eq!(reloaded.clients(), repo.clients());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_book_unchanged() {
        let mut repo = ClientRepository::load(Arc::new(FailingStore)).await.unwrap();
        let result = repo.add(client(1, "Bondar")).await;
        assert!(matches!(result, Err(LedgerError::Storage(_))));
        assert!(repo.is_empty());
    }
}
