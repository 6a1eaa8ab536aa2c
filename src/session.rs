//! Startup wiring for one run of the application.
use crate::core::{
    ClientRepository, CurrencyRateSource, LedgerError, RateCache, RateError, RateTable,
    RecordStore, Selection,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// How long a finished command waits for the rate refresh before exiting.
pub const FINISH_GRACE: Duration = Duration::from_secs(15);

/// Loaded client book plus the background rate refresh started with it.
///
/// The refresh is never awaited before commands run. Calculations read
/// whatever table is cached, which may predate this session.
pub struct Session {
    pub repository: ClientRepository,
    pub selection: Selection,
    rate_cache: RateCache,
    refresh: Option<JoinHandle<()>>,
}

impl Session {
    pub async fn start(
        store: Arc<dyn RecordStore>,
        source: Arc<dyn CurrencyRateSource>,
    ) -> Result<Self, LedgerError> {
        let rate_cache = RateCache::new(Arc::clone(&store));

        let background_cache = rate_cache.clone();
        let refresh = tokio::spawn(async move {
            match background_cache.refresh(source.as_ref()).await {
                Ok(status) => debug!(?status, "Exchange rate refresh finished"),
                Err(e) => error!(error = %e, "Failed to cache exchange rates"),
            }
        });

        let repository = ClientRepository::load(Arc::clone(&store)).await?;
        let selection = Selection::new(store);
        info!("Session started with {} clients", repository.len());

        Ok(Self {
            repository,
            selection,
            rate_cache,
            refresh: Some(refresh),
        })
    }

    /// The cached rate table. When nothing has been cached yet, waits once
    /// for this session's refresh before giving up.
    pub async fn rates(&mut self) -> Result<RateTable, LedgerError> {
        if let Some(table) = self.rate_cache.load().await? {
            return Ok(table);
        }

        if let Some(refresh) = self.refresh.take() {
            debug!("No cached exchange rates, waiting for refresh");
            if let Err(e) = refresh.await {
                warn!(error = %e, "Exchange rate refresh task failed");
            }
        }

        self.rate_cache
            .load()
            .await?
            .ok_or(LedgerError::Rate(RateError::RatesUnavailable))
    }

    /// Lets the background refresh land its cache write before exit.
    ///
    /// Blocks for at most [`FINISH_GRACE`]. A refresh still running after
    /// that is dropped and the cache keeps its previous table.
    pub async fn finish(self) {
        self.finish_within(FINISH_GRACE).await
    }

    pub async fn finish_within(mut self, grace: Duration) {
        let Some(mut refresh) = self.refresh.take() else {
            return;
        };
        match tokio::time::timeout(grace, &mut refresh).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Exchange rate refresh task failed"),
            Err(_) => {
                warn!(
                    "Exchange rate refresh still running after {:?}, giving up",
                    grace
                );
                refresh.abort();
            }
        }
    }
}
