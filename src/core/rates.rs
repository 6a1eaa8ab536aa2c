//! Cached exchange rate table.
use crate::core::currency::{CurrencyRateSource, RateTable};
use crate::core::error::LedgerError;
use crate::core::store::{RATES_RECORD, RecordStore, read_json, write_json};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStatus {
    /// The cache now holds a fresh table with this many rows.
    Updated(usize),
    /// The source failed; whatever was cached before is still there.
    Kept,
}

/// The rate table as last fetched. It never expires; it is replaced by the
/// next successful refresh.
#[derive(Clone)]
pub struct RateCache {
    store: Arc<dyn RecordStore>,
}

impl RateCache {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Option<RateTable>, LedgerError> {
        read_json(self.store.as_ref(), RATES_RECORD).await
    }

    /// Fetches the table once, appends the UAH identity row and caches the
    /// result. A failed fetch is logged and reported as `Kept`; only a
    /// failure to write the cache is an error.
    pub async fn refresh(
        &self,
        source: &dyn CurrencyRateSource,
    ) -> Result<RefreshStatus, LedgerError> {
        let rates = match source.fetch_rates().await {
            Ok(rates) => rates,
            Err(e) => {
                error!(error = %e, "Failed to fetch exchange rates, keeping cached table");
                return Ok(RefreshStatus::Kept);
            }
        };

        let table = RateTable::new(rates).with_identity_entry();
        write_json(self.store.as_ref(), RATES_RECORD, &table).await?;
        info!("Cached {} exchange rates", table.len());
        Ok(RefreshStatus::Updated(table.len()))
    }
}
