//! Core business logic: clients, rates, aggregation and persistence seams

pub mod analytics;
pub mod client;
pub mod config;
pub mod currency;
pub mod error;
mod lenient;
pub mod log;
pub mod rates;
pub mod repository;
pub mod selection;
pub mod store;

// Re-export main types for cleaner imports
pub use analytics::{MoneyBuckets, Operation};
pub use client::{Client, ClientDetails, ClientUpdate, CreditAccount, DebitAccount};
pub use currency::{CurrencyCode, CurrencyRate, CurrencyRateSource, RateError, RateTable};
pub use error::LedgerError;
pub use rates::{RateCache, RefreshStatus};
pub use repository::ClientRepository;
pub use selection::{SelectedClient, Selection};
pub use store::RecordStore;
